//! Error types for MIFARE card operations

use core::fmt;

use nfcdump_core::ReaderError;
use thiserror::Error;

/// Result type for MIFARE card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which way a block transfer was going when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOp {
    /// Block read
    Read,
    /// Block write
    Write,
}

impl fmt::Display for BlockOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Error type for MIFARE card operations
///
/// Every abort names the block it happened on. `TagRemoved` and
/// `AuthenticationFailed` are always fatal to the whole operation;
/// `BlockIo` is recorded per block and escalates to an abort at the next
/// per-block check; `ChecksumInvalid` fires before anything is sent to the
/// reader at all.
#[derive(Debug, Error)]
pub enum Error {
    /// The tag left the field; anti-collision could not re-select it.
    #[error("tag was removed")]
    TagRemoved,

    /// No key opened the sector containing the block.
    #[error("authentication failed for block 0x{block:02x}")]
    AuthenticationFailed {
        /// Block the sector was addressed by.
        block: u8,
    },

    /// A block transfer failed and aborted the operation.
    #[error("failed to {op} block 0x{block:02x}")]
    BlockIo {
        /// Transfer direction.
        op: BlockOp,
        /// Failing block index.
        block: u8,
    },

    /// The dump's manufacturer block fails its checksum; writing it could
    /// make the card permanently invalid.
    #[error("incorrect BCC in dump, expecting BCC 0x{expected:02X}")]
    ChecksumInvalid {
        /// BCC the dump's UID bytes imply.
        expected: u8,
    },

    /// The RF field could not be toggled back on during the capacity probe.
    #[error("failed to reconfigure the RF field")]
    FieldConfig(#[source] ReaderError),

    /// The dump buffer length does not match any known card layout.
    #[error("dump of {actual} bytes does not match any known card layout")]
    InvalidDumpSize {
        /// Offered buffer length.
        actual: usize,
    },

    /// Reader-level failure outside any block transfer.
    #[error(transparent)]
    Reader(#[from] ReaderError),
}
