//! Reader capability consumed by the card engines
//!
//! A [`Reader`] is the one seam between the card engines and the hardware:
//! it selects targets, exchanges frames and issues framed MIFARE commands.
//! Implementations wrap a concrete transceiver driver; the engines never
//! see anything below this trait.

use core::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::Result;
use crate::target::{Modulation, Target};

/// MIFARE command set understood by [`Reader::mifare_command`].
///
/// The reader is responsible for framing (easy framing on, CRC and parity
/// handled); the engines only name the operation and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifareCommand<'a> {
    /// Authenticate the block's sector with key A.
    AuthenticateA {
        /// Six byte sector key.
        key: &'a [u8; 6],
        /// Trailing four UID bytes of the selected target.
        uid: [u8; 4],
    },
    /// Authenticate the block's sector with key B.
    AuthenticateB {
        /// Six byte sector key.
        key: &'a [u8; 6],
        /// Trailing four UID bytes of the selected target.
        uid: [u8; 4],
    },
    /// Read one 16 byte block.
    Read,
    /// Write one 16 byte block.
    Write(&'a [u8; 16]),
}

impl MifareCommand<'_> {
    /// Wire opcode of the command.
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::AuthenticateA { .. } => 0x60,
            Self::AuthenticateB { .. } => 0x61,
            Self::Read => 0x30,
            Self::Write(_) => 0xA0,
        }
    }
}

/// Boolean device properties the engines may toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// Automatic framing of MIFARE commands.
    EasyFraming,
    /// RF field activation.
    ActivateField,
    /// Retry selection until a target appears instead of answering once.
    InfiniteSelect,
    /// Automatic ISO14443-4 activation on RATS-capable tags.
    AutoIso14443_4,
    /// Hardware CRC handling.
    HandleCrc,
    /// Hardware parity handling.
    HandleParity,
}

/// Abstract contactless front-end.
///
/// All calls block until the hardware answers or times out. Any call may
/// fail because the tag left the field; the engines classify that by
/// whether a subsequent re-selection succeeds.
pub trait Reader: fmt::Debug {
    /// Run anti-collision and select one passive target.
    ///
    /// With `uid` given, only a tag carrying exactly that UID is selected;
    /// the engines use this to re-acquire a known tag after a failure.
    fn select_passive_target(
        &mut self,
        modulation: Modulation,
        uid: Option<&[u8]>,
    ) -> Result<Target>;

    /// Exchange raw bytes with the selected target, bypassing framing.
    fn transceive_raw(&mut self, tx: &[u8]) -> Result<Bytes> {
        trace!(tx = %hex::encode(tx), "transceiving raw frame");
        let result = self.do_transceive_raw(tx);
        if let Err(error) = &result {
            debug!(?error, "raw transceive failed");
        }
        result
    }

    /// Internal implementation of [`transceive_raw`](Self::transceive_raw).
    /// This is the method concrete implementations should override.
    fn do_transceive_raw(&mut self, tx: &[u8]) -> Result<Bytes>;

    /// Issue one framed MIFARE command against `block`.
    ///
    /// `Read` returns the 16 block bytes; the other commands return an
    /// empty buffer on success.
    fn mifare_command(&mut self, block: u8, command: MifareCommand<'_>) -> Result<Bytes>;

    /// Toggle a boolean device property.
    fn set_property(&mut self, property: Property, enabled: bool) -> Result<()>;
}
