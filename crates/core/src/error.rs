//! Error types for reader operations

use thiserror::Error;

use crate::reader::Property;

/// Result type for reader operations
pub type Result<T> = core::result::Result<T, ReaderError>;

/// Error type for reader-level failures
///
/// The engines only distinguish broad classes: a failed selection means the
/// tag is gone, a failed exchange means the block (or the whole operation)
/// failed, and a failed property change during field control is a hardware
/// fault. Finer diagnostics stay with the reader implementation.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Passive selection found no target in the field
    #[error("no target in the field")]
    NoTarget,

    /// A frame exchange with the tag failed or timed out
    #[error("failed to transceive")]
    Transceive,

    /// A device property could not be applied
    #[error("failed to configure {0:?}")]
    Property(Property),

    /// The reader hardware reported a fault
    #[error("device fault: {0}")]
    Device(&'static str),
}
