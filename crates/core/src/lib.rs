//! Core traits and types for driving ISO14443-A contactless readers
//!
//! The contactless front-end is consumed by the card engines as an abstract
//! capability: passive-target selection (anti-collision), raw frame
//! exchange, framed MIFARE commands and boolean device properties. This
//! crate defines that capability together with the selected-target types
//! and the progress-observer interface shared by the card engines.
//!
//! Everything here is blocking and fallible. Timeout and retry policy
//! belong to the reader implementation; callers recover from a lost tag by
//! re-running passive selection.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

pub mod error;
pub mod observer;
pub mod reader;
pub mod target;

pub use error::ReaderError;
pub use observer::{DotWriter, NullObserver, ProgressEvent, ProgressObserver};
pub use reader::{MifareCommand, Property, Reader};
pub use target::{MIFARE_MODULATION, Modulation, Target, Uid};
