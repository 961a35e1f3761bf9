//! MIFARE Classic and Ultralight card-memory access engine
//!
//! Drives a [`Reader`](nfcdump_core::Reader) through full-card reads and
//! writes: per-sector authentication, the strict block order both card
//! families require, recovery re-selection after transient failures, and
//! the flat dump image the blocks land in. The engines own none of the
//! hardware; a selected [`Target`](nfcdump_core::Target) and the reader are
//! borrowed per operation.

pub mod auth;
pub mod capacity;
pub mod classic;
pub mod error;
pub mod geometry;
pub mod image;
pub mod keys;
pub mod monitor;
pub mod ultralight;

pub use auth::Authenticator;
pub use capacity::{CardClass, detect_card};
pub use classic::ClassicEngine;
pub use error::{Error, Result};
pub use image::{BLOCK_SIZE, ClassicImage, Trailer, UltralightImage};
pub use keys::{DEFAULT_KEYS, Key, KeyType};
pub use monitor::{TagEvent, TagEventHandler, TagMonitor};
