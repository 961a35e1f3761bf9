//! Flat dump images and the trailer-block codec
//!
//! The dump layout is part of the engine contract: blocks in ascending
//! index order, 16 raw bytes each, trailer blocks packed as key A, access
//! bits, key B. File I/O lives elsewhere; the engines read and write these
//! images directly.

use bytes::{Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::keys::{KEY_SIZE, Key};

/// Size in bytes of one Classic block (and one Ultralight read unit).
pub const BLOCK_SIZE: usize = 16;

/// Size in bytes of one Ultralight page.
pub const PAGE_SIZE: usize = 4;

/// Number of pages on a MIFARE Ultralight card.
pub const ULTRALIGHT_PAGES: usize = 16;

/// Block counts with a defined Classic dump layout: 320-byte, 1K, Plus 2K
/// and 4K cards.
const CLASSIC_BLOCK_COUNTS: [usize; 4] = [20, 64, 128, 256];

/// In-memory image of a MIFARE Classic card.
///
/// Covers blocks `0..=last_block`; the engines index it with the same
/// last-index convention the capacity detector reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicImage {
    blocks: Vec<[u8; BLOCK_SIZE]>,
}

impl ClassicImage {
    /// Zero-filled image covering blocks `0..=last_block`.
    pub fn zeroed(last_block: u8) -> Self {
        Self {
            blocks: vec![[0u8; BLOCK_SIZE]; usize::from(last_block) + 1],
        }
    }

    /// Index of the last block the image covers.
    pub fn last_block(&self) -> u8 {
        (self.blocks.len() - 1) as u8
    }

    /// One block of the image.
    ///
    /// # Panics
    /// Panics if `index` exceeds [`last_block`](Self::last_block).
    pub fn block(&self, index: u8) -> &[u8; BLOCK_SIZE] {
        &self.blocks[usize::from(index)]
    }

    /// Exclusive access to one block.
    ///
    /// # Panics
    /// Panics if `index` exceeds [`last_block`](Self::last_block).
    pub fn block_mut(&mut self, index: u8) -> &mut [u8; BLOCK_SIZE] {
        &mut self.blocks[usize::from(index)]
    }

    /// Whether the manufacturer block passes its checksum: the four UID
    /// bytes XORed with the BCC byte must cancel out.
    pub fn manufacturer_bcc_ok(&self) -> bool {
        let b = &self.blocks[0];
        b[0] ^ b[1] ^ b[2] ^ b[3] ^ b[4] == 0
    }

    /// BCC implied by the image's UID bytes.
    pub fn expected_bcc(&self) -> u8 {
        let b = &self.blocks[0];
        b[0] ^ b[1] ^ b[2] ^ b[3]
    }

    /// Flat dump form: `(last_block + 1) * 16` bytes, ascending.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.blocks.len() * BLOCK_SIZE);
        for block in &self.blocks {
            buf.extend_from_slice(block);
        }
        buf.freeze()
    }

    /// Parse a flat dump.
    ///
    /// The length must correspond to one of the known Classic layouts
    /// (320, 1024, 2048 or 4096 bytes).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() % BLOCK_SIZE != 0
            || !CLASSIC_BLOCK_COUNTS.contains(&(data.len() / BLOCK_SIZE))
        {
            return Err(Error::InvalidDumpSize { actual: data.len() });
        }
        let mut blocks = Vec::with_capacity(data.len() / BLOCK_SIZE);
        for chunk in data.chunks_exact(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            blocks.push(block);
        }
        Ok(Self { blocks })
    }
}

/// Structured view of a sector trailer.
///
/// On the wire the three fields share one 16 byte block; this codec is the
/// only place that packing is spelled out, and the two views never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Key A (write-only on the card once access bits are set).
    pub key_a: Key,
    /// Access conditions for the sector's blocks.
    pub access_bits: [u8; 4],
    /// Key B, written back verbatim from the image on round trips.
    pub key_b: Key,
}

impl Trailer {
    /// Split a raw trailer block into its fields.
    pub fn decode(block: &[u8; BLOCK_SIZE]) -> Self {
        let mut key_a = [0u8; KEY_SIZE];
        key_a.copy_from_slice(&block[..KEY_SIZE]);
        let mut access_bits = [0u8; 4];
        access_bits.copy_from_slice(&block[KEY_SIZE..KEY_SIZE + 4]);
        let mut key_b = [0u8; KEY_SIZE];
        key_b.copy_from_slice(&block[KEY_SIZE + 4..]);
        Self {
            key_a: Key::new(key_a),
            access_bits,
            key_b: Key::new(key_b),
        }
    }

    /// Pack the fields back into the wire form.
    pub fn encode(&self) -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..KEY_SIZE].copy_from_slice(self.key_a.as_bytes());
        block[KEY_SIZE..KEY_SIZE + 4].copy_from_slice(&self.access_bits);
        block[KEY_SIZE + 4..].copy_from_slice(self.key_b.as_bytes());
        block
    }
}

/// In-memory image of a MIFARE Ultralight card: 16 pages of 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltralightImage {
    pages: [[u8; PAGE_SIZE]; ULTRALIGHT_PAGES],
}

impl UltralightImage {
    /// Zero-filled image.
    pub const fn zeroed() -> Self {
        Self {
            pages: [[0u8; PAGE_SIZE]; ULTRALIGHT_PAGES],
        }
    }

    /// One page of the image.
    ///
    /// # Panics
    /// Panics if `index` is 16 or more.
    pub fn page(&self, index: u8) -> &[u8; PAGE_SIZE] {
        &self.pages[usize::from(index)]
    }

    /// Copy one 16 byte read unit into the four pages starting at `page`.
    ///
    /// # Panics
    /// Panics if `page` is not one of 0, 4, 8 or 12.
    pub fn set_page_group(&mut self, page: u8, data: &[u8; BLOCK_SIZE]) {
        assert!(page % 4 == 0 && usize::from(page) < ULTRALIGHT_PAGES);
        for (offset, chunk) in data.chunks_exact(PAGE_SIZE).enumerate() {
            self.pages[usize::from(page) + offset].copy_from_slice(chunk);
        }
    }

    /// Flat dump form: 64 bytes, pages ascending.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(ULTRALIGHT_PAGES * PAGE_SIZE);
        for page in &self.pages {
            buf.extend_from_slice(page);
        }
        buf.freeze()
    }

    /// Parse a flat 64 byte dump.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != ULTRALIGHT_PAGES * PAGE_SIZE {
            return Err(Error::InvalidDumpSize { actual: data.len() });
        }
        let mut image = Self::zeroed();
        for (page, chunk) in data.chunks_exact(PAGE_SIZE).enumerate() {
            image.pages[page].copy_from_slice(chunk);
        }
        Ok(image)
    }
}

impl Default for UltralightImage {
    fn default() -> Self {
        Self::zeroed()
    }
}
