//! Selected-target representation for ISO14443-A tags

use core::fmt;

/// Maximum UID length in bytes (triple size UIDs).
pub const MAX_UID_LEN: usize = 10;

/// UID reported by a tag during anti-collision (4, 7 or 10 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uid {
    bytes: [u8; MAX_UID_LEN],
    len: usize,
}

impl Uid {
    /// Create a UID from its raw bytes.
    ///
    /// Returns `None` unless `bytes` is 4, 7 or 10 bytes long, the only
    /// cascade levels ISO14443-A defines.
    pub fn new(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            4 | 7 | 10 => {
                let mut buf = [0u8; MAX_UID_LEN];
                buf[..bytes.len()].copy_from_slice(bytes);
                Some(Self {
                    bytes: buf,
                    len: bytes.len(),
                })
            }
            _ => None,
        }
    }

    /// The UID bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Length of the UID in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a UID has at least four bytes.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Trailing four bytes, the part MIFARE authentication is keyed on.
    ///
    /// Double and triple size UIDs authenticate with their tail.
    pub fn auth_tail(&self) -> [u8; 4] {
        let mut tail = [0u8; 4];
        tail.copy_from_slice(&self.bytes[self.len - 4..self.len]);
        tail
    }
}

impl From<[u8; 4]> for Uid {
    fn from(bytes: [u8; 4]) -> Self {
        let mut buf = [0u8; MAX_UID_LEN];
        buf[..4].copy_from_slice(&bytes);
        Self { bytes: buf, len: 4 }
    }
}

impl From<[u8; 7]> for Uid {
    fn from(bytes: [u8; 7]) -> Self {
        let mut buf = [0u8; MAX_UID_LEN];
        buf[..7].copy_from_slice(&bytes);
        Self { bytes: buf, len: 7 }
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_slice()))
    }
}

/// One selected passive target and its anti-collision answers.
///
/// Owned by the caller; the card engines borrow it for the duration of a
/// single read or write operation. After any transceive failure the handle
/// is only valid again once passive selection has been re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// UID singled out during anti-collision.
    pub uid: Uid,
    /// Answer To Request, type A (2 bytes, transmission order).
    pub atqa: [u8; 2],
    /// Select Acknowledge byte.
    pub sak: u8,
}

impl Target {
    /// Whether the tag speaks the MIFARE Classic command set (SAK bit 3).
    pub const fn is_classic(&self) -> bool {
        self.sak & 0x08 != 0
    }

    /// Whether the tag is a MIFARE Ultralight (fixed ATQA answer).
    pub const fn is_ultralight(&self) -> bool {
        self.atqa[1] == 0x44
    }
}

/// Modulation type of a passive selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationType {
    /// ISO/IEC 14443-A
    Iso14443a,
}

/// Baud rate of a passive selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaudRate {
    /// 106 kbit/s
    Baud106,
}

/// Modulation and baud rate used to select a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulation {
    /// Modulation type.
    pub modulation_type: ModulationType,
    /// Baud rate.
    pub baud_rate: BaudRate,
}

/// The modulation every MIFARE exchange runs under.
pub const MIFARE_MODULATION: Modulation = Modulation {
    modulation_type: ModulationType::Iso14443a,
    baud_rate: BaudRate::Baud106,
};

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn uid_lengths() {
        assert!(Uid::new(&hex!("01020304")).is_some());
        assert!(Uid::new(&hex!("01020304050607")).is_some());
        assert!(Uid::new(&hex!("01020304050607080910")).is_some());
        assert!(Uid::new(&hex!("010203")).is_none());
        assert!(Uid::new(&hex!("0102030405")).is_none());
        assert!(Uid::new(&[]).is_none());
    }

    #[test]
    fn auth_tail_is_trailing_four_bytes() {
        let single = Uid::from(hex!("01020304"));
        assert_eq!(single.auth_tail(), hex!("01020304"));

        let double = Uid::from(hex!("04a1b2c3d4e5f6"));
        assert_eq!(double.auth_tail(), hex!("c3d4e5f6"));

        let triple = Uid::new(&hex!("01020304050607080910")).unwrap();
        assert_eq!(triple.auth_tail(), hex!("07080910"));
    }

    #[test]
    fn uid_display_is_hex() {
        let uid = Uid::from(hex!("deadbeef"));
        assert_eq!(uid.to_string(), "deadbeef");
    }

    #[test]
    fn classifies_classic_and_ultralight() {
        let classic = Target {
            uid: Uid::from([1, 2, 3, 4]),
            atqa: [0x00, 0x04],
            sak: 0x08,
        };
        assert!(classic.is_classic());
        assert!(!classic.is_ultralight());

        let classic_4k = Target {
            uid: Uid::from([1, 2, 3, 4]),
            atqa: [0x00, 0x02],
            sak: 0x18,
        };
        assert!(classic_4k.is_classic());

        let ultralight = Target {
            uid: Uid::new(&hex!("04a1b2c3d4e5f6")).unwrap(),
            atqa: [0x00, 0x44],
            sak: 0x00,
        };
        assert!(ultralight.is_ultralight());
        assert!(!ultralight.is_classic());
    }
}
