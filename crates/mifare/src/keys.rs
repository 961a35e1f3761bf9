//! MIFARE Classic sector keys and the well-known default dictionary

use core::fmt;
use core::str::FromStr;

/// Length in bytes of a MIFARE Classic sector key.
pub const KEY_SIZE: usize = 6;

/// A six byte MIFARE Classic sector key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key([u8; KEY_SIZE]);

impl Key {
    /// Key from its six raw bytes.
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; KEY_SIZE]> for Key {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Key {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; KEY_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Which of the two sector keys to authenticate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Key A
    A,
    /// Key B
    B,
}

/// Well-known default keys, tried in exactly this order when no explicit
/// key is supplied.
///
/// The order matters: `FFFFFFFFFFFF` is the transport key virtually every
/// blank card ships with, so it goes first. Callers may pass any other
/// dictionary to the authenticator; this table is only the default.
pub const DEFAULT_KEYS: [Key; 9] = [
    Key::new([0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
    Key::new([0xd3, 0xf7, 0xd3, 0xf7, 0xd3, 0xf7]),
    Key::new([0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5]),
    Key::new([0xb0, 0xb1, 0xb2, 0xb3, 0xb4, 0xb5]),
    Key::new([0x4d, 0x3a, 0x99, 0xc3, 0x51, 0xdd]),
    Key::new([0x1a, 0x98, 0x2c, 0x7e, 0x45, 0x9a]),
    Key::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]),
    Key::new([0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    Key::new([0xab, 0xcd, 0xef, 0x12, 0x34, 0x56]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn display_and_parse_round_trip() {
        let key = Key::new(hex!("a0a1a2a3a4a5"));
        assert_eq!(key.to_string(), "a0a1a2a3a4a5");
        assert_eq!("a0a1a2a3a4a5".parse::<Key>().unwrap(), key);
        assert_eq!("A0A1A2A3A4A5".parse::<Key>().unwrap(), key);
    }

    #[test]
    fn parse_rejects_wrong_lengths() {
        assert!("a0a1a2a3a4".parse::<Key>().is_err());
        assert!("a0a1a2a3a4a5a6".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn dictionary_order_is_fixed() {
        assert_eq!(DEFAULT_KEYS.len(), 9);
        assert_eq!(DEFAULT_KEYS[0], Key::new(hex!("ffffffffffff")));
        assert_eq!(DEFAULT_KEYS[1], Key::new(hex!("d3f7d3f7d3f7")));
        assert_eq!(DEFAULT_KEYS[2], Key::new(hex!("a0a1a2a3a4a5")));
        assert_eq!(DEFAULT_KEYS[8], Key::new(hex!("abcdef123456")));
    }
}
