//! Per-sector authentication with an explicit key or a key dictionary

use nfcdump_core::{MIFARE_MODULATION, MifareCommand, Reader, Target};
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::keys::{Key, KeyType};

/// Sector authenticator: one caller-supplied key, or a brute-force sweep
/// of an injected dictionary.
///
/// A failed attempt can leave the transceiver and tag out of sync, so the
/// target is re-selected by its full UID after every failure before
/// anything else is tried. Retry policy beyond one sweep belongs to the
/// caller, who re-invokes per sector.
#[derive(Debug, Clone)]
pub struct Authenticator<'a> {
    key_type: KeyType,
    key: Option<Key>,
    dictionary: &'a [Key],
}

impl<'a> Authenticator<'a> {
    /// Authenticator that tries `dictionary` in table order.
    pub const fn with_dictionary(key_type: KeyType, dictionary: &'a [Key]) -> Self {
        Self {
            key_type,
            key: None,
            dictionary,
        }
    }

    /// Authenticator that uses one explicit key.
    pub const fn with_key(key_type: KeyType, key: Key) -> Self {
        Self {
            key_type,
            key: Some(key),
            dictionary: &[],
        }
    }

    /// Establish a session for the sector containing `block`.
    ///
    /// `Ok(false)` means no key opened the sector. Which dictionary entry
    /// matched is deliberately not reported; callers only need to know
    /// whether they may proceed.
    ///
    /// # Errors
    /// [`Error::TagRemoved`] when the tag cannot be re-selected between
    /// attempts, a different condition from a plain refused key.
    pub fn authenticate<R: Reader>(
        &self,
        reader: &mut R,
        target: &Target,
        block: u8,
    ) -> Result<bool> {
        // Authentication is keyed on the trailing four UID bytes.
        let uid = target.uid.auth_tail();

        if let Some(key) = &self.key {
            if reader.mifare_command(block, self.command(key, uid)).is_ok() {
                return Ok(true);
            }
            // Recover from any desync before reporting the failure.
            self.reselect(reader, target)?;
            return Ok(false);
        }

        // No key given, try to guess the right one.
        for key in self.dictionary {
            trace!(block, %key, "trying dictionary key");
            if reader.mifare_command(block, self.command(key, uid)).is_ok() {
                return Ok(true);
            }
            self.reselect(reader, target)?;
        }
        Ok(false)
    }

    fn command<'k>(&self, key: &'k Key, uid: [u8; 4]) -> MifareCommand<'k> {
        match self.key_type {
            KeyType::A => MifareCommand::AuthenticateA {
                key: key.as_bytes(),
                uid,
            },
            KeyType::B => MifareCommand::AuthenticateB {
                key: key.as_bytes(),
                uid,
            },
        }
    }

    fn reselect<R: Reader>(&self, reader: &mut R, target: &Target) -> Result<()> {
        match reader.select_passive_target(MIFARE_MODULATION, Some(target.uid.as_slice())) {
            Ok(_) => Ok(()),
            Err(_) => {
                warn!("tag was removed");
                Err(Error::TagRemoved)
            }
        }
    }
}
