//! MIFARE Classic full-card read and write engines
//!
//! One small state machine per direction. Reads walk from the highest
//! block down to 0 so each sector is entered through its trailer; writes
//! walk up from 0 so a sector's data blocks are written while the old
//! access bits still allow it, with the trailer last. Authentication
//! happens at every sector boundary, and a failed exchange forces a fresh
//! anti-collision before the next sector is touched.
//!
//! There is no partial-success mode: the first block that stays unreadable
//! or unwritable ends the whole operation.

use nfcdump_core::{MIFARE_MODULATION, MifareCommand, ProgressEvent, ProgressObserver, Reader, Target};
use tracing::{debug, error, warn};

use crate::auth::Authenticator;
use crate::error::{BlockOp, Error, Result};
use crate::geometry::{is_first_block, is_trailer_block};
use crate::image::{BLOCK_SIZE, ClassicImage, Trailer};
use crate::keys::{DEFAULT_KEYS, Key, KeyType};

/// Full-card engine for MIFARE Classic tags.
///
/// The engine only carries the authentication policy; the reader, target
/// and image are borrowed per call, and one call is one full traversal.
#[derive(Debug, Clone)]
pub struct ClassicEngine<'a> {
    auth: Authenticator<'a>,
}

impl<'a> ClassicEngine<'a> {
    /// Engine authenticating with `key_type` and the well-known default
    /// dictionary.
    pub const fn new(key_type: KeyType) -> Self {
        Self {
            auth: Authenticator::with_dictionary(key_type, &DEFAULT_KEYS),
        }
    }

    /// Engine authenticating with one caller-supplied key per sector.
    pub const fn with_key(key_type: KeyType, key: Key) -> Self {
        Self {
            auth: Authenticator::with_key(key_type, key),
        }
    }

    /// Engine sweeping a caller-supplied dictionary.
    pub const fn with_dictionary(key_type: KeyType, dictionary: &'a [Key]) -> Self {
        Self {
            auth: Authenticator::with_dictionary(key_type, dictionary),
        }
    }

    /// Read blocks `last_block..=0` into `image`.
    ///
    /// An authentication failure or a lost tag aborts immediately; so, one
    /// check later, does any failed block transfer. The observer sees one
    /// tick per block and the accumulated tally on every exit.
    pub fn read_card<R: Reader>(
        &self,
        reader: &mut R,
        target: &Target,
        last_block: u8,
        image: &mut ClassicImage,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let total = u32::from(last_block) + 1;
        let mut read_blocks = 0u32;

        debug!("reading out {total} blocks");
        let result = self.read_loop(reader, target, last_block, image, observer, &mut read_blocks);
        observer.report(ProgressEvent::Summary {
            done: read_blocks,
            total,
        });
        if result.is_ok() {
            debug!("done, {read_blocks} of {total} blocks read");
        }
        result
    }

    fn read_loop<R: Reader>(
        &self,
        reader: &mut R,
        target: &Target,
        last_block: u8,
        image: &mut ClassicImage,
        observer: &mut dyn ProgressObserver,
        read_blocks: &mut u32,
    ) -> Result<()> {
        let mut failure = false;

        // Read the card from end to begin
        for block in (0..=last_block).rev() {
            // Authenticate every time we reach a trailer block
            if is_trailer_block(block) {
                if failure {
                    // When a failure occurred we need to redo the anti-collision
                    reselect(reader)?;
                    failure = false;
                }

                // Try to authenticate for the current sector
                if !self.auth.authenticate(reader, target, block)? {
                    error!("authentication failed for block 0x{block:02x}");
                    return Err(Error::AuthenticationFailed { block });
                }
                // Try to read out the trailer
                if reader.mifare_command(block, MifareCommand::Read).is_err() {
                    warn!("failed to read trailer block 0x{block:02x}");
                    failure = true;
                }
            } else if !failure {
                // Try to read out the data block
                match reader.mifare_command(block, MifareCommand::Read) {
                    Ok(data) if data.len() == BLOCK_SIZE => {
                        image.block_mut(block).copy_from_slice(&data);
                    }
                    _ => {
                        warn!("unable to read block 0x{block:02x}");
                        failure = true;
                    }
                }
            }

            // Show whether the readout went well for each block
            if failure {
                observer.report(ProgressEvent::BlockFailed);
                return Err(Error::BlockIo {
                    op: BlockOp::Read,
                    block,
                });
            }
            observer.report(ProgressEvent::BlockOk);
            *read_blocks += 1;
        }
        Ok(())
    }

    /// Write `image` to the card, blocks `0..=last_block`.
    ///
    /// Block 0 is never written (the manufacturer block is read-only on
    /// genuine cards), but its checksum is validated before the first
    /// frame goes out: a dump whose BCC is wrong must never get anywhere
    /// near a card that *would* accept block 0.
    pub fn write_card<R: Reader>(
        &self,
        reader: &mut R,
        target: &Target,
        last_block: u8,
        image: &ClassicImage,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let total = u32::from(last_block) + 1;
        let mut written_blocks = 0u32;

        debug!("writing {total} blocks");
        let result = self.write_loop(
            reader,
            target,
            last_block,
            image,
            observer,
            &mut written_blocks,
        );
        observer.report(ProgressEvent::Summary {
            done: written_blocks,
            total,
        });
        if result.is_ok() {
            debug!("done, {written_blocks} of {total} blocks written");
        }
        result
    }

    fn write_loop<R: Reader>(
        &self,
        reader: &mut R,
        target: &Target,
        last_block: u8,
        image: &ClassicImage,
        observer: &mut dyn ProgressObserver,
        written_blocks: &mut u32,
    ) -> Result<()> {
        // Do not write a block 0 with an incorrect BCC - the card would be
        // made invalid. Checked before anything is transceived.
        if !image.manufacturer_bcc_ok() {
            let expected = image.expected_bcc();
            error!("incorrect BCC in dump, expecting BCC 0x{expected:02X}");
            return Err(Error::ChecksumInvalid { expected });
        }

        let mut failure = false;

        // Write the card from begin to end
        for block in 0..=last_block {
            // Authenticate every time we enter a new sector
            if is_first_block(block) {
                if failure {
                    // When a failure occurred we need to redo the anti-collision
                    reselect(reader)?;
                    failure = false;
                }

                // Try to authenticate for the current sector
                if !self.auth.authenticate(reader, target, block)? {
                    error!("authentication failed for block 0x{block:02x}");
                    return Err(Error::AuthenticationFailed { block });
                }
            }

            if is_trailer_block(block) {
                // Take the keys and access bits through their structured
                // form rather than aliasing the raw block.
                let data = Trailer::decode(image.block(block)).encode();
                if reader
                    .mifare_command(block, MifareCommand::Write(&data))
                    .is_err()
                {
                    warn!("failed to write trailer block 0x{block:02x}");
                    failure = true;
                }
            } else {
                // The first block 0x00 is read only, skip this
                if block == 0 {
                    continue;
                }

                // Make sure an earlier write did not fail
                if !failure
                    && reader
                        .mifare_command(block, MifareCommand::Write(image.block(block)))
                        .is_err()
                {
                    warn!("unable to write block 0x{block:02x}");
                    failure = true;
                }
            }

            // Show whether the write went well for each block
            if failure {
                observer.report(ProgressEvent::BlockFailed);
                return Err(Error::BlockIo {
                    op: BlockOp::Write,
                    block,
                });
            }
            observer.report(ProgressEvent::BlockOk);
            *written_blocks += 1;
        }
        Ok(())
    }
}

/// Redo the anti-collision after a failed exchange left the tag
/// deselected. Failing here means the tag is gone.
fn reselect<R: Reader>(reader: &mut R) -> Result<()> {
    match reader.select_passive_target(MIFARE_MODULATION, None) {
        Ok(_) => Ok(()),
        Err(_) => {
            error!("tag was removed");
            Err(Error::TagRemoved)
        }
    }
}
