//! Card capacity detection from anti-collision answers and a RATS probe
//!
//! ATQA and SAK narrow the capacity down; a RATS probe settles the one
//! ambiguous case (1K/2K versus MIFARE Plus 2K). Everything downstream
//! works with the *last block index*: total blocks are always
//! `last_block + 1`, and that convention starts here.

use bytes::Bytes;
use nfcdump_core::{Property, Reader, Target};
use tracing::debug;

use crate::error::{Error, Result};

/// ISO14443-4 RATS request: FSDI 5 (64 byte frames), CID 0.
const RATS: [u8; 2] = [0xE0, 0x50];

/// ATS bytes MIFARE Plus 2K cards answer RATS with.
const PLUS_2K_ATS: [u8; 4] = [0xC1, 0x05, 0x2F, 0x2F];

/// ATS of the second-generation magic emulation card.
const MAGIC2_ATS: [u8; 4] = [0xDA, 0xBC, 0x19, 0x10];

/// Capacity classification of a selected Classic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardClass {
    /// Index of the last addressable block; total blocks = `last_block + 1`.
    pub last_block: u8,
    /// Second-generation magic emulation card, recognized by its ATS.
    pub magic2: bool,
}

/// Classify a selected target's capacity.
///
/// The ATQA/SAK guess stands unless the RATS probe both succeeds and
/// matches the MIFARE Plus 2K signature. A tag that answers RATS has moved
/// to ISO14443-4, so the RF field is dropped and re-activated afterwards to
/// return it to ISO14443-3. Failing to restore the field is fatal; a
/// failed probe is not.
pub fn detect_card<R: Reader>(reader: &mut R, target: &Target) -> Result<CardClass> {
    let atqa_4k = target.atqa[1] & 0x02 == 0x02;

    // Guessing size
    let mut last_block = if atqa_4k {
        // 4K
        0xff
    } else if target.sak & 0x01 == 0x01 {
        // 320b
        0x13
    } else {
        // 1K/2K, checked through RATS
        0x3f
    };
    let mut magic2 = false;

    if let Some(ats) = probe_rats(reader)? {
        if ats.len() >= 10 && ats[5..9] == PLUS_2K_ATS && !atqa_4k {
            // MIFARE Plus 2K
            last_block = 0x7f;
        }
        if ats.len() == 9 && ats[5..9] == MAGIC2_ATS {
            magic2 = true;
        }
    }

    debug!(
        "guessing size: seems to be a {}-byte card",
        (u32::from(last_block) + 1) * 16
    );
    Ok(CardClass { last_block, magic2 })
}

/// Issue a RATS request with auto-framing disabled.
///
/// Returns the ATS when the tag answered, `None` when the probe could not
/// run or the tag stayed silent. Only a failure to toggle the RF field
/// back (after the tag already switched protocols) is an error.
fn probe_rats<R: Reader>(reader: &mut R) -> Result<Option<Bytes>> {
    // Use raw send/receive methods
    if reader.set_property(Property::EasyFraming, false).is_err() {
        return Ok(None);
    }
    let Ok(ats) = reader.transceive_raw(&RATS) else {
        return Ok(None);
    };
    if ats.is_empty() {
        return Ok(None);
    }

    // ISO14443-4 card, turn RF field off/on to access ISO14443-3 again
    reader
        .set_property(Property::ActivateField, false)
        .map_err(Error::FieldConfig)?;
    reader
        .set_property(Property::ActivateField, true)
        .map_err(Error::FieldConfig)?;

    Ok(Some(ats))
}
