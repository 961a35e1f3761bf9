//! MIFARE Ultralight read engine
//!
//! Ultralight tags carry no sectors and need no authentication. A Read
//! command returns 16 bytes (four pages at once), so the sixteen pages
//! are fetched as four page groups. There is no recovery path: the first
//! failed read ends the operation, and no re-selection is attempted.

use nfcdump_core::{MifareCommand, ProgressEvent, ProgressObserver, Reader};
use tracing::{debug, warn};

use crate::error::{BlockOp, Error, Result};
use crate::image::{BLOCK_SIZE, PAGE_SIZE, ULTRALIGHT_PAGES, UltralightImage};

/// Pages per read unit: one Read command returns four pages.
const PAGES_PER_READ: usize = BLOCK_SIZE / PAGE_SIZE;

/// Read all sixteen pages of an Ultralight tag into `image`.
///
/// The observer gets one tick per page (four per successful group, none
/// for a failed one) and the accumulated tally on every exit.
pub fn read_card<R: Reader>(
    reader: &mut R,
    image: &mut UltralightImage,
    observer: &mut dyn ProgressObserver,
) -> Result<()> {
    let total = ULTRALIGHT_PAGES as u32;
    let mut read_pages = 0u32;

    debug!("reading {total} pages");
    let result = read_loop(reader, image, observer, &mut read_pages);
    observer.report(ProgressEvent::Summary {
        done: read_pages,
        total,
    });
    if result.is_ok() {
        debug!("done, {read_pages} of {total} pages read");
    }
    result
}

fn read_loop<R: Reader>(
    reader: &mut R,
    image: &mut UltralightImage,
    observer: &mut dyn ProgressObserver,
    read_pages: &mut u32,
) -> Result<()> {
    for group in 0..(ULTRALIGHT_PAGES / PAGES_PER_READ) {
        let page = (group * PAGES_PER_READ) as u8;

        // Try to read out the page group
        match reader.mifare_command(page, MifareCommand::Read) {
            Ok(data) if data.len() == BLOCK_SIZE => {
                let mut unit = [0u8; BLOCK_SIZE];
                unit.copy_from_slice(&data);
                image.set_page_group(page, &unit);
            }
            _ => {
                warn!("unable to read pages {page}..={}", page + 3);
                return Err(Error::BlockIo {
                    op: BlockOp::Read,
                    block: page,
                });
            }
        }

        for _ in 0..PAGES_PER_READ {
            observer.report(ProgressEvent::BlockOk);
            *read_pages += 1;
        }
    }
    Ok(())
}
