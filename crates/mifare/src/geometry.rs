//! Sector geometry of the two MIFARE Classic layouts
//!
//! Blocks 0..=127 sit in 4-block sectors, blocks 128..=255 in 16-block
//! sectors. Sector boundaries are never stored anywhere; everything here is
//! a pure function of the block index, total over `0..=255`.

/// Whether `block` is the first block of its sector.
pub const fn is_first_block(block: u8) -> bool {
    // Test if we are in the small or the big sectors
    if block < 128 {
        block % 4 == 0
    } else {
        block % 16 == 0
    }
}

/// Whether `block` is its sector's trailer (last) block.
pub const fn is_trailer_block(block: u8) -> bool {
    if block < 128 {
        (block as u16 + 1) % 4 == 0
    } else {
        (block as u16 + 1) % 16 == 0
    }
}

/// Trailer block index of the sector containing `block`.
pub const fn trailer_of(block: u8) -> u8 {
    if block < 128 {
        block + (3 - block % 4)
    } else {
        block + (15 - block % 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailer_blocks_follow_the_layout_split() {
        for block in 0u8..128 {
            assert_eq!(is_trailer_block(block), (u16::from(block) + 1) % 4 == 0);
        }
        for block in 128u8..=255 {
            assert_eq!(is_trailer_block(block), (u16::from(block) + 1) % 16 == 0);
        }
    }

    #[test]
    fn first_blocks_follow_the_layout_split() {
        for block in 0u8..128 {
            assert_eq!(is_first_block(block), block % 4 == 0);
        }
        for block in 128u8..=255 {
            assert_eq!(is_first_block(block), block % 16 == 0);
        }
    }

    #[test]
    fn trailer_of_maps_every_block_of_a_sector_to_the_same_trailer() {
        for block in 0u8..=255 {
            let trailer = trailer_of(block);
            assert!(is_trailer_block(trailer));
            // Idempotent: the trailer's own trailer is itself.
            assert_eq!(trailer_of(trailer), trailer);
            // The mapping never leaves the sector.
            assert!(trailer >= block);
            if block < 128 {
                assert!(trailer - block < 4);
            } else {
                assert!(trailer - block < 16);
            }
        }
    }

    #[test]
    fn small_and_large_sector_counts() {
        let small_trailers = (0u8..128).filter(|&b| is_trailer_block(b)).count();
        let large_trailers = (128u8..=255).filter(|&b| is_trailer_block(b)).count();
        assert_eq!(small_trailers, 32);
        assert_eq!(large_trailers, 8);
    }
}
