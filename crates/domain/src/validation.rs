//! Validation engine for one day's block list
//!
//! Pure functions. Every write to a `DayAvailability` goes through
//! [`validate_block_set`]; the edit controller uses [`validate_candidate`] to
//! check a dragged block against the rest of its day without comparing the
//! block to itself.
//!
//! Checks run in a fixed order and stop at the first violation:
//! 1. block count (`TooManyBlocks`)
//! 2. per block, in input order: `InvalidRange`, then `BlockTooShort`
//! 3. all-pairs overlap scan (`Overlap`), lowest `(i, j)` pair first

use crate::constants::{MAX_BLOCKS_PER_DAY, MIN_BLOCK_MINUTES};
use crate::errors::Violation;
use crate::types::time::TimeInterval;

/// Validate a complete candidate block list for a single day.
pub fn validate_block_set(blocks: &[TimeInterval]) -> Result<(), Violation> {
    if blocks.len() > MAX_BLOCKS_PER_DAY {
        return Err(Violation::TooManyBlocks);
    }

    for (index, block) in blocks.iter().enumerate() {
        check_shape(index, *block)?;
    }

    match first_overlap(blocks) {
        Some((index_a, index_b)) => Err(Violation::Overlap { index_a, index_b }),
        None => Ok(()),
    }
}

/// Validate one block against the other blocks of its day.
///
/// `others` must not contain the candidate itself. The candidate is reported
/// as index `others.len()`, i.e. as if appended to `others`.
pub fn validate_candidate(others: &[TimeInterval], candidate: TimeInterval) -> Result<(), Violation> {
    let candidate_index = others.len();
    check_shape(candidate_index, candidate)?;

    if let Some(index) = others.iter().position(|other| other.overlaps(candidate)) {
        return Err(Violation::Overlap { index_a: index, index_b: candidate_index });
    }

    if others.len() + 1 > MAX_BLOCKS_PER_DAY {
        return Err(Violation::TooManyBlocks);
    }

    Ok(())
}

/// Range and minimum-duration check for a single block.
pub fn check_shape(index: usize, block: TimeInterval) -> Result<(), Violation> {
    if !block.is_well_formed() {
        return Err(Violation::InvalidRange { index });
    }
    if block.duration_minutes() < MIN_BLOCK_MINUTES {
        return Err(Violation::BlockTooShort { index });
    }
    Ok(())
}

/// First overlapping pair `(i, j)` with `i < j`, scanning every pair.
///
/// Deliberately not a sort-and-compare-neighbours pass: the indices must point
/// into the caller's original ordering.
pub fn first_overlap(blocks: &[TimeInterval]) -> Option<(usize, usize)> {
    blocks.iter().enumerate().find_map(|(i, a)| {
        blocks[i + 1..].iter().position(|b| a.overlaps(*b)).map(|offset| (i, i + 1 + offset))
    })
}

/// Whether a day holding `count` blocks can take one more.
pub const fn has_room_for_another(count: usize) -> bool {
    count < MAX_BLOCKS_PER_DAY
}
