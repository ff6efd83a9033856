// src/rotation/index.rs

//! Pure index arithmetic for entry selection.
//!
//! Every function here is total over its inputs: empty feeds, absent or
//! stale indices all resolve to a valid in-range index (or 0). Stored and
//! externally supplied indices must pass through [`clamp_index`] before
//! being used to index into a feed.

use rand::Rng;

/// Index for a time-slot rotated feed: `(now / slot) % length`.
///
/// Two clients computing this at the same wall-clock moment with the same
/// feed obtain the same index, with no coordination. The result changes
/// only when the clock crosses a slot boundary.
pub fn time_slot_index(length: usize, now_ms: u64, slot_ms: u64) -> usize {
    if length == 0 || slot_ms == 0 {
        return 0;
    }
    ((now_ms / slot_ms) % length as u64) as usize
}

/// Milliseconds from `now_ms` until the next slot boundary.
///
/// Callers add a small epsilon before scheduling so the re-render lands
/// just after the boundary, never just before it.
pub fn ms_until_next_slot(now_ms: u64, slot_ms: u64) -> u64 {
    if slot_ms == 0 {
        return 0;
    }
    slot_ms - now_ms % slot_ms
}

/// Index for a once-per-calendar-day selection: `ordinal % length`.
pub fn day_of_year_index(length: usize, ordinal: u32) -> usize {
    if length == 0 {
        return 0;
    }
    (ordinal as usize) % length
}

/// The circular successor of `current`, or 0 when there is no valid
/// current index or the feed is empty.
pub fn next_circular(length: usize, current: Option<usize>) -> usize {
    if length == 0 {
        return 0;
    }
    match current {
        Some(current) => (current + 1) % length,
        None => 0,
    }
}

/// Uniformly random index in `[0, length)`, or 0 for an empty feed.
pub fn random_start(length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    rand::rng().random_range(0..length)
}

/// Restrict an untrusted index to `[0, length)`.
///
/// Negative input defaults to 0; an empty feed always yields 0.
pub fn clamp_index(length: usize, index: i64) -> usize {
    if length == 0 {
        return 0;
    }
    if index < 0 {
        return 0;
    }
    (index as usize).min(length - 1)
}
