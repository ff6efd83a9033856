// src/rotation/distinct.rs

//! Distinct selection: forward search for the next entry whose normalized
//! content differs from the current one.

use crate::rotation::index::{clamp_index, next_circular};

/// Find the next index whose signature differs from the one at `current`.
///
/// Walks forward circularly at most `items.len()` steps. When every entry
/// shares the same signature (or the feed has a single entry) the clamped
/// start is returned unchanged; that is the no-repeat-found terminal case,
/// not an error. Terminates in O(len) and never indexes out of bounds.
pub fn next_distinct<T, F>(items: &[T], current: usize, signature: F) -> usize
where
    F: Fn(&T) -> String,
{
    if items.is_empty() {
        return 0;
    }
    let start = clamp_index(items.len(), current as i64);
    let current_signature = signature(&items[start]);
    let mut next = start;
    for _ in 0..items.len() {
        next = next_circular(items.len(), Some(next));
        if signature(&items[next]) != current_signature {
            return next;
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_adjacent_duplicate() {
        let items = ["a", "a", "b", "a"];
        assert_eq!(next_distinct(&items, 0, |s| s.to_string()), 2);
        assert_eq!(next_distinct(&items, 2, |s| s.to_string()), 3);
    }

    #[test]
    fn test_result_differs_when_two_signatures_exist() {
        let items = ["x", "x", "x", "y"];
        for start in 0..items.len() {
            let next = next_distinct(&items, start, |s| s.to_string());
            assert_ne!(items[next], items[start]);
        }
    }

    #[test]
    fn test_homogeneous_feed_returns_start() {
        let items = ["same", "same", "same"];
        for start in 0..items.len() {
            assert_eq!(next_distinct(&items, start, |s| s.to_string()), start);
        }
    }

    #[test]
    fn test_single_entry_returns_start() {
        let items = ["only"];
        assert_eq!(next_distinct(&items, 0, |s| s.to_string()), 0);
    }

    #[test]
    fn test_empty_feed() {
        let items: [&str; 0] = [];
        assert_eq!(next_distinct(&items, 3, |s| s.to_string()), 0);
    }

    #[test]
    fn test_stale_start_is_clamped() {
        let items = ["a", "b"];
        // start index beyond the feed clamps to the last entry
        assert_eq!(next_distinct(&items, 99, |s| s.to_string()), 0);
    }
}
