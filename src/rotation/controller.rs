// src/rotation/controller.rs

//! Per-feed rotation state.
//!
//! A [`FeedRotation`] owns the cached entries and the current index for one
//! rotating feed kind and is mutated only through the selection operations
//! below. Persistence stays outside: the persisted strategy takes the
//! stored index as input and the caller writes the chosen index back, so
//! the controller itself never performs I/O.

use crate::rotation::distinct::next_distinct;
use crate::rotation::index::{day_of_year_index, next_circular, random_start, time_slot_index};

/// Cache and current index for one rotating feed.
#[derive(Debug, Default)]
pub struct FeedRotation<T> {
    cache: Vec<T>,
    current: Option<usize>,
}

impl<T> FeedRotation<T> {
    pub fn new() -> Self {
        Self {
            cache: Vec::new(),
            current: None,
        }
    }

    /// Replace the cached feed for a new load cycle. Clears the current
    /// index; a selection operation must run before the next display.
    pub fn set_cache(&mut self, items: Vec<T>) {
        self.cache = items;
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// The entry currently selected for display, if any.
    pub fn current(&self) -> Option<&T> {
        self.current.map(|i| &self.cache[i])
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Select by wall-clock slot. Used by globally synchronized feeds.
    pub fn select_slot(&mut self, now_ms: u64, slot_ms: u64) -> Option<&T> {
        if self.cache.is_empty() {
            self.current = None;
            return None;
        }
        self.current = Some(time_slot_index(self.cache.len(), now_ms, slot_ms));
        self.current()
    }

    /// Select by day of year. Deterministic for a given date.
    pub fn select_daily(&mut self, ordinal: u32) -> Option<&T> {
        if self.cache.is_empty() {
            self.current = None;
            return None;
        }
        self.current = Some(day_of_year_index(self.cache.len(), ordinal));
        self.current()
    }

    /// Select from a persisted index.
    ///
    /// A stored index advances once, so a fresh session shows the entry
    /// *after* the one last seen; no stored index picks a random start.
    /// Stale indices from a shrunk feed are wrapped and clamped, never
    /// indexed out of bounds.
    pub fn select_persisted(&mut self, stored: Option<u64>) -> Option<&T> {
        if self.cache.is_empty() {
            self.current = None;
            return None;
        }
        let length = self.cache.len() as u64;
        let index = match stored {
            // (stored + 1) mod length, written overflow-safe for absurd
            // stored values
            Some(stored) => ((stored % length + 1) % length) as usize,
            None => random_start(self.cache.len()),
        };
        self.current = Some(index);
        self.current()
    }

    /// Advance to the circular successor. Used by user reloads on
    /// persisted-rotation feeds.
    pub fn advance(&mut self) -> Option<&T> {
        if self.cache.is_empty() {
            self.current = None;
            return None;
        }
        self.current = Some(next_circular(self.cache.len(), self.current));
        self.current()
    }

    /// Advance to the next entry with a differing signature. Used by user
    /// reloads on daily feeds; a homogeneous feed redisplays the same
    /// entry rather than looping.
    pub fn advance_distinct<F>(&mut self, signature: F) -> Option<&T>
    where
        F: Fn(&T) -> String,
    {
        if self.cache.is_empty() {
            self.current = None;
            return None;
        }
        let start = self.current.unwrap_or(0);
        self.current = Some(next_distinct(&self.cache, start, signature));
        self.current()
    }
}
