//! Entry selection: index arithmetic, distinct search and per-feed state.

pub mod controller;
pub mod distinct;
pub mod index;

pub use controller::FeedRotation;
pub use distinct::next_distinct;
pub use index::{
    clamp_index, day_of_year_index, ms_until_next_slot, next_circular, random_start,
    time_slot_index,
};
