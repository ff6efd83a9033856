//! Services fetching feed documents from the outside world.

pub mod feeds;

pub use feeds::{DirFeedSource, FeedSource, HttpFeedSource, load_feed};
