// src/models/mod.rs

//! Domain models for the kiosk application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod feed;
mod view;

// Re-export all public types
pub use config::{Config, HttpConfig, KioskConfig, Labels, PageLabel};
pub use feed::{
    EventDay, EventItem, FactEntry, FeedData, FeedKind, NeedToKnowEntry, QuoteEntry, YearField,
};
pub use view::{Card, View};
