// src/error.rs

//! Unified error handling for the kiosk application.

use std::fmt;

use thiserror::Error;

/// Result type alias for kiosk operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feed fetch or parse error
    #[error("Feed error for '{feed}': {message}")]
    Feed { feed: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a feed error with the feed name as context.
    pub fn feed(feed: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Feed {
            feed: feed.into(),
            message: message.to_string(),
        }
    }
}
