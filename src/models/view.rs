//! Render contract types.
//!
//! A `View` is already-selected, already-validated data handed to the
//! presentation layer. The core never hands a renderer a raw feed.

/// Generic content card, the workhorse view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    /// Small label line above the content
    pub kicker: Option<String>,
    pub headline: Option<String>,
    pub body: Option<String>,
    /// Attribution or source line below the content
    pub meta: Option<String>,
    /// Outbound link, if the entry carries one
    pub link: Option<String>,
    /// Render the body emphasized (quotes)
    pub italic_body: bool,
    /// Whether the display should offer a user reload action
    pub reloadable: bool,
}

/// One selected view for the display region.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Branding state shown before the first navigation
    Intro { app_name: String },
    Card(Card),
    Holiday {
        kicker: String,
        date_line: String,
        title: String,
    },
    Events {
        kicker: String,
        headline: String,
        /// (year, description) pairs for today
        items: Vec<(String, String)>,
        /// Body shown instead of items when none exist for today
        empty_body: Option<String>,
    },
    /// Terminal state after exhausted retries
    Unavailable {
        kicker: String,
        headline: String,
        body: String,
    },
}
