//! Feed kinds and entry data structures.
//!
//! Each feed is a single JSON document fetched from `data/<name>.json`.
//! A feed is immutable once parsed for a given load cycle; entry identity
//! is its position in the sequence as loaded.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// The feed kinds the router knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Holiday,
    HackerQuotes,
    Facts,
    FavQuotes,
    Events,
    NeedToKnow,
}

impl FeedKind {
    pub const ALL: [FeedKind; 6] = [
        FeedKind::Holiday,
        FeedKind::HackerQuotes,
        FeedKind::Facts,
        FeedKind::FavQuotes,
        FeedKind::Events,
        FeedKind::NeedToKnow,
    ];

    /// Resolve a navigation fragment to a known feed kind.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        match fragment {
            "holiday" => Some(Self::Holiday),
            "hackerquotes" => Some(Self::HackerQuotes),
            "facts" => Some(Self::Facts),
            "favquotes" => Some(Self::FavQuotes),
            "events" => Some(Self::Events),
            "need2know" => Some(Self::NeedToKnow),
            _ => None,
        }
    }

    /// Canonical feed name, also the JSON file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::HackerQuotes => "hackerquotes",
            Self::Facts => "facts",
            Self::FavQuotes => "favquotes",
            Self::Events => "events",
            Self::NeedToKnow => "need2know",
        }
    }

    /// Durable store key for feeds with persisted rotation.
    pub fn store_key(&self) -> Option<&'static str> {
        match self {
            Self::Facts => Some("facts.index"),
            Self::NeedToKnow => Some("need2know.index"),
            _ => None,
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A year field that some datasets store as a number and others as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Num(i64),
    Text(String),
}

impl fmt::Display for YearField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A quote entry, shared by the hackerquotes and favquotes feeds.
///
/// The two datasets attribute differently: hackerquotes name a `character`
/// with `title` and `year`, favquotes name a `person` with a `source` link.
/// All fields except the quote text are optional on the wire; a missing
/// quote degrades at view-build time instead of failing the whole feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteEntry {
    #[serde(default)]
    pub quote: Option<String>,

    #[serde(default)]
    pub person: Option<String>,

    #[serde(default)]
    pub character: Option<String>,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub year: Option<YearField>,
}

/// A fact entry. Headline and text are required for display but kept
/// optional at parse time so one malformed entry cannot poison the feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactEntry {
    #[serde(default)]
    pub headline: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub source: Option<String>,
}

/// A need-to-know entry, which arrives in one of two field sets.
///
/// The variants are resolved once at parse time; anything matching neither
/// shape lands in `Unrecognized` and renders as the generic fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NeedToKnowEntry {
    Sourced {
        headline: String,
        text: String,
        #[serde(default)]
        source: Option<String>,
    },
    Linked {
        titel: String,
        description: String,
        #[serde(default)]
        link: Option<String>,
    },
    Unrecognized(serde_json::Value),
}

impl NeedToKnowEntry {
    /// Outbound link, if the entry carries one.
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Sourced { source, .. } => source.as_deref(),
            Self::Linked { link, .. } => link.as_deref(),
            Self::Unrecognized(_) => None,
        }
    }
}

/// One calendar day of historical events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDay {
    /// Day key in `DD.MM` format
    #[serde(rename = "datum")]
    pub date_key: String,

    #[serde(rename = "ereignisse", default)]
    pub events: Vec<EventItem>,
}

/// A single historical event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    #[serde(rename = "jahr")]
    pub year: YearField,

    #[serde(rename = "beschreibung")]
    pub description: String,
}

/// A parsed feed document.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedData {
    /// `DD.MM` day key mapped to a holiday title
    Holiday(BTreeMap<String, String>),
    /// Quote array (hackerquotes or favquotes)
    Quotes(Vec<QuoteEntry>),
    Facts(Vec<FactEntry>),
    NeedToKnow(Vec<NeedToKnowEntry>),
    Events(Vec<EventDay>),
    /// Unrecognized fragment: raw JSON for the generic display
    Other(serde_json::Value),
}

impl FeedData {
    /// Parse a fetched document according to the feed kind.
    ///
    /// Unknown fragments (`kind == None`) parse as raw JSON. Any decode
    /// failure maps to a feed error so the router treats it like a fetch
    /// failure, which is the retry path.
    pub fn parse(kind: Option<FeedKind>, fragment: &str, raw: &[u8]) -> Result<Self> {
        let map_err = |e: serde_json::Error| AppError::feed(fragment, e);
        let data = match kind {
            Some(FeedKind::Holiday) => Self::Holiday(serde_json::from_slice(raw).map_err(map_err)?),
            Some(FeedKind::HackerQuotes) | Some(FeedKind::FavQuotes) => {
                Self::Quotes(serde_json::from_slice(raw).map_err(map_err)?)
            }
            Some(FeedKind::Facts) => Self::Facts(serde_json::from_slice(raw).map_err(map_err)?),
            Some(FeedKind::NeedToKnow) => {
                Self::NeedToKnow(serde_json::from_slice(raw).map_err(map_err)?)
            }
            Some(FeedKind::Events) => Self::Events(serde_json::from_slice(raw).map_err(map_err)?),
            None => Self::Other(serde_json::from_slice(raw).map_err(map_err)?),
        };
        Ok(data)
    }
}
