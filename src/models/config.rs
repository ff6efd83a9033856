//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rotation and routing behavior settings
    #[serde(default)]
    pub kiosk: KioskConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Display labels and date vocabulary
    #[serde(default)]
    pub labels: Labels,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.kiosk.slot_hours == 0 {
            return Err(AppError::config("kiosk.slot_hours must be > 0"));
        }
        if self.kiosk.intro_ms == 0 {
            return Err(AppError::config("kiosk.intro_ms must be > 0"));
        }
        if self.kiosk.max_fallback_attempts == 0 {
            return Err(AppError::config("kiosk.max_fallback_attempts must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.labels.weekdays.len() != 7 {
            return Err(AppError::config("labels.weekdays must list 7 names"));
        }
        if self.labels.months.len() != 12 {
            return Err(AppError::config("labels.months must list 12 names"));
        }
        Ok(())
    }
}

/// Rotation and routing behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Slot length for time-slot rotated feeds, in hours
    #[serde(default = "defaults::slot_hours")]
    pub slot_hours: u64,

    /// Safety margin added when scheduling the next slot re-render, in ms
    #[serde(default = "defaults::slot_epsilon")]
    pub slot_epsilon_ms: u64,

    /// Duration of the intro branding state, in ms
    #[serde(default = "defaults::intro")]
    pub intro_ms: u64,

    /// Artificial delay before each feed fetch, in ms
    #[serde(default = "defaults::transition")]
    pub transition_ms: u64,

    /// Automatic holiday retries per navigation before giving up
    #[serde(default = "defaults::fallback_attempts")]
    pub max_fallback_attempts: u32,

    /// Directory holding the persisted rotation indices
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,

    /// Base URL serving `data/<feed>.json` (takes precedence over data_dir)
    #[serde(default)]
    pub data_url: Option<String>,

    /// Local directory holding `data/<feed>.json`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl KioskConfig {
    /// Slot length in milliseconds.
    pub fn slot_ms(&self) -> u64 {
        self.slot_hours * 60 * 60 * 1000
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            slot_hours: defaults::slot_hours(),
            slot_epsilon_ms: defaults::slot_epsilon(),
            intro_ms: defaults::intro(),
            transition_ms: defaults::transition(),
            max_fallback_attempts: defaults::fallback_attempts(),
            state_dir: defaults::state_dir(),
            data_url: None,
            data_dir: None,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Display labels and date vocabulary.
///
/// The kiosk originally shipped with a German audience, so the defaults are
/// German; all of them can be overridden in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Labels {
    /// Application name shown in the intro and fallback cards
    #[serde(default = "defaults::app_name")]
    pub app_name: String,

    /// Per-feed page labels, keyed by feed name
    #[serde(default = "defaults::page_labels")]
    pub pages: Vec<PageLabel>,

    /// Kicker line above the holiday entry
    #[serde(default = "defaults::today_kicker")]
    pub today_kicker: String,

    /// Headline prefix for the events view
    #[serde(default = "defaults::events_headline")]
    pub events_headline: String,

    /// Shown when the holiday feed has no entry for today
    #[serde(default = "defaults::no_holiday")]
    pub no_holiday: String,

    /// Shown when the events feed has no entry for today
    #[serde(default = "defaults::no_events")]
    pub no_events: String,

    /// Shown when a quote entry has no usable text
    #[serde(default = "defaults::no_quote")]
    pub no_quote: String,

    /// Attribution when a quote entry names nobody
    #[serde(default = "defaults::unknown_person")]
    pub unknown_person: String,

    /// Body of the generic fallback card
    #[serde(default = "defaults::fallback_body")]
    pub fallback_body: String,

    /// Headline of the terminal "content unavailable" card
    #[serde(default = "defaults::unavailable_headline")]
    pub unavailable_headline: String,

    /// Body of the terminal "content unavailable" card
    #[serde(default = "defaults::unavailable_body")]
    pub unavailable_body: String,

    /// Prefix for source attributions
    #[serde(default = "defaults::source_prefix")]
    pub source_prefix: String,

    /// Calendar week prefix in the holiday date line
    #[serde(default = "defaults::week_prefix")]
    pub week_prefix: String,

    /// Weekday names, Monday first
    #[serde(default = "defaults::weekdays")]
    pub weekdays: Vec<String>,

    /// Month names, January first
    #[serde(default = "defaults::months")]
    pub months: Vec<String>,
}

impl Labels {
    /// Display label for a feed name, falling back to the app name.
    pub fn page_label(&self, feed: &str) -> &str {
        self.pages
            .iter()
            .find(|p| p.feed == feed)
            .map(|p| p.label.as_str())
            .unwrap_or(&self.app_name)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            app_name: defaults::app_name(),
            pages: defaults::page_labels(),
            today_kicker: defaults::today_kicker(),
            events_headline: defaults::events_headline(),
            no_holiday: defaults::no_holiday(),
            no_events: defaults::no_events(),
            no_quote: defaults::no_quote(),
            unknown_person: defaults::unknown_person(),
            fallback_body: defaults::fallback_body(),
            unavailable_headline: defaults::unavailable_headline(),
            unavailable_body: defaults::unavailable_body(),
            source_prefix: defaults::source_prefix(),
            week_prefix: defaults::week_prefix(),
            weekdays: defaults::weekdays(),
            months: defaults::months(),
        }
    }
}

/// Display label for one feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLabel {
    pub feed: String,
    pub label: String,
}

mod defaults {
    use std::path::PathBuf;

    use super::PageLabel;

    pub fn slot_hours() -> u64 {
        12
    }

    pub fn slot_epsilon() -> u64 {
        50
    }

    pub fn intro() -> u64 {
        3000
    }

    pub fn transition() -> u64 {
        300
    }

    pub fn fallback_attempts() -> u32 {
        2
    }

    pub fn state_dir() -> PathBuf {
        PathBuf::from("state")
    }

    pub fn user_agent() -> String {
        format!("dailykiosk/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn app_name() -> String {
        "Daily Facts 4U".to_string()
    }

    pub fn page_labels() -> Vec<PageLabel> {
        [
            ("holiday", "Feiertage"),
            ("hackerquotes", "Hacker Quotes"),
            ("facts", "Fakten"),
            ("favquotes", "Zitate"),
            ("events", "Ereignisse"),
            ("need2know", "Unnützlich-Nützlich"),
        ]
        .into_iter()
        .map(|(feed, label)| PageLabel {
            feed: feed.to_string(),
            label: label.to_string(),
        })
        .collect()
    }

    pub fn today_kicker() -> String {
        "Heute:".to_string()
    }

    pub fn events_headline() -> String {
        "Was geschah am,".to_string()
    }

    pub fn no_holiday() -> String {
        "Kein Eintrag für heute.".to_string()
    }

    pub fn no_events() -> String {
        "Keine Ereignisse für heute.".to_string()
    }

    pub fn no_quote() -> String {
        "Kein Zitat verfügbar.".to_string()
    }

    pub fn unknown_person() -> String {
        "Unbekannt".to_string()
    }

    pub fn fallback_body() -> String {
        "Inhalt konnte nicht geladen werden.".to_string()
    }

    pub fn unavailable_headline() -> String {
        "Inhalte fehlen gerade".to_string()
    }

    pub fn unavailable_body() -> String {
        "Bitte Seite neu laden oder später erneut versuchen.".to_string()
    }

    pub fn source_prefix() -> String {
        "Quelle:".to_string()
    }

    pub fn week_prefix() -> String {
        "KW".to_string()
    }

    pub fn weekdays() -> Vec<String> {
        [
            "Montag",
            "Dienstag",
            "Mittwoch",
            "Donnerstag",
            "Freitag",
            "Samstag",
            "Sonntag",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn months() -> Vec<String> {
        [
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
