// src/views.rs

//! View builders: turn a selected feed entry into display-ready data.
//!
//! Builders that return `Option` yield `None` when the entry is missing
//! required fields; callers fall back to [`fallback_card`] instead of
//! failing the display.

use chrono::NaiveDate;

use crate::models::{
    Card, EventDay, FactEntry, Labels, NeedToKnowEntry, QuoteEntry, View,
};
use crate::utils::date::{day_month_key, events_date_line, holiday_date_line};
use crate::utils::text::{normalize_quote_text, strip_citations};

/// Generic fallback card for empty or malformed content.
pub fn fallback_card(labels: &Labels, fragment: &str) -> View {
    View::Card(Card {
        kicker: Some(labels.page_label(fragment).to_string()),
        body: Some(labels.fallback_body.clone()),
        ..Card::default()
    })
}

/// Generic display for unrecognized fragments: shows the document's
/// `content` string when present, the fallback body otherwise.
pub fn generic_view(labels: &Labels, fragment: &str, value: &serde_json::Value) -> View {
    let body = value
        .get("content")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| labels.fallback_body.clone());
    View::Card(Card {
        kicker: Some(labels.page_label(fragment).to_string()),
        body: Some(body),
        ..Card::default()
    })
}

/// Today's holiday entry, or the no-entry title.
pub fn holiday_view(
    labels: &Labels,
    date: NaiveDate,
    entries: &std::collections::BTreeMap<String, String>,
) -> View {
    let title = entries
        .get(&day_month_key(date))
        .cloned()
        .unwrap_or_else(|| labels.no_holiday.clone());
    View::Holiday {
        kicker: labels.today_kicker.clone(),
        date_line: holiday_date_line(date, labels),
        title,
    }
}

/// Historical events for today's calendar day.
pub fn events_view(labels: &Labels, date: NaiveDate, days: &[EventDay]) -> View {
    let key = day_month_key(date);
    let items: Vec<(String, String)> = days
        .iter()
        .find(|d| d.date_key == key)
        .map(|day| {
            day.events
                .iter()
                .map(|e| (e.year.to_string(), e.description.clone()))
                .collect()
        })
        .unwrap_or_default();

    let empty_body = items.is_empty().then(|| labels.no_events.clone());
    View::Events {
        kicker: labels.page_label("events").to_string(),
        headline: format!(
            "{} {}",
            labels.events_headline,
            events_date_line(date, labels)
        ),
        items,
        empty_body,
    }
}

fn quoted_body(labels: &Labels, entry: &QuoteEntry) -> String {
    let text = entry
        .quote
        .as_deref()
        .map(normalize_quote_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| labels.no_quote.clone());
    format!("„{text}“")
}

/// A time-slot rotated quote with character/title/year attribution.
pub fn hacker_quote_view(labels: &Labels, entry: &QuoteEntry) -> View {
    let speaker = entry
        .character
        .as_deref()
        .or(entry.person.as_deref())
        .unwrap_or(&labels.unknown_person);
    let origin: Vec<String> = [
        entry.title.clone(),
        entry.year.as_ref().map(|y| y.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();
    let meta = if origin.is_empty() {
        speaker.to_string()
    } else {
        format!("{speaker} ({})", origin.join(" | "))
    };

    View::Card(Card {
        kicker: Some(labels.page_label("hackerquotes").to_string()),
        body: Some(quoted_body(labels, entry)),
        meta: Some(meta),
        italic_body: true,
        ..Card::default()
    })
}

/// A daily quote with person attribution and optional source link.
pub fn fav_quote_view(labels: &Labels, entry: &QuoteEntry) -> View {
    View::Card(Card {
        kicker: Some(labels.page_label("favquotes").to_string()),
        body: Some(quoted_body(labels, entry)),
        meta: Some(
            entry
                .person
                .clone()
                .unwrap_or_else(|| labels.unknown_person.clone()),
        ),
        link: entry.source.clone(),
        italic_body: true,
        reloadable: true,
        ..Card::default()
    })
}

/// A fact card. `None` when headline or text is missing.
pub fn fact_view(labels: &Labels, entry: &FactEntry) -> Option<View> {
    let headline = entry.headline.as_deref()?;
    let text = entry.text.as_deref()?;
    Some(View::Card(Card {
        kicker: Some(labels.page_label("facts").to_string()),
        headline: Some(strip_citations(headline)),
        body: Some(strip_citations(text)),
        meta: entry
            .source
            .as_deref()
            .map(|s| format!("{} {}", labels.source_prefix, strip_citations(s))),
        reloadable: true,
        ..Card::default()
    }))
}

/// A need-to-know card. `None` for entries matching neither known shape.
pub fn need_to_know_view(labels: &Labels, entry: &NeedToKnowEntry) -> Option<View> {
    let kicker = Some(labels.page_label("need2know").to_string());
    match entry {
        NeedToKnowEntry::Sourced {
            headline,
            text,
            source,
        } => Some(View::Card(Card {
            kicker,
            headline: Some(strip_citations(headline)),
            body: Some(strip_citations(text)),
            link: source.clone(),
            reloadable: true,
            ..Card::default()
        })),
        NeedToKnowEntry::Linked {
            titel,
            description,
            link,
        } => Some(View::Card(Card {
            kicker,
            headline: Some(titel.trim().to_string()),
            body: Some(description.trim().to_string()),
            link: link.clone(),
            reloadable: true,
            ..Card::default()
        })),
        NeedToKnowEntry::Unrecognized(_) => None,
    }
}
