// src/utils/date.rs

//! Date keys and display lines for the date-keyed feeds.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Local, NaiveDate};

use crate::models::Labels;

/// Current wall-clock time as milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Day key in `DD.MM` format, matching the feed data.
pub fn day_month_key(date: NaiveDate) -> String {
    format!("{:02}.{:02}", date.day(), date.month())
}

/// Day of the year, counting 1 for Jan 1. Drives the daily rotation.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

fn weekday_name(date: NaiveDate, labels: &Labels) -> &str {
    let idx = date.weekday().num_days_from_monday() as usize;
    labels
        .weekdays
        .get(idx)
        .map(String::as_str)
        .unwrap_or_default()
}

fn month_name(date: NaiveDate, labels: &Labels) -> &str {
    labels
        .months
        .get(date.month0() as usize)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Date line for the holiday view, e.g. `Sonntag (KW: 34) - 23. August 2026`.
pub fn holiday_date_line(date: NaiveDate, labels: &Labels) -> String {
    format!(
        "{} ({}: {:02}) - {:02}. {} {}",
        weekday_name(date, labels),
        labels.week_prefix,
        date.iso_week().week(),
        date.day(),
        month_name(date, labels),
        date.year()
    )
}

/// Short date line for the events view, e.g. `23. August`.
pub fn events_date_line(date: NaiveDate, labels: &Labels) -> String {
    format!("{:02}. {}", date.day(), month_name(date, labels))
}
