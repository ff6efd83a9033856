// src/utils/text.rs

//! Text normalization for imported datasets.
//!
//! Some feed entries carry artifacts from their source material: embedded
//! citation markers, language prefixes, numbering suffixes. Signatures for
//! distinct selection are built from the normalized form so formatting
//! differences do not defeat de-duplication.

use regex::Regex;

use crate::models::QuoteEntry;

/// Remove embedded citation markers and collapse runs of whitespace.
pub fn strip_citations(value: &str) -> String {
    let mut cleaned = value.to_string();
    if let Ok(citation) = Regex::new(r"\s*\[oai_citation:[^\]]+\]\([^)]+\)") {
        cleaned = citation.replace_all(&cleaned, "").into_owned();
    }
    if let Ok(spaces) = Regex::new(r"\s{2,}") {
        cleaned = spaces.replace_all(&cleaned, " ").into_owned();
    }
    cleaned.trim().to_string()
}

/// Unify quote formatting across datasets.
///
/// On top of citation stripping this removes `DE:`/`EN:` language prefixes
/// and trailing `(EN #n)` numbering markers.
pub fn normalize_quote_text(value: &str) -> String {
    let mut cleaned = strip_citations(value);
    if let Ok(prefix) = Regex::new(r"(?i)^(DE:|EN:)\s*") {
        cleaned = prefix.replace(&cleaned, "").into_owned();
    }
    if let Ok(suffix) = Regex::new(r"(?i)\s*\((?:EN\s*)?#\d+\)\s*$") {
        cleaned = suffix.replace(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Normalized signature of a quote entry: text plus attributed person.
pub fn quote_signature(entry: &QuoteEntry) -> String {
    let text = entry
        .quote
        .as_deref()
        .map(normalize_quote_text)
        .unwrap_or_default();
    let person = entry.person.as_deref().unwrap_or("");
    format!("{text}::{person}").trim().to_string()
}
