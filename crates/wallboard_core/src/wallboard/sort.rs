//! Per-group note ordering.
//!
//! # Responsibility
//! - Order notes by one inline field whose type is not known in advance.
//!
//! # Invariants
//! - Without a sort field the input order is returned untouched.
//! - Sorting is stable: equal keys keep their fetch order, also under `desc`.
//! - Keys are classified once per note, so the comparator is a total order.

use crate::model::note::Note;
use crate::model::settings::SortOrder;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// Value used for notes that lack the sort field.
pub const MISSING_SORT_VALUE: &str = "99";

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer regex"));
static LONG_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b")
        .expect("valid long date regex")
});

/// Comparison key derived from one raw field value.
///
/// Variant order places integers before dates before free text. For an
/// integer against text this intentionally differs from a pairwise lexical
/// fallback (`"5"` sorts before `"!x"`), so the comparator stays a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Integer(i64),
    Date(NaiveDate),
    Text(String),
}

impl SortKey {
    fn classify(raw: &str) -> Self {
        if let Some(value) = parse_leading_int(raw) {
            return Self::Integer(value);
        }
        if let Some(date) = parse_long_date(raw) {
            return Self::Date(date);
        }
        Self::Text(raw.to_string())
    }
}

/// Orders `notes` by the `sort_by` inline field.
pub fn sort_notes(notes: Vec<Note>, sort_by: Option<&str>, order: SortOrder) -> Vec<Note> {
    let Some(field) = sort_by else {
        return notes;
    };

    let mut keyed: Vec<(SortKey, Note)> = notes
        .into_iter()
        .map(|note| {
            let raw = note.field_value(field).unwrap_or(MISSING_SORT_VALUE);
            (SortKey::classify(raw), note)
        })
        .collect();

    keyed.sort_by(|(left, _), (right, _)| {
        let ascending = left.cmp(right);
        match order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    });

    keyed.into_iter().map(|(_, note)| note).collect()
}

/// Compares two raw values with the integer / date / text fallback chain.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    SortKey::classify(left).cmp(&SortKey::classify(right))
}

/// Parses an optional sign and leading digits, ignoring any trailing text.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Parses dates written as `<Month> <Day><suffix>, <Year>`, e.g. `August 1st, 2023`.
pub fn parse_long_date(raw: &str) -> Option<NaiveDate> {
    let caps = LONG_DATE_RE.captures(raw)?;
    let normalized = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&normalized, "%B %d %Y").ok()
}
