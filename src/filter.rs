//! Conjunctive record filtering.
//!
//! Both the reader list and the admin table call [`filter`], so a given
//! snapshot and criteria always produce the same rows in both places.
//! The filter is stable: surviving records keep their input order.

use crate::models::{FilterCriteria, Record};
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Apply `criteria` to `records`, keeping only records that satisfy every
/// active constraint.
///
/// # Arguments
///
/// * `records` - The snapshot to filter
/// * `criteria` - Search text and inclusive date bounds
///
/// # Returns
///
/// The surviving records, cloned, in their original relative order.
///
/// # Date handling
///
/// A record whose date cannot be parsed is dropped whenever either bound is
/// set, and kept when neither is.
#[instrument(level = "debug", skip_all, fields(input = records.len(), search = %criteria.search_text))]
pub fn filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let needle = criteria.search_text.to_lowercase();
    let filtered: Vec<Record> = records
        .iter()
        .filter(|record| matches_text(record, &needle))
        .filter(|record| matches_dates(record, criteria.start_date, criteria.end_date))
        .cloned()
        .collect();

    debug!(kept = filtered.len(), "Filtered records");
    filtered
}

/// Case-insensitive substring match against the title; an empty needle matches all.
fn matches_text(record: &Record, needle: &str) -> bool {
    needle.is_empty() || record.title.to_lowercase().contains(needle)
}

fn matches_dates(record: &Record, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(date) = record.parse_date() else {
        return false;
    };
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}
