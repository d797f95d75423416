//! Derived counts for the dashboard charts.
//!
//! Every function here is a pure function of the slice it receives. The
//! dashboard feeds them the *unfiltered* snapshot; nothing stops a caller
//! from passing a filtered one.
//!
//! # Series ordering
//!
//! | Series | Key | Order |
//! |--------|-----|-------|
//! | category | `general`, `sports`, `politics`, `other` | fixed enumeration order |
//! | source | publisher string as delivered | first observation |
//! | day / week / month | `YYYY-MM-DD`, `YYYY-Www`, `YYYY-MM` | ascending chronological |

use crate::models::{Category, Record};
use chrono::{Datelike, Duration, NaiveDate};
use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// An insertion-ordered mapping from a chart key to a count.
///
/// Serializes as a JSON object whose key order is the series order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSeries {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl AggregateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`, appending the key if it has not been seen.
    pub fn add(&mut self, key: &str, amount: u64) {
        match self.positions.get(key) {
            Some(&pos) => self.entries[pos].1 += amount,
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub fn increment(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.positions.get(key).map(|&pos| self.entries[pos].1)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Chart axis labels in series order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    /// Chart values in series order.
    pub fn values(&self) -> Vec<u64> {
        self.entries.iter().map(|(_, count)| *count).collect()
    }
}

impl Serialize for AggregateSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Time bucket size for [`count_by_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    /// ISO 8601 week, starting Monday.
    Week,
    Month,
}

impl Granularity {
    fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Month => start.format("%Y-%m").to_string(),
        }
    }
}

/// Tally records per category in fixed enumeration order.
///
/// `general`, `sports` and `politics` are always present, even at zero.
/// `other` is appended only when some record falls outside the enumeration,
/// so the series total always equals `records.len()`.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn count_by_category(records: &[Record]) -> AggregateSeries {
    let mut series = fixed_category_series();
    let mut other = 0u64;
    for record in records {
        match record.normalized_category() {
            Category::Other => other += 1,
            category => series.increment(category.as_str()),
        }
    }
    if other > 0 {
        series.add(Category::Other.as_str(), other);
    }
    series
}

/// Tally records per raw `source` string, in order of first observation.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn count_by_source(records: &[Record]) -> AggregateSeries {
    let mut series = AggregateSeries::new();
    for record in records {
        series.increment(&record.source);
    }
    series
}

/// Tally records per calendar day, ascending. Undated records are skipped.
pub fn count_by_day(records: &[Record]) -> AggregateSeries {
    count_by_period(records, Granularity::Day)
}

/// Tally records per day, week or month, ascending. Undated records are skipped.
#[instrument(level = "debug", skip_all, fields(records = records.len(), ?granularity))]
pub fn count_by_period(records: &[Record], granularity: Granularity) -> AggregateSeries {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut skipped = 0usize;
    for record in records {
        match record.parse_date() {
            Some(date) => *buckets.entry(granularity.bucket_start(date)).or_insert(0) += 1,
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "Skipped records with unparseable dates");
    }

    let mut series = AggregateSeries::new();
    for (start, count) in buckets {
        series.add(&granularity.label(start), count);
    }
    series
}

/// The `n` most-read records, highest `view_count` first.
///
/// Ties keep their input order.
pub fn top_by_views(records: &[Record], n: usize) -> Vec<Record> {
    records
        .iter()
        .sorted_by_key(|record| Reverse(record.view_count))
        .take(n)
        .cloned()
        .collect()
}

/// A per-collection total as delivered by the backend's count endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(alias = "coleccion")]
    pub collection: String,
    pub total: u64,
}

/// A per-publisher total as delivered by the backend's count endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    #[serde(alias = "fuente")]
    pub source: String,
    pub total: u64,
}

/// Build the category series from a pre-counted summary.
///
/// Produces the same shape as [`count_by_category`]: fixed keys first,
/// unknown collections folded into `other`.
pub fn category_series_from_summary(summary: &[CategoryCount]) -> AggregateSeries {
    let mut series = fixed_category_series();
    let mut other = 0u64;
    for item in summary {
        match Category::from_raw(&item.collection) {
            Category::Other => other += item.total,
            category => series.add(category.as_str(), item.total),
        }
    }
    if other > 0 {
        series.add(Category::Other.as_str(), other);
    }
    series
}

/// Build the source series from a pre-counted summary, keeping delivery order.
pub fn source_series_from_summary(summary: &[SourceCount]) -> AggregateSeries {
    let mut series = AggregateSeries::new();
    for item in summary {
        series.add(&item.source, item.total);
    }
    series
}

fn fixed_category_series() -> AggregateSeries {
    let mut series = AggregateSeries::new();
    for category in Category::FIXED {
        series.add(category.as_str(), 0);
    }
    series
}

/// Every series the dashboard charts, derived from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardAggregates {
    pub total: usize,
    pub by_category: AggregateSeries,
    pub by_source: AggregateSeries,
    pub by_day: AggregateSeries,
    pub by_week: AggregateSeries,
    pub by_month: AggregateSeries,
    pub top_read: Vec<Record>,
}

impl DashboardAggregates {
    /// Recompute all series from `records`.
    ///
    /// A pre-counted category summary from the backend takes precedence over
    /// the local category tally when supplied.
    #[instrument(level = "info", skip_all, fields(records = records.len(), top_n = top_n))]
    pub fn compute(
        records: &[Record],
        top_n: usize,
        category_summary: Option<&[CategoryCount]>,
    ) -> Self {
        let by_category = match category_summary {
            Some(summary) => category_series_from_summary(summary),
            None => count_by_category(records),
        };
        Self {
            total: records.len(),
            by_category,
            by_source: count_by_source(records),
            by_day: count_by_period(records, Granularity::Day),
            by_week: count_by_period(records, Granularity::Week),
            by_month: count_by_period(records, Granularity::Month),
            top_read: top_by_views(records, top_n),
        }
    }
}
