//! Spreadsheet export as CSV.
//!
//! One header row, then one row per record. Columns follow the field order
//! of [`Record`]. Dates that parse are written as ISO `YYYY-MM-DD` so any
//! spreadsheet re-imports them as the same calendar day; dates that do not
//! parse are written verbatim rather than dropped.

use super::{ExportKind, ExportPayload};
use crate::error::ExportError;
use crate::models::{Record, RecordId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Header row, in [`Record`] field order.
pub const COLUMNS: [&str; 8] = [
    "id",
    "title",
    "description",
    "publishedAt",
    "source",
    "category",
    "imageUrl",
    "viewCount",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetRow {
    id: String,
    title: String,
    description: String,
    published_at: String,
    source: String,
    category: String,
    image_url: String,
    view_count: u64,
}

impl From<&Record> for SpreadsheetRow {
    fn from(record: &Record) -> Self {
        let published_at = match record.parse_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => record.published_at.clone(),
        };
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            description: record.description.clone(),
            published_at,
            source: record.source.clone(),
            category: record.category.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            view_count: record.view_count,
        }
    }
}

impl From<SpreadsheetRow> for Record {
    fn from(row: SpreadsheetRow) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        Self {
            id: RecordId::parse(&row.id),
            title: row.title,
            description: row.description,
            published_at: row.published_at,
            source: row.source,
            category: non_empty(row.category),
            image_url: non_empty(row.image_url),
            view_count: row.view_count,
        }
    }
}

/// Serialize `records` to a CSV spreadsheet payload.
///
/// An empty slice yields the header row alone.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if a row cannot be encoded and
/// [`ExportError::Buffer`] if the in-memory writer cannot be flushed.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn to_spreadsheet(records: &[Record]) -> Result<ExportPayload, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(SpreadsheetRow::from(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    info!(bytes = bytes.len(), "Built spreadsheet export");

    Ok(ExportPayload {
        kind: ExportKind::Spreadsheet,
        bytes,
    })
}

/// Read a spreadsheet produced by [`to_spreadsheet`] back into records.
///
/// Title, source and calendar date come back unchanged. CSV keeps no types,
/// so a numeric-looking text id such as `"12"` returns as a numeric id, and
/// an empty category or image returns as absent.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] on malformed rows.
pub fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<Record>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for row in reader.deserialize::<SpreadsheetRow>() {
        records.push(Record::from(row?));
    }
    Ok(records)
}
