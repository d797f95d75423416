//! Loading record snapshots and pre-counted summaries from disk.
//!
//! Both files are JSON arrays as returned by the backing API. Snapshots are
//! handed to the views as-is and never mutated afterwards.

use crate::aggregate::CategoryCount;
use crate::error::InputError;
use crate::models::Record;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Read a JSON array of records.
///
/// Duplicate ids are logged; the snapshot is kept as delivered.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_records(path: &Path) -> Result<Vec<Record>, InputError> {
    let records: Vec<Record> = read_json(path).await?;

    let mut seen = HashSet::new();
    let duplicates = records.iter().filter(|r| !seen.insert(&r.id)).count();
    if duplicates > 0 {
        warn!(duplicates, "Snapshot contains duplicate record ids");
    }

    info!(count = records.len(), "Loaded record snapshot");
    Ok(records)
}

/// Read a JSON array of per-collection totals.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_category_summary(path: &Path) -> Result<Vec<CategoryCount>, InputError> {
    let summary: Vec<CategoryCount> = read_json(path).await?;
    info!(collections = summary.len(), "Loaded category summary");
    Ok(summary)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let bytes = fs::read(path).await.map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}
