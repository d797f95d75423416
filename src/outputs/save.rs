//! File-save primitive for export payloads.
//!
//! Writes a payload into an output directory under the filename configured
//! for its kind. Every failure is returned; a silently dropped export would
//! look like success to the operator.

use super::ExportPayload;
use crate::error::ExportError;
use crate::utils::ensure_writable_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `payload` to `{output_dir}/{filename}`.
///
/// # Arguments
///
/// * `payload` - The serialized export
/// * `output_dir` - Target directory, created if missing
/// * `filename` - File name for this export kind
///
/// # Returns
///
/// The full path written.
///
/// # Errors
///
/// [`ExportError::Unwritable`] if the directory cannot be prepared and
/// [`ExportError::Write`] if the file itself cannot be written.
#[instrument(level = "info", skip_all, fields(kind = ?payload.kind, output_dir = %output_dir.display(), %filename))]
pub async fn save_payload(
    payload: &ExportPayload,
    output_dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    ensure_writable_dir(output_dir).await?;

    let path = output_dir.join(filename);
    info!(path = %path.display(), bytes = payload.len(), "Writing export");
    if let Err(source) = fs::write(&path, &payload.bytes).await {
        error!(path = %path.display(), error = %source, "Failed to write export");
        return Err(ExportError::Write { path, source });
    }
    info!(path = %path.display(), "Wrote export");

    Ok(path)
}
