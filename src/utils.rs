//! Small string and file-system helpers shared across the crate.
//!
//! - Character-safe truncation for table previews and log lines
//! - Output directory validation before an export is saved

use crate::error::ExportError;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Shorten `text` to at most `max` characters, appending `...` when cut.
///
/// Counts characters rather than bytes so accented titles never split
/// inside a code point.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_text("Política", 3), "Pol...");
/// assert_eq!(truncate_text("corto", 50), "corto");
/// ```
pub fn truncate_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Truncate a string for logging, noting how many bytes were dropped.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
        None => s.to_string(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// Returns [`ExportError::Unwritable`] if the directory cannot be created or
/// the probe cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), ExportError> {
    let unwritable = |source| ExportError::Unwritable {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(path).await.map_err(unwritable)?;
    let probe_path = path.join("..__probe_write__");
    fs::write(&probe_path, b"").await.map_err(unwritable)?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_string() {
        assert_eq!(truncate_text("Hola", 50), "Hola");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(truncate_text("Política nacional", 3), "Pol...");
        assert_eq!(truncate_text("ñañaña", 4), "ñaña...");
        assert_eq!(truncate_text("exacto", 6), "exacto");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("exports").join("hoy");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_file_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_writable_dir(&file).await.unwrap_err();
        assert!(matches!(err, ExportError::Unwritable { .. }));
    }
}
