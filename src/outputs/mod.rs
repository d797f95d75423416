//! Export payload generation and persistence.
//!
//! Both exports take the *currently filtered* collection, never the raw
//! snapshot, and are deterministic: the same records always produce the
//! same bytes.
//!
//! # Submodules
//!
//! - [`spreadsheet`]: CSV table with every record field, header row first
//! - [`document`]: paginated PDF report with a fixed column set
//! - [`save`]: writes a payload under its default filename
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── noticias.csv   # spreadsheet export
//! └── noticias.pdf   # document export
//! ```

pub mod document;
pub mod save;
pub mod spreadsheet;

use serde::Serialize;

/// The two export formats offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Spreadsheet,
    Document,
}

impl ExportKind {
    /// Filename used by the save primitive when the config does not override it.
    pub fn default_filename(&self) -> &'static str {
        match self {
            ExportKind::Spreadsheet => "noticias.csv",
            ExportKind::Document => "noticias.pdf",
        }
    }
}

/// A serialized export, ready to hand to the file-save primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub kind: ExportKind,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
