//! Dashboard configuration loaded from YAML.
//!
//! Every key is optional; anything left out takes the dashboard default.
//!
//! ```yaml
//! reveal:
//!   initial_visible: 10
//!   page_size: 10
//! admin:
//!   items_per_page: 4
//!   description_preview: 50
//! document:
//!   title: Reporte de Noticias
//!   columns: [Título, Descripción, Fecha, Fuente]
//!   rows_per_page: 25
//!   first_page_rows: 22
//!   date_style: long
//! export:
//!   spreadsheet_filename: noticias.csv
//!   document_filename: noticias.pdf
//! top_read: 5
//! ```

use crate::admin::ITEMS_PER_PAGE_OPTIONS;
use crate::error::ConfigError;
use crate::gate::{DEFAULT_PAGE_SIZE, PaginationGate};
use crate::outputs::ExportKind;
use crate::outputs::document::{DocumentLayout, MAX_FIRST_PAGE_ROWS, MAX_ROWS_PER_PAGE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub initial_visible: usize,
    pub page_size: usize,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            initial_visible: DEFAULT_PAGE_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RevealConfig {
    pub fn gate(&self) -> PaginationGate {
        PaginationGate::new(self.initial_visible, self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub items_per_page: usize,
    /// Characters of description shown in the admin table.
    pub description_preview: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            items_per_page: ITEMS_PER_PAGE_OPTIONS[0],
            description_preview: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub spreadsheet_filename: String,
    pub document_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            spreadsheet_filename: ExportKind::Spreadsheet.default_filename().to_string(),
            document_filename: ExportKind::Document.default_filename().to_string(),
        }
    }
}

impl ExportConfig {
    pub fn filename(&self, kind: ExportKind) -> &str {
        match kind {
            ExportKind::Spreadsheet => &self.spreadsheet_filename,
            ExportKind::Document => &self.document_filename,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub reveal: RevealConfig,
    pub admin: AdminConfig,
    pub document: DocumentLayout,
    pub export: ExportConfig,
    /// Length of the "most read" list.
    pub top_read: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            admin: AdminConfig::default(),
            document: DocumentLayout::default(),
            export: ExportConfig::default(),
            top_read: 5,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the views cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("reveal.page_size", self.reveal.page_size),
            ("admin.items_per_page", self.admin.items_per_page),
            ("document.rows_per_page", self.document.rows_per_page),
            ("document.first_page_rows", self.document.first_page_rows),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if self.document.first_page_rows > self.document.rows_per_page {
            return Err(ConfigError::Invalid {
                field: "document.first_page_rows",
                reason: format!(
                    "{} exceeds rows_per_page ({})",
                    self.document.first_page_rows, self.document.rows_per_page
                ),
            });
        }
        let page_limits = [
            ("document.rows_per_page", self.document.rows_per_page, MAX_ROWS_PER_PAGE),
            ("document.first_page_rows", self.document.first_page_rows, MAX_FIRST_PAGE_ROWS),
        ];
        for (field, value, max) in page_limits {
            if value > max {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} rows do not fit on an A4 page (max {max})"),
                });
            }
        }
        for (field, name) in [
            ("export.spreadsheet_filename", &self.export.spreadsheet_filename),
            ("export.document_filename", &self.export.document_filename),
        ] {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("`{name}` is not a plain file name"),
                });
            }
        }
        if !ITEMS_PER_PAGE_OPTIONS.contains(&self.admin.items_per_page) {
            warn!(
                items_per_page = self.admin.items_per_page,
                "admin.items_per_page is not one of the picker options"
            );
        }
        Ok(())
    }
}

/// Load the config at `path`, or the defaults when no path is given.
///
/// # Errors
///
/// A path that cannot be read, malformed YAML, or an invalid value.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(DashboardConfig::default());
    };

    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = DashboardConfig::from_yaml(&yaml)?;
    info!(
        page_size = config.reveal.page_size,
        rows_per_page = config.document.rows_per_page,
        "Loaded configuration"
    );
    Ok(config)
}
