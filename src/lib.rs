//! # News Dashboard
//!
//! Client-side logic of the news scraping dashboard: filtering, chart
//! aggregates, authorization-gated reveal and export of article records.
//!
//! ## Architecture
//!
//! Records arrive as an immutable snapshot and flow through pure stages:
//! 1. **Filtering** ([`filter`]): search text and inclusive date bounds
//! 2. **Gating** ([`gate`]): how many filtered records are revealed
//! 3. **Aggregation** ([`aggregate`]): category, source and period counts
//! 4. **Export** ([`outputs`]): CSV spreadsheet and paginated PDF document
//!
//! [`view::NewsView`] owns the criteria and gate of one reader view and
//! recomputes its filtered list whenever an input changes. The admin table
//! lives in [`admin`].

pub mod admin;
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod gate;
pub mod models;
pub mod outputs;
pub mod report;
pub mod snapshot;
pub mod utils;
pub mod view;

pub use error::{ConfigError, ExportError, InputError};
pub use models::{Category, FilterCriteria, Record, RecordId};
pub use view::NewsView;
