//! Data models for news records and the criteria applied to them.
//!
//! This module defines the shapes shared by every other part of the crate:
//! - [`Record`]: one news article as delivered by the backing API
//! - [`RecordId`]: record identity, numeric or textual depending on the store
//! - [`Category`]: the fixed category enumeration plus the `Other` bucket
//! - [`FilterCriteria`]: the search text and date bounds a view applies
//!
//! The backing API speaks Spanish field names (`titulo`, `fecha`, `fuente`, ...),
//! so every field also accepts its Spanish alias on deserialization. Missing or
//! `null` optional fields degrade to their defaults instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Date-only layouts accepted for `published_at`, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Date-time layouts without an offset, tried after RFC 3339.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Identity of a record within a snapshot.
///
/// Document stores hand out string ids while relational ones use integers;
/// both are accepted and compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    /// Rebuild an id from its textual form, preferring the numeric variant.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// The fixed category enumeration used for chart axes.
///
/// Anything the enumeration does not name is counted under [`Category::Other`]
/// so that category totals always reconcile with the collection size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Sports,
    Politics,
    Other,
}

impl Category {
    /// The recognised categories in chart order.
    pub const FIXED: [Category; 3] = [Category::General, Category::Sports, Category::Politics];

    /// Canonical key used in aggregate series.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::Other => "other",
        }
    }

    /// Map a raw category string onto the enumeration.
    ///
    /// Matching is exact: the canonical English keys and the collection names
    /// used by the scraper backend are recognised, everything else is `Other`.
    pub fn from_raw(raw: &str) -> Category {
        match raw {
            "general" | "noticia" => Category::General,
            "sports" | "deportes" => Category::Sports,
            "politics" | "politica" | "política" => Category::Politics,
            _ => Category::Other,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A news record as delivered by the backing API.
///
/// Field declaration order is the column order of the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique within one snapshot.
    pub id: RecordId,
    /// Headline, matched by the free-text filter.
    #[serde(default, alias = "titulo", deserialize_with = "null_as_default")]
    pub title: String,
    /// Long-form summary or lede.
    #[serde(default, alias = "descripcion", deserialize_with = "null_as_default")]
    pub description: String,
    /// Publication date as delivered; parsed lazily by [`Record::parse_date`].
    #[serde(default, alias = "fecha", deserialize_with = "null_as_default")]
    pub published_at: String,
    /// Publisher name.
    #[serde(default, alias = "fuente", deserialize_with = "null_as_default")]
    pub source: String,
    /// Raw category string; see [`Record::normalized_category`].
    #[serde(default, alias = "coleccion", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lead image, if the scraper found one.
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Read counter used by the "most read" ranking.
    #[serde(default, alias = "visitas", alias = "views", deserialize_with = "null_as_default")]
    pub view_count: u64,
}

impl Record {
    /// Build a record with a numeric id and the main text fields; everything
    /// else defaults.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        published_at: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::Number(id),
            title: title.into(),
            description: String::new(),
            published_at: published_at.into(),
            source: source.into(),
            category: None,
            image_url: None,
            view_count: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_views(mut self, view_count: u64) -> Self {
        self.view_count = view_count;
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Calendar date of publication, or `None` when it cannot be interpreted.
    pub fn parse_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.published_at)
    }

    /// The record's category mapped onto the fixed enumeration.
    pub fn normalized_category(&self) -> Category {
        self.category
            .as_deref()
            .map(Category::from_raw)
            .unwrap_or(Category::Other)
    }
}

/// Parse a date or timestamp string down to its calendar date.
///
/// Time-of-day is discarded; timestamps with an offset keep the date as
/// written in that offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The active search text and inclusive date bounds of a view.
///
/// An empty `search_text` and absent bounds impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_text: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_start(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// `true` when at least one date bound is set.
    pub fn has_date_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// `true` when no constraint at all is active.
    pub fn is_empty(&self) -> bool {
        self.search_text.is_empty() && !self.has_date_bounds()
    }

    /// Drop the search text and both bounds.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_spanish_keys() {
        let json = r#"{
            "id": 7,
            "titulo": "Elecciones en Quito",
            "descripcion": "Resumen",
            "fecha": "2024-03-05",
            "fuente": "El Comercio",
            "coleccion": "politica",
            "image": "https://img.example/1.jpg",
            "visitas": 42,
            "extra": {"ignored": true}
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Number(7));
        assert_eq!(record.title, "Elecciones en Quito");
        assert_eq!(record.source, "El Comercio");
        assert_eq!(record.view_count, 42);
        assert_eq!(record.normalized_category(), Category::Politics);
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn test_record_missing_optional_fields_degrade() {
        let json = r#"{"id": "abc123", "title": "Solo titulo", "viewCount": null}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, RecordId::Text("abc123".to_string()));
        assert_eq!(record.view_count, 0);
        assert_eq!(record.image_url, None);
        assert_eq!(record.normalized_category(), Category::Other);
        assert_eq!(record.parse_date(), None);
    }

    #[test]
    fn test_serialization_omits_missing_image() {
        let record = Record::new(1, "T", "2024-01-01", "S");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("imageUrl"));
        assert!(json.contains("publishedAt"));
    }

    #[test]
    fn test_parse_calendar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_calendar_date("2024-01-15"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-15T23:10:00.000Z"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-15T08:00:00-05:00"), Some(expected));
        assert_eq!(parse_calendar_date("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_calendar_date("15/01/2024"), Some(expected));
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_category_from_raw_is_exact() {
        assert_eq!(Category::from_raw("general"), Category::General);
        assert_eq!(Category::from_raw("noticia"), Category::General);
        assert_eq!(Category::from_raw("deportes"), Category::Sports);
        assert_eq!(Category::from_raw("política"), Category::Politics);
        assert_eq!(Category::from_raw("Sports"), Category::Other);
        assert_eq!(Category::from_raw("economia"), Category::Other);
    }

    #[test]
    fn test_record_id_parse_and_display() {
        assert_eq!(RecordId::parse("12"), RecordId::Number(12));
        assert_eq!(RecordId::parse("65a1f0"), RecordId::Text("65a1f0".to_string()));
        assert_eq!(RecordId::Number(12).to_string(), "12");
    }

    #[test]
    fn test_filter_criteria_clear() {
        let mut criteria = FilterCriteria::new()
            .with_search("quito")
            .with_start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(!criteria.is_empty());
        assert!(criteria.has_date_bounds());

        criteria.clear();
        assert!(criteria.is_empty());
        assert_eq!(criteria, FilterCriteria::default());
    }
}
