//! The reader-facing news list view.
//!
//! A [`NewsView`] owns one record snapshot, its [`FilterCriteria`] and its
//! [`PaginationGate`]. Every mutator recomputes the derived filtered list
//! right away by calling the pure [`filter`] function; there is no
//! background subscription and no state shared between views.
//!
//! Search text and date bounds are only editable while the reader is signed
//! in, and signing out clears them, so a signed-out reader always sees the
//! unfiltered list behind the gate.

use crate::error::ExportError;
use crate::filter::filter;
use crate::gate::{PaginationGate, RevealOutcome};
use crate::models::{FilterCriteria, Record};
use crate::outputs::ExportPayload;
use crate::outputs::document::{DocumentLayout, to_document};
use crate::outputs::spreadsheet::to_spreadsheet;
use chrono::NaiveDate;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct NewsView {
    records: Vec<Record>,
    criteria: FilterCriteria,
    gate: PaginationGate,
    filtered: Vec<Record>,
    login_prompt: bool,
}

impl NewsView {
    /// A signed-out view over `records`.
    pub fn new(records: Vec<Record>, gate: PaginationGate) -> Self {
        let mut view = Self {
            records,
            criteria: FilterCriteria::default(),
            gate,
            filtered: Vec::new(),
            login_prompt: false,
        };
        view.refresh();
        view
    }

    /// Swap in a freshly fetched snapshot. Criteria and reveal are kept.
    pub fn replace_records(&mut self, records: Vec<Record>) {
        info!(records = records.len(), "Replacing record snapshot");
        self.records = records;
        self.refresh();
    }

    /// Follow the session's authorization signal.
    ///
    /// Signing out resets the reveal and clears the criteria.
    pub fn set_authorized(&mut self, authorized: bool) {
        if authorized {
            self.gate.authorize();
            self.login_prompt = false;
        } else if self.gate.is_authorized() || !self.criteria.is_empty() {
            self.gate.deauthorize(&mut self.criteria);
            self.refresh();
        }
    }

    /// Replace the criteria. Ignored while signed out; returns whether applied.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> bool {
        if !self.gate.is_authorized() {
            debug!("Ignoring criteria change while signed out");
            return false;
        }
        self.criteria = criteria;
        self.refresh();
        true
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let criteria = FilterCriteria {
            search_text: text.into(),
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        let criteria = FilterCriteria {
            start_date: start,
            end_date: end,
            ..self.criteria.clone()
        };
        self.set_criteria(criteria)
    }

    /// The "load more" action. A signed-out reader gets the login prompt.
    pub fn load_more(&mut self) -> RevealOutcome {
        let outcome = self.gate.request_more(self.filtered.len());
        if outcome == RevealOutcome::LoginPrompt {
            self.login_prompt = true;
        }
        outcome
    }

    pub fn dismiss_login_prompt(&mut self) {
        self.login_prompt = false;
    }

    pub fn login_prompt_visible(&self) -> bool {
        self.login_prompt
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn gate(&self) -> &PaginationGate {
        &self.gate
    }

    pub fn filtered(&self) -> &[Record] {
        &self.filtered
    }

    pub fn visible(&self) -> &[Record] {
        self.gate.visible_slice(&self.filtered)
    }

    /// `true` while the "load more" button should be offered.
    pub fn has_more(&self) -> bool {
        self.gate.has_more(self.filtered.len())
    }

    /// The lead story and the rest of the visible slice for the grid.
    pub fn lead_and_rest(&self) -> (Option<&Record>, &[Record]) {
        match self.visible().split_first() {
            Some((lead, rest)) => (Some(lead), rest),
            None => (None, &[]),
        }
    }

    /// Spreadsheet export of the filtered list.
    pub fn export_spreadsheet(&self) -> Result<ExportPayload, ExportError> {
        to_spreadsheet(&self.filtered)
    }

    /// PDF document export of the filtered list.
    pub fn export_document(&self, layout: &DocumentLayout) -> Result<ExportPayload, ExportError> {
        to_document(&self.filtered, layout).into_payload()
    }

    fn refresh(&mut self) {
        self.filtered = filter(&self.records, &self.criteria);
        debug!(
            records = self.records.len(),
            filtered = self.filtered.len(),
            visible = self.visible().len(),
            "View recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::spreadsheet::read_spreadsheet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> Vec<Record> {
        (1..=30)
            .map(|i| {
                let title = if i % 3 == 0 { format!("Liga {i}") } else { format!("Economía {i}") };
                Record::new(i, title, format!("2024-01-{i:02}"), "AS")
            })
            .collect()
    }

    #[test]
    fn test_signed_out_view_ignores_criteria() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        assert!(!view.set_search_text("liga"));
        assert_eq!(view.filtered().len(), 30);
        assert_eq!(view.visible().len(), 10);
    }

    #[test]
    fn test_load_more_while_signed_out_shows_prompt() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        assert_eq!(view.load_more(), RevealOutcome::LoginPrompt);
        assert!(view.login_prompt_visible());
        assert_eq!(view.visible().len(), 10);

        view.dismiss_login_prompt();
        assert!(!view.login_prompt_visible());
    }

    #[test]
    fn test_filter_then_reveal() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        view.set_authorized(true);
        assert!(view.set_search_text("LIGA"));
        assert_eq!(view.filtered().len(), 10);
        assert!(!view.has_more());
        assert_eq!(view.load_more(), RevealOutcome::Exhausted);

        assert!(view.set_search_text(""));
        assert!(view.set_date_range(Some(day(2024, 1, 5)), None));
        assert_eq!(view.filtered().len(), 26);
        view.load_more();
        view.load_more();
        assert_eq!(view.visible().len(), 26);
    }

    #[test]
    fn test_sign_out_clears_criteria_and_reveal() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        view.set_authorized(true);
        view.set_search_text("economía");
        view.load_more();
        assert_eq!(view.visible().len(), 20);

        view.set_authorized(false);
        assert!(view.criteria().is_empty());
        assert_eq!(view.gate().visible_count(), 10);
        assert_eq!(view.filtered().len(), 30);
    }

    #[test]
    fn test_lead_and_rest() {
        let view = NewsView::new(snapshot(), PaginationGate::default());
        let (lead, rest) = view.lead_and_rest();
        assert_eq!(lead.map(|r| r.title.as_str()), Some("Economía 1"));
        assert_eq!(rest.len(), 9);

        let empty = NewsView::new(Vec::new(), PaginationGate::default());
        let (lead, rest) = empty.lead_and_rest();
        assert!(lead.is_none());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_exports_use_filtered_records() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        view.set_authorized(true);
        view.set_search_text("liga");

        let sheet = view.export_spreadsheet().unwrap();
        assert_eq!(read_spreadsheet(&sheet.bytes).unwrap().len(), 10);

        let doc = view.export_document(&DocumentLayout::default()).unwrap();
        let contains = |needle: &[u8]| doc.bytes.windows(needle.len()).any(|w| w == needle);
        assert!(contains(b"(Liga 3) Tj"));
        assert!(!contains(b"(Econom"));
    }

    #[test]
    fn test_replace_records_keeps_criteria() {
        let mut view = NewsView::new(snapshot(), PaginationGate::default());
        view.set_authorized(true);
        view.set_search_text("liga");
        view.replace_records(snapshot().into_iter().take(6).collect());
        assert_eq!(view.filtered().len(), 2);
    }
}
