//! The JSON report printed by the binary.
//!
//! Collects what the rendering layer would consume from one view: the
//! filtered and visible records, the chart series, and, for administrators,
//! the current admin table page.

use crate::admin::{Action, AdminRow, AdminTable, PageLink, Privilege};
use crate::aggregate::DashboardAggregates;
use crate::gate::{GateState, RevealOutcome};
use crate::models::{FilterCriteria, Record};
use crate::view::NewsView;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AdminPage {
    pub page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub links: Vec<PageLink>,
    pub rows: Vec<AdminRow>,
}

impl AdminPage {
    pub fn build(table: &AdminTable, records: &[Record], description_preview: usize) -> Self {
        Self {
            page: table.current_page(),
            total_pages: table.total_pages(records.len()),
            items_per_page: table.items_per_page(),
            links: table.page_links(records.len()),
            rows: table
                .page_items(records)
                .iter()
                .map(|record| AdminRow::from_record(record, description_preview))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub gate: GateState,
    pub criteria: FilterCriteria,
    pub total: usize,
    pub filtered: usize,
    pub visible: usize,
    pub has_more: bool,
    pub login_prompt: bool,
    pub reveal_outcomes: Vec<RevealOutcome>,
    pub lead: Option<Record>,
    pub grid: Vec<Record>,
    pub aggregates: DashboardAggregates,
    pub allowed_actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminPage>,
}

impl DashboardReport {
    /// Snapshot the view state into a report.
    ///
    /// The admin page is included only when `privilege` is administrator.
    pub fn build(
        view: &NewsView,
        aggregates: DashboardAggregates,
        reveal_outcomes: Vec<RevealOutcome>,
        privilege: Privilege,
        admin: Option<AdminPage>,
    ) -> Self {
        let (lead, grid) = view.lead_and_rest();
        Self {
            gate: view.gate().state(),
            criteria: view.criteria().clone(),
            total: view.records().len(),
            filtered: view.filtered().len(),
            visible: view.visible().len(),
            has_more: view.has_more(),
            login_prompt: view.login_prompt_visible(),
            reveal_outcomes,
            lead: lead.cloned(),
            grid: grid.to_vec(),
            aggregates,
            allowed_actions: privilege.allowed_actions(),
            admin: admin.filter(|_| privilege.is_admin()),
        }
    }
}
