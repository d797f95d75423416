//! Admin table paging and privilege gating.
//!
//! The admin view lists the whole snapshot in numbered pages and exposes the
//! edit, delete and export actions only to administrators. The actions
//! themselves run against the backing store and are not part of this crate;
//! this module only decides which page is shown and which actions are offered.

use crate::models::Record;
use crate::utils::truncate_text;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page sizes offered by the "show" picker.
pub const ITEMS_PER_PAGE_OPTIONS: [usize; 4] = [4, 5, 10, 20];

/// Page numbers are listed in full up to this many pages.
const FULL_PAGER_LIMIT: usize = 5;

/// Privilege level reported by the session layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privilege(pub u8);

impl Privilege {
    pub const ADMIN: Privilege = Privilege(5);

    pub fn is_admin(&self) -> bool {
        *self >= Self::ADMIN
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Edit | Action::Delete | Action::Export => self.is_admin(),
        }
    }

    /// Every action this level may perform.
    pub fn allowed_actions(&self) -> Vec<Action> {
        [Action::Edit, Action::Delete, Action::Export]
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

/// Operations the admin table can expose on records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Edit,
    Delete,
    Export,
}

/// One entry of the numbered pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Page cursor of the admin table. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminTable {
    items_per_page: usize,
    current_page: usize,
}

impl Default for AdminTable {
    fn default() -> Self {
        Self::new(ITEMS_PER_PAGE_OPTIONS[0])
    }
}

impl AdminTable {
    /// A table on page 1. A zero page size is treated as 1.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            current_page: 1,
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Change the page size and jump back to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
        debug!(items_per_page = self.items_per_page, "Admin page size changed");
    }

    /// Number of pages needed for `len` records; zero when empty.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.items_per_page)
    }

    /// Move to `page`, clamped into `1..=total_pages(len)`.
    pub fn go_to(&mut self, page: usize, len: usize) {
        let last = self.total_pages(len).max(1);
        self.current_page = page.clamp(1, last);
    }

    /// The records on the current page.
    pub fn page_items<'a>(&self, records: &'a [Record]) -> &'a [Record] {
        let start = ((self.current_page - 1) * self.items_per_page).min(records.len());
        let end = (start + self.items_per_page).min(records.len());
        &records[start..end]
    }

    /// The numbered pager for `len` records.
    ///
    /// Up to five pages are listed in full. Beyond that the first and last
    /// pages are always shown, with ellipses around a window that follows the
    /// current page.
    pub fn page_links(&self, len: usize) -> Vec<PageLink> {
        use PageLink::{Ellipsis, Page};

        let total = self.total_pages(len);
        let current = self.current_page;
        if total <= FULL_PAGER_LIMIT {
            return (1..=total).map(Page).collect();
        }
        if current <= 3 {
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total)]
        } else if current < total - 2 {
            vec![
                Page(1),
                Ellipsis,
                Page(current - 1),
                Page(current),
                Page(current + 1),
                Ellipsis,
                Page(total),
            ]
        } else {
            vec![
                Page(1),
                Ellipsis,
                Page(total - 3),
                Page(total - 2),
                Page(total - 1),
                Page(total),
            ]
        }
    }
}

/// One row of the admin table as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub source: String,
}

impl AdminRow {
    /// Build a display row, shortening the description to `preview` characters.
    pub fn from_record(record: &Record, preview: usize) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            description: truncate_text(&record.description, preview),
            published_at: record.published_at.clone(),
            source: record.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageLink::{Ellipsis, Page};

    fn records(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|i| Record::new(i, format!("Noticia {i}"), "2024-01-01", "S"))
            .collect()
    }

    #[test]
    fn test_privilege_gates_actions() {
        assert!(Privilege::ADMIN.allows(Action::Export));
        assert!(Privilege(9).allows(Action::Delete));
        assert!(!Privilege(1).allows(Action::Edit));
        assert!(Privilege::default().allowed_actions().is_empty());
        assert_eq!(
            Privilege(5).allowed_actions(),
            vec![Action::Edit, Action::Delete, Action::Export]
        );
    }

    #[test]
    fn test_page_items_and_total_pages() {
        let data = records(10);
        let mut table = AdminTable::new(4);
        assert_eq!(table.total_pages(data.len()), 3);

        table.go_to(3, data.len());
        let ids: Vec<String> = table.page_items(&data).iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["9", "10"]);

        table.go_to(99, data.len());
        assert_eq!(table.current_page(), 3);
        table.go_to(0, data.len());
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_set_items_per_page_resets_to_first_page() {
        let data = records(40);
        let mut table = AdminTable::new(4);
        table.go_to(5, data.len());
        table.set_items_per_page(20);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.page_items(&data).len(), 20);
    }

    #[test]
    fn test_empty_table() {
        let table = AdminTable::default();
        assert_eq!(table.total_pages(0), 0);
        assert!(table.page_items(&[]).is_empty());
        assert!(table.page_links(0).is_empty());
    }

    #[test]
    fn test_page_links_small() {
        let table = AdminTable::new(4);
        assert_eq!(table.page_links(17), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn test_page_links_windows() {
        let len = 40; // 10 pages of 4
        let mut table = AdminTable::new(4);

        assert_eq!(
            table.page_links(len),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );

        table.go_to(6, len);
        assert_eq!(
            table.page_links(len),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );

        table.go_to(9, len);
        assert_eq!(
            table.page_links(len),
            vec![Page(1), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn test_admin_row_truncates_description() {
        let record = Record::new(3, "T", "2024-01-01", "S").with_description("á".repeat(60));
        let row = AdminRow::from_record(&record, 50);
        assert_eq!(row.description.chars().count(), 53);
        assert!(row.description.ends_with("..."));
        assert_eq!(row.id, "3");
    }
}
