//! Authorization-gated progressive disclosure of filtered records.
//!
//! The gate is a two-state machine:
//!
//! ```text
//!            authorize()
//!   Gated ─────────────────▶ Revealing
//!     ▲                          │
//!     └──────── deauthorize() ───┘   (resets count, clears criteria)
//! ```
//!
//! While `Gated`, `visible_count` stays at its initial value and a request for
//! more yields [`RevealOutcome::LoginPrompt`]. While `Revealing`, each request
//! grows the count by one page, never past the filtered length.

use crate::models::{FilterCriteria, Record};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Records shown before any "load more", and the default page increment.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Gated,
    Revealing,
}

/// Result of a "load more" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RevealOutcome {
    /// The count grew to `visible_count`.
    Revealed { visible_count: usize },
    /// Everything filtered is already visible.
    Exhausted,
    /// Not authorized: the UI should ask the reader to sign in.
    LoginPrompt,
}

/// Reveal state owned by one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationGate {
    state: GateState,
    visible_count: usize,
    initial_visible: usize,
    page_size: usize,
}

impl Default for PaginationGate {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE)
    }
}

impl PaginationGate {
    /// A gate in the `Gated` state showing `initial_visible` records.
    pub fn new(initial_visible: usize, page_size: usize) -> Self {
        Self {
            state: GateState::Gated,
            visible_count: initial_visible,
            initial_visible,
            page_size,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_authorized(&self) -> bool {
        self.state == GateState::Revealing
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `Gated -> Revealing`. The visible count is left untouched.
    pub fn authorize(&mut self) {
        if self.state == GateState::Gated {
            info!(visible_count = self.visible_count, "Reveal gate authorized");
        }
        self.state = GateState::Revealing;
    }

    /// Return to `Gated` from any state.
    ///
    /// Resets the visible count to its initial value and clears `criteria`,
    /// so a signed-out view never shows a filtered-but-gated list.
    pub fn deauthorize(&mut self, criteria: &mut FilterCriteria) {
        info!(
            was = ?self.state,
            visible_count = self.visible_count,
            "Reveal gate deauthorized; resetting"
        );
        self.state = GateState::Gated;
        self.visible_count = self.initial_visible;
        criteria.clear();
    }

    /// Reveal one more page of a filtered collection of `filtered_len` records.
    ///
    /// In `Revealing` the count grows by `page_size`, clamped at
    /// `filtered_len`; it never shrinks. In `Gated` nothing changes and the
    /// caller is told to prompt for sign-in.
    pub fn request_more(&mut self, filtered_len: usize) -> RevealOutcome {
        if self.state == GateState::Gated {
            debug!("Load more requested while gated; prompting for login");
            return RevealOutcome::LoginPrompt;
        }
        if self.visible_count >= filtered_len {
            return RevealOutcome::Exhausted;
        }
        self.visible_count = self.visible_count.saturating_add(self.page_size).min(filtered_len);
        debug!(visible_count = self.visible_count, filtered_len, "Revealed more records");
        RevealOutcome::Revealed {
            visible_count: self.visible_count,
        }
    }

    /// `true` when the filtered collection holds records beyond the current reveal.
    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.visible_count < filtered_len
    }

    /// The currently revealed prefix of `filtered`.
    pub fn visible_slice<'a>(&self, filtered: &'a [Record]) -> &'a [Record] {
        visible_slice(filtered, self.visible_count)
    }
}

/// The first `min(visible_count, filtered.len())` records, in order.
pub fn visible_slice(filtered: &[Record], visible_count: usize) -> &[Record] {
    &filtered[..visible_count.min(filtered.len())]
}
