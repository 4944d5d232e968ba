//! Suggestion and selection engines.
//!
//! One engine is mounted per enhanced control: [`SingleEngine`] for a
//! single-value picker, [`MultiEngine`] for a tag input. Both own their query
//! buffer, their open suggestion list and a deferred blur reconciliation.

mod multi;
mod single;

use std::time::Duration;

use crate::catalog::Catalog;
use crate::focus::{ActiveItemTracker, Direction};
use crate::matcher::find_matches;
use crate::registry::{ControlId, ListRegistry};
use crate::suggestions::{Mode, SuggestionItem, SuggestionList};

pub use multi::{MultiEngine, Tag};
pub use single::SingleEngine;

/// Default delay between losing focus and reconciling.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Default number of visible suggestion rows.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

/// Behaviour flags shared by both engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Accept values that are not in the catalog.
    pub allow_new: bool,
    /// Characters that commit like Enter (tag inputs only).
    pub separators: Vec<char>,
    /// Delay before a blur is reconciled.
    pub settle_delay: Duration,
    /// Number of suggestion rows kept in view.
    pub max_visible: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            allow_new: false,
            separators: Vec::new(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

impl EngineOptions {
    /// Options accepting free text.
    pub fn allowing_new(mut self) -> Self {
        self.allow_new = true;
        self
    }

    /// Options with the given separator characters.
    pub fn with_separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.separators = separators.into_iter().collect();
        self
    }
}

/// What the host should do after a key went to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The engine handled the key; the host's default action is suppressed.
    Consumed,
    /// The engine did not act; the host may run its default action
    /// (moving focus on Tab, leaving on Escape).
    Propagate,
}

/// The suggestion popup of one control.
///
/// The list is only considered open while the registry says this control
/// owns the open list; another control opening its list closes this one.
#[derive(Debug)]
pub(crate) struct Popup {
    id: ControlId,
    registry: ListRegistry,
    list: Option<SuggestionList>,
    tracker: ActiveItemTracker,
}

impl Popup {
    pub(crate) fn new(registry: &ListRegistry, max_visible: usize) -> Self {
        Self {
            id: registry.register(),
            registry: registry.clone(),
            list: None,
            tracker: ActiveItemTracker::new(max_visible),
        }
    }

    pub(crate) fn id(&self) -> ControlId {
        self.id
    }

    /// Build and open the list for `query`, closing every other list.
    pub(crate) fn open(
        &mut self,
        catalog: &Catalog,
        query: &str,
        mode: Mode,
        selected: &[&str],
        allow_new: bool,
    ) {
        let matches = find_matches(catalog, query);
        let list = SuggestionList::build(catalog, matches, query, mode, selected, allow_new);
        tracing::trace!(
            control = self.id.get(),
            query,
            rows = list.len(),
            selectable = list.selectable_count(),
            "Rebuilt suggestions"
        );
        self.registry.open(self.id);
        self.tracker.reset(list.selectable_count());
        if let Some(row) = self.tracker.focus().and_then(|p| list.row_of(p)) {
            self.tracker.reveal(row);
        }
        self.list = Some(list);
    }

    pub(crate) fn close(&mut self) {
        self.list = None;
        self.tracker.clear();
        self.registry.close(self.id);
    }

    pub(crate) fn list(&self) -> Option<&SuggestionList> {
        self.list
            .as_ref()
            .filter(|_| self.registry.is_open(self.id))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.list().is_some()
    }

    pub(crate) fn tracker(&self) -> &ActiveItemTracker {
        &self.tracker
    }

    /// Move the active item and scroll it into view.
    ///
    /// Returns false when no list is open.
    pub(crate) fn advance(&mut self, direction: Direction) -> bool {
        let Some(list) = self.list.as_ref().filter(|_| self.registry.is_open(self.id)) else {
            return false;
        };
        if let Some(row) = self.tracker.advance(direction).and_then(|p| list.row_of(p)) {
            self.tracker.reveal(row);
        }
        true
    }

    /// The active item, if a list is open and something is focused.
    pub(crate) fn focused_item(&self) -> Option<SuggestionItem> {
        let list = self.list()?;
        let position = self.tracker.focus()?;
        list.selectable_item(position).cloned()
    }

    /// The item at `row` of the open list.
    pub(crate) fn item(&self, row: usize) -> Option<SuggestionItem> {
        self.list()?.get(row).cloned()
    }
}
