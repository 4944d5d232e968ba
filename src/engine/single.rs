//! Single-value picker engine.
//!
//! The visible text is free to edit, but the serialized value only ever
//! holds a committed choice: a catalog entry, accepted free text, or nothing.
//! An edit that cannot be reconciled is rolled back to the last valid text.

use std::time::{Duration, Instant};

use tracing::debug;

use super::{EngineOptions, KeyOutcome, Popup};
use crate::catalog::{Catalog, CatalogEntry};
use crate::codec::{Codec, PercentCodec};
use crate::events::Key;
use crate::focus::{ActiveItemTracker, Direction};
use crate::input::TextInput;
use crate::registry::{ControlId, ListRegistry};
use crate::suggestions::{Mode, SuggestionItem, SuggestionList};
use crate::timer::DeferredTask;

/// Engine behind a single-value picker.
#[derive(Debug)]
pub struct SingleEngine {
    catalog: Catalog,
    allow_new: bool,
    settle_delay: Duration,
    codec: Box<dyn Codec>,
    input: TextInput,
    /// Encoded authoritative value.
    value: String,
    /// Text of the last commit; restored when an edit is rejected.
    last_valid_text: String,
    popup: Popup,
    reconcile_task: DeferredTask,
    focused: bool,
}

impl SingleEngine {
    /// Create an engine over `catalog`, registered with `registry`.
    pub fn new(catalog: Catalog, options: EngineOptions, registry: &ListRegistry) -> Self {
        Self {
            catalog,
            allow_new: options.allow_new,
            settle_delay: options.settle_delay,
            codec: Box::new(PercentCodec),
            input: TextInput::new(),
            value: String::new(),
            last_valid_text: String::new(),
            popup: Popup::new(registry, options.max_visible),
            reconcile_task: DeferredTask::new(),
            focused: false,
        }
    }

    /// Replace the value codec.
    pub fn with_codec(mut self, codec: Box<dyn Codec>) -> Self {
        if !self.value.is_empty() {
            let raw = self.codec.decode(&self.value);
            self.value = codec.encode(&raw);
        }
        self.codec = codec;
        self
    }

    /// Set the placeholder shown while the input is empty.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.input.set_placeholder(placeholder);
    }

    /// Start with the catalog entry holding `value`, if there is one.
    pub fn preselect(&mut self, value: &str) -> bool {
        match self.catalog.find_by_value(value).cloned() {
            Some(entry) => {
                self.commit_entry(&entry);
                true
            }
            None => false,
        }
    }

    /// Registry id of this control.
    pub fn id(&self) -> ControlId {
        self.popup.id()
    }

    /// The catalog this engine picks from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The input buffer.
    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// The visible text.
    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// The serialized field content.
    pub fn serialized_value(&self) -> &str {
        &self.value
    }

    /// Text restored when an edit is rejected.
    pub fn last_valid_text(&self) -> &str {
        &self.last_valid_text
    }

    /// Whether free text is accepted.
    pub fn allows_new(&self) -> bool {
        self.allow_new
    }

    /// The open suggestion list.
    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.popup.list()
    }

    /// Focus state of the open list.
    pub fn tracker(&self) -> &ActiveItemTracker {
        self.popup.tracker()
    }

    /// Whether the input currently has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether a blur reconciliation is waiting to run.
    pub fn is_reconcile_pending(&self) -> bool {
        self.reconcile_task.is_pending()
    }

    /// Replace the query text and rebuild the suggestions.
    pub fn on_query_change(&mut self, text: &str) {
        self.input.set_value(text);
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        if self.input.is_empty() {
            // Nothing is chosen any more, so a later rollback restores nothing
            self.popup.close();
            self.value.clear();
            self.last_valid_text.clear();
            return;
        }
        self.popup
            .open(&self.catalog, self.input.value(), Mode::Single, &[], false);
    }

    /// Close the suggestion list without committing.
    pub fn close_suggestions(&mut self) {
        self.popup.close();
    }

    /// Handle a key press while focused.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match key {
            Key::Down => {
                self.popup.advance(Direction::Down);
                KeyOutcome::Consumed
            }
            Key::Up => {
                self.popup.advance(Direction::Up);
                KeyOutcome::Consumed
            }
            Key::Enter => {
                if !self.commit_focused() {
                    self.commit_text();
                }
                KeyOutcome::Consumed
            }
            Key::Tab => {
                // Without an active item Tab moves on; the blur finalizes
                if self.commit_focused() {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Propagate
                }
            }
            Key::Escape => {
                if self.popup.is_open() {
                    self.popup.close();
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Propagate
                }
            }
            Key::BackTab | Key::Other => KeyOutcome::Propagate,
            editing => {
                if self.input.handle_key(editing) {
                    self.refresh_suggestions();
                }
                KeyOutcome::Consumed
            }
        }
    }

    /// Commit the active suggestion.
    ///
    /// Returns false when no list is open or nothing is active.
    pub fn commit_focused(&mut self) -> bool {
        match self.popup.focused_item() {
            Some(item) => self.commit_item(&item),
            None => false,
        }
    }

    /// Commit the suggestion at `row` of the open list (a pointer press).
    pub fn press_item(&mut self, row: usize) -> bool {
        match self.popup.item(row) {
            Some(item) => self.commit_item(&item),
            None => false,
        }
    }

    fn commit_item(&mut self, item: &SuggestionItem) -> bool {
        match item {
            SuggestionItem::Existing { entry, .. } => {
                let entry = entry.clone();
                self.commit_entry(&entry);
                true
            }
            SuggestionItem::CreateNew { text } => {
                let text = text.clone();
                self.commit_free_text(&text)
            }
        }
    }

    /// Commit the typed text: its exact catalog entry if it has one,
    /// otherwise the text itself when free text is allowed.
    pub fn commit_text(&mut self) -> bool {
        let trimmed = self.input.value().trim().to_string();
        if trimmed.is_empty() {
            return false;
        }
        if let Some(entry) = self.catalog.find_exact_text(&trimmed).cloned() {
            self.commit_entry(&entry);
            return true;
        }
        self.commit_free_text(&trimmed)
    }

    fn commit_entry(&mut self, entry: &CatalogEntry) {
        debug!(control = self.id().get(), text = %entry.text, value = %entry.value, "Committed option");
        self.input.set_value(entry.text.as_str());
        self.value = self.codec.encode(&entry.value);
        self.last_valid_text = entry.text.clone();
        self.finish_commit();
    }

    fn commit_free_text(&mut self, text: &str) -> bool {
        if !self.allow_new || text.is_empty() {
            return false;
        }
        debug!(control = self.id().get(), text, "Committed free text");
        self.input.set_value(text);
        self.value = self.codec.encode(text);
        self.last_valid_text = text.to_string();
        self.finish_commit();
        true
    }

    fn finish_commit(&mut self) {
        self.popup.close();
        self.reconcile_task.cancel();
    }

    /// The input gained focus.
    pub fn focus_gained(&mut self) {
        self.focused = true;
        self.reconcile_task.cancel();
    }

    /// The input lost focus; reconcile once the settle delay has passed.
    pub fn focus_lost(&mut self, now: Instant) {
        self.focused = false;
        self.reconcile_task.schedule(now, self.settle_delay);
    }

    /// Run the deferred reconciliation if it is due.
    ///
    /// Returns true if it ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.reconcile_task.fire_if_due(now) {
            self.reconcile();
            true
        } else {
            false
        }
    }

    /// Run a pending reconciliation right away.
    pub fn flush(&mut self) {
        if self.reconcile_task.is_pending() || self.focused {
            self.reconcile_task.cancel();
            self.reconcile();
        }
    }

    /// Bring the value and the visible text back in agreement.
    ///
    /// Reads the current state only, so it is safe to run late and running
    /// it twice changes nothing.
    pub fn reconcile(&mut self) {
        let trimmed = self.input.value().trim().to_string();
        if trimmed.is_empty() {
            self.input.clear();
            self.value.clear();
            self.last_valid_text.clear();
            self.popup.close();
            return;
        }
        if self.commit_text() {
            return;
        }
        debug!(
            control = self.id().get(),
            rejected = %trimmed,
            restored = %self.last_valid_text,
            "Rolled back unmatched text"
        );
        let restored = self.last_valid_text.clone();
        self.input.set_value(restored);
        self.popup.close();
    }
}
