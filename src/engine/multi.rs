//! Tag input engine.
//!
//! Selected values are kept as an ordered list of tags, unique by value. The
//! serialized field and the rendered chips are both derived from that list
//! and never edited on their own. The input only ever holds the query being
//! typed; it is cleared after every commit.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{EngineOptions, KeyOutcome, Popup};
use crate::catalog::{Catalog, CatalogEntry};
use crate::codec::{self, Codec, PercentCodec};
use crate::events::Key;
use crate::focus::{ActiveItemTracker, Direction};
use crate::input::TextInput;
use crate::registry::{ControlId, ListRegistry};
use crate::suggestions::{Mode, SuggestionItem, SuggestionList};
use crate::timer::DeferredTask;

/// One selected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Chip label.
    pub text: String,
    /// Submitted value.
    pub value: String,
    /// The value came from free text rather than the catalog.
    pub is_new: bool,
}

/// Engine behind a multi-value tag input.
#[derive(Debug)]
pub struct MultiEngine {
    catalog: Catalog,
    allow_new: bool,
    separators: Vec<char>,
    settle_delay: Duration,
    codec: Box<dyn Codec>,
    input: TextInput,
    tags: Vec<Tag>,
    /// Comma-joined encoded values, re-derived on every change to `tags`.
    serialized: String,
    popup: Popup,
    reconcile_task: DeferredTask,
    focused: bool,
}

impl MultiEngine {
    /// Create an engine over `catalog`, registered with `registry`.
    pub fn new(catalog: Catalog, options: EngineOptions, registry: &ListRegistry) -> Self {
        Self {
            catalog,
            allow_new: options.allow_new,
            separators: options.separators,
            settle_delay: options.settle_delay,
            codec: Box::new(PercentCodec),
            input: TextInput::new(),
            tags: Vec::new(),
            serialized: String::new(),
            popup: Popup::new(registry, options.max_visible),
            reconcile_task: DeferredTask::new(),
            focused: false,
        }
    }

    /// Replace the value codec.
    pub fn with_codec(mut self, codec: Box<dyn Codec>) -> Self {
        self.codec = codec;
        self.sync_serialized();
        self
    }

    /// Set the placeholder shown while the input is empty.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.input.set_placeholder(placeholder);
    }

    /// Start with the catalog entries holding `values` selected.
    ///
    /// Entries are added in catalog order. Returns how many tags were added.
    pub fn preselect<S: AsRef<str>>(&mut self, values: &[S]) -> usize {
        let entries: Vec<CatalogEntry> = self
            .catalog
            .entries()
            .iter()
            .filter(|entry| values.iter().any(|v| v.as_ref() == entry.value))
            .cloned()
            .collect();
        let mut added = 0;
        for entry in entries {
            if self.add_tag(&entry.text, &entry.value, false) {
                added += 1;
            }
        }
        added
    }

    /// Registry id of this control.
    pub fn id(&self) -> ControlId {
        self.popup.id()
    }

    /// The catalog this engine picks from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The query buffer.
    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// The current query.
    pub fn query(&self) -> &str {
        self.input.value()
    }

    /// Selected tags, in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Selected values, in insertion order.
    pub fn selected_values(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.value.as_str()).collect()
    }

    /// The serialized field content.
    pub fn serialized_value(&self) -> &str {
        &self.serialized
    }

    /// Whether free text is accepted.
    pub fn allows_new(&self) -> bool {
        self.allow_new
    }

    /// Characters that commit like Enter.
    pub fn separators(&self) -> &[char] {
        &self.separators
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

    fn contains_value(&self, value: &str) -> bool {
        self.tags.iter().any(|tag| tag.value == value)
    }

    fn sync_serialized(&mut self) {
        self.serialized = codec::join(
            self.codec.as_ref(),
            self.tags.iter().map(|tag| tag.value.as_str()),
        );
    }

    /// Append a tag unless its value is already selected.
    ///
    /// Returns true if a tag was added.
    pub fn add_tag(&mut self, text: &str, value: &str, is_new: bool) -> bool {
        if self.contains_value(value) {
            trace!(control = self.id().get(), value, "Value already selected");
            return false;
        }
        debug!(control = self.id().get(), text, value, is_new, "Added tag");
        self.tags.push(Tag {
            text: text.to_string(),
            value: value.to_string(),
            is_new,
        });
        self.sync_serialized();
        // Already-selected flags changed
        if self.popup.is_open() {
            self.refresh_suggestions();
        }
        true
    }

    /// Remove the first tag holding `value`.
    ///
    /// The input is refocused and the suggestions rebuilt, so the removed
    /// value is offered again.
    pub fn remove_tag(&mut self, value: &str) -> bool {
        let Some(position) = self.tags.iter().position(|tag| tag.value == value) else {
            return false;
        };
        let removed = self.tags.remove(position);
        debug!(control = self.id().get(), value = %removed.value, "Removed tag");
        self.sync_serialized();
        self.popup.close();
        self.focus_gained();
        self.refresh_suggestions();
        true
    }

    /// Remove the tag at `index` (a press on its remove mark).
    pub fn press_tag_remove(&mut self, index: usize) -> bool {
        match self.tags.get(index).map(|tag| tag.value.clone()) {
            Some(value) => self.remove_tag(&value),
            None => false,
        }
    }

    /// Remove the most recently added tag.
    pub fn remove_last_tag(&mut self) -> bool {
        match self.tags.last().map(|tag| tag.value.clone()) {
            Some(value) => self.remove_tag(&value),
            None => false,
        }
    }

    /// Replace the query text and rebuild the suggestions.
    pub fn on_query_change(&mut self, text: &str) {
        self.input.set_value(text);
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        if self.input.is_empty() {
            self.popup.close();
            return;
        }
        let selected: Vec<&str> = self.tags.iter().map(|tag| tag.value.as_str()).collect();
        self.popup.open(
            &self.catalog,
            self.input.value(),
            Mode::Multi,
            &selected,
            self.allow_new,
        );
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
                self.commit_from_keyboard();
                KeyOutcome::Consumed
            }
            Key::Char(c) if self.separators.contains(&c) => {
                self.commit_from_keyboard();
                KeyOutcome::Consumed
            }
            Key::Tab => {
                if self.commit_focused() {
                    KeyOutcome::Consumed
                } else {
                    KeyOutcome::Propagate
                }
            }
            Key::Backspace if self.input.is_empty() => {
                self.remove_last_tag();
                KeyOutcome::Consumed
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

    fn commit_from_keyboard(&mut self) -> bool {
        self.commit_focused() || self.commit_text()
    }

    /// Commit the active suggestion.
    ///
    /// Returns false when no list is open or nothing is active.
    pub fn commit_focused(&mut self) -> bool {
        match self.popup.focused_item() {
            Some(item) => self.commit_item(item),
            None => false,
        }
    }

    /// Commit the suggestion at `row` of the open list (a pointer press).
    ///
    /// Pressing an already-selected row is accepted and does nothing.
    pub fn press_item(&mut self, row: usize) -> bool {
        match self.popup.item(row) {
            Some(item) if item.is_selectable() => self.commit_item(item),
            Some(item) => {
                trace!(control = self.id().get(), value = item.value(), "Ignored press on selected row");
                false
            }
            None => false,
        }
    }

    fn commit_item(&mut self, item: SuggestionItem) -> bool {
        let added = match item {
            SuggestionItem::Existing {
                already_selected: true,
                ..
            } => return false,
            SuggestionItem::Existing { entry, .. } => {
                self.add_tag(&entry.text, &entry.value, false)
            }
            SuggestionItem::CreateNew { text } => self.add_tag(&text, &text, true),
        };
        self.finish_commit();
        added
    }

    /// Commit the typed text: its exact catalog entry if it has one,
    /// otherwise a free-text tag when free text is allowed.
    ///
    /// The query is cleared whenever a commit was attempted.
    pub fn commit_text(&mut self) -> bool {
        let trimmed = self.input.value().trim().to_string();
        if trimmed.is_empty() {
            return false;
        }
        let added = if let Some(entry) = self.catalog.find_exact_text(&trimmed).cloned() {
            self.add_tag(&entry.text, &entry.value, false)
        } else if self.allow_new {
            self.add_tag(&trimmed, &trimmed, true)
        } else {
            return false;
        };
        self.finish_commit();
        added
    }

    fn finish_commit(&mut self) {
        self.input.clear();
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

    /// Turn whatever query is left into a tag, if it resolves to one, and
    /// clear it.
    pub fn reconcile(&mut self) {
        if !self.commit_text() && !self.input.is_empty() {
            debug!(control = self.id().get(), rejected = %self.input.value(), "Discarded unmatched query");
        }
        self.input.clear();
        self.popup.close();
    }
}
