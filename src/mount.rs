//! Mounting controls and routing host events to them.
//!
//! The form owns the open-list registry, decides which engine each declared
//! control gets, moves focus between controls, and reads back each control's
//! serialized value when the form is submitted.

use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::{preselected_values, Catalog};
use crate::codec::{self, PercentCodec};
use crate::config::{ControlSpec, FormSpec, Settings};
use crate::engine::{KeyOutcome, MultiEngine, SingleEngine};
use crate::events::Key;
use crate::focus::ActiveItemTracker;
use crate::input::TextInput;
use crate::registry::{ControlId, ListRegistry};
use crate::suggestions::SuggestionList;

/// A control that was not enhanced; it submits its preselected values as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainField {
    values: Vec<String>,
    serialized: String,
}

impl PlainField {
    fn new(values: Vec<String>) -> Self {
        let serialized = codec::join(&PercentCodec, values.iter().map(String::as_str));
        Self { values, serialized }
    }

    /// The preselected values.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The engine mounted for one control.
#[derive(Debug)]
pub enum Control {
    Single(SingleEngine),
    Multi(MultiEngine),
    Plain(PlainField),
}

impl Control {
    /// The serialized field content.
    pub fn serialized_value(&self) -> &str {
        match self {
            Control::Single(engine) => engine.serialized_value(),
            Control::Multi(engine) => engine.serialized_value(),
            Control::Plain(field) => &field.serialized,
        }
    }

    /// The query buffer, for enhanced controls.
    pub fn input(&self) -> Option<&TextInput> {
        match self {
            Control::Single(engine) => Some(engine.input()),
            Control::Multi(engine) => Some(engine.input()),
            Control::Plain(_) => None,
        }
    }

    /// The open suggestion list.
    pub fn suggestions(&self) -> Option<&SuggestionList> {
        match self {
            Control::Single(engine) => engine.suggestions(),
            Control::Multi(engine) => engine.suggestions(),
            Control::Plain(_) => None,
        }
    }

    /// Focus state of the open list.
    pub fn tracker(&self) -> Option<&ActiveItemTracker> {
        match self {
            Control::Single(engine) => Some(engine.tracker()),
            Control::Multi(engine) => Some(engine.tracker()),
            Control::Plain(_) => None,
        }
    }

    /// Whether the control can take focus.
    pub fn is_focusable(&self) -> bool {
        !matches!(self, Control::Plain(_))
    }

    fn handle_key(&mut self, key: Key) -> KeyOutcome {
        match self {
            Control::Single(engine) => engine.handle_key(key),
            Control::Multi(engine) => engine.handle_key(key),
            Control::Plain(_) => KeyOutcome::Propagate,
        }
    }

    fn press_item(&mut self, row: usize) -> bool {
        match self {
            Control::Single(engine) => engine.press_item(row),
            Control::Multi(engine) => engine.press_item(row),
            Control::Plain(_) => false,
        }
    }

    fn focus_gained(&mut self) {
        match self {
            Control::Single(engine) => engine.focus_gained(),
            Control::Multi(engine) => engine.focus_gained(),
            Control::Plain(_) => {}
        }
    }

    fn focus_lost(&mut self, now: Instant) {
        match self {
            Control::Single(engine) => engine.focus_lost(now),
            Control::Multi(engine) => engine.focus_lost(now),
            Control::Plain(_) => {}
        }
    }

    fn tick(&mut self, now: Instant) -> bool {
        match self {
            Control::Single(engine) => engine.tick(now),
            Control::Multi(engine) => engine.tick(now),
            Control::Plain(_) => false,
        }
    }

    fn flush(&mut self) {
        match self {
            Control::Single(engine) => engine.flush(),
            Control::Multi(engine) => engine.flush(),
            Control::Plain(_) => {}
        }
    }
}

/// A mounted control with its form metadata.
#[derive(Debug)]
pub struct MountedControl {
    /// Field name used in the submission.
    pub name: String,
    /// Label shown above the field.
    pub label: String,
    /// The mounted engine.
    pub control: Control,
}

/// Mount one control.
///
/// Controls that do not ask for enhancement, or that have nothing to pick
/// and accept no free text, become plain fields.
pub fn mount(spec: &ControlSpec, settings: &Settings, registry: &ListRegistry) -> MountedControl {
    let catalog = Catalog::from_options(&spec.options);
    let preselected = preselected_values(&spec.options);

    let control = if !spec.autocomplete || (catalog.is_empty() && !spec.allow_new) {
        debug!(control = %spec.name, "Control not enhanced");
        Control::Plain(PlainField::new(preselected))
    } else {
        let mut options = settings.engine_options();
        options.allow_new = spec.allow_new;
        if let Some(separators) = spec.separator_chars() {
            options.separators = separators;
        }

        if spec.multiple {
            let mut engine = MultiEngine::new(catalog, options, registry);
            if let Some(placeholder) = &spec.placeholder {
                engine.set_placeholder(placeholder.as_str());
            }
            engine.preselect(&preselected);
            Control::Multi(engine)
        } else {
            let mut engine = SingleEngine::new(catalog, options, registry);
            if let Some(placeholder) = &spec.placeholder {
                engine.set_placeholder(placeholder.as_str());
            }
            // Like a native select, the last selected option wins
            if let Some(value) = preselected.last() {
                engine.preselect(value);
            }
            Control::Single(engine)
        }
    };

    MountedControl {
        name: spec.name.clone(),
        label: spec.display_label().to_string(),
        control,
    }
}

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The input of a control.
    Input(usize),
    /// A row of the open suggestion list of a control.
    Item(usize, usize),
    /// The remove mark of a tag.
    TagRemove(usize, usize),
    /// Anywhere else.
    Elsewhere,
}

/// All mounted controls of a form.
#[derive(Debug)]
pub struct Form {
    title: Option<String>,
    registry: ListRegistry,
    controls: Vec<MountedControl>,
    focused: Option<usize>,
}

impl Form {
    /// Mount every control of `spec`. The first focusable control gets focus.
    pub fn mount(spec: &FormSpec, settings: &Settings) -> Self {
        let registry = ListRegistry::new();
        let controls: Vec<MountedControl> = spec
            .controls
            .iter()
            .map(|control| mount(control, settings, &registry))
            .collect();
        info!(
            controls = controls.len(),
            enhanced = controls.iter().filter(|c| c.control.is_focusable()).count(),
            "Mounted form"
        );
        let mut form = Self {
            title: spec.title.clone(),
            registry,
            controls,
            focused: None,
        };
        if let Some(first) = form.next_focusable(None, true) {
            form.focused = Some(first);
            form.controls[first].control.focus_gained();
        }
        form
    }

    /// Title of the form.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The mounted controls, in display order.
    pub fn controls(&self) -> &[MountedControl] {
        &self.controls
    }

    /// Mutable access to one control.
    pub fn control_mut(&mut self, index: usize) -> Option<&mut MountedControl> {
        self.controls.get_mut(index)
    }

    /// Index of the focused control.
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// The shared open-list registry.
    pub fn registry(&self) -> &ListRegistry {
        &self.registry
    }

    fn next_focusable(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.controls.len();
        if len == 0 {
            return None;
        }
        let start = match (from, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(current), true) => (current + 1) % len,
            (Some(current), false) => (current + len - 1) % len,
        };
        (0..len)
            .map(|step| {
                if forward {
                    (start + step) % len
                } else {
                    (start + len - step) % len
                }
            })
            .find(|&index| self.controls[index].control.is_focusable())
    }

    /// Move focus to `index`; `None` blurs every control.
    pub fn focus(&mut self, index: Option<usize>, now: Instant) {
        let index = index.filter(|&i| {
            self.controls
                .get(i)
                .is_some_and(|c| c.control.is_focusable())
        });
        if index == self.focused {
            return;
        }
        if let Some(previous) = self.focused {
            self.controls[previous].control.focus_lost(now);
        }
        self.focused = index;
        if let Some(current) = index {
            self.controls[current].control.focus_gained();
        }
    }

    /// Move focus to the next focusable control.
    pub fn focus_next(&mut self, now: Instant) {
        let next = self.next_focusable(self.focused, true);
        self.focus(next, now);
    }

    /// Move focus to the previous focusable control.
    pub fn focus_prev(&mut self, now: Instant) {
        let prev = self.next_focusable(self.focused, false);
        self.focus(prev, now);
    }

    /// Deliver a key to the focused control.
    ///
    /// Tab and Shift+Tab that the control does not consume move focus.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> KeyOutcome {
        let Some(index) = self.focused else {
            return match key {
                Key::Tab => {
                    self.focus_next(now);
                    KeyOutcome::Consumed
                }
                Key::BackTab => {
                    self.focus_prev(now);
                    KeyOutcome::Consumed
                }
                _ => KeyOutcome::Propagate,
            };
        };
        match (self.controls[index].control.handle_key(key), key) {
            (KeyOutcome::Propagate, Key::Tab) => {
                self.focus_next(now);
                KeyOutcome::Consumed
            }
            (KeyOutcome::Propagate, Key::BackTab) => {
                self.focus_prev(now);
                KeyOutcome::Consumed
            }
            (outcome, _) => outcome,
        }
    }

    /// Deliver a pointer press.
    pub fn press(&mut self, target: PressTarget, now: Instant) {
        match target {
            PressTarget::Input(index) => {
                self.registry.close_all_except(self.list_owner(index));
                self.focus(Some(index), now);
            }
            PressTarget::Item(index, row) => {
                self.focus(Some(index), now);
                if let Some(mounted) = self.controls.get_mut(index) {
                    mounted.control.press_item(row);
                }
            }
            PressTarget::TagRemove(index, tag) => {
                self.registry.close_all();
                self.focus(Some(index), now);
                if let Some(MountedControl {
                    control: Control::Multi(engine),
                    ..
                }) = self.controls.get_mut(index)
                {
                    engine.press_tag_remove(tag);
                }
            }
            PressTarget::Elsewhere => {
                self.registry.close_all();
                self.focus(None, now);
            }
        }
    }

    fn list_owner(&self, index: usize) -> Option<ControlId> {
        match self.controls.get(index).map(|c| &c.control) {
            Some(Control::Single(engine)) => Some(engine.id()),
            Some(Control::Multi(engine)) => Some(engine.id()),
            _ => None,
        }
    }

    /// Run due reconciliations.
    pub fn tick(&mut self, now: Instant) {
        for mounted in &mut self.controls {
            mounted.control.tick(now);
        }
    }

    /// Reconcile every control with pending or focused edits, then blur.
    pub fn flush(&mut self) {
        self.registry.close_all();
        for mounted in &mut self.controls {
            mounted.control.flush();
        }
    }

    /// Field names and serialized values, in display order.
    pub fn submission(&self) -> Vec<(String, String)> {
        self.controls
            .iter()
            .map(|mounted| (mounted.name.clone(), mounted.control.serialized_value().to_string()))
            .collect()
    }
}
