//! tagpick - filterable pickers and tag inputs for terminal forms.
//!
//! The engines under [`engine`] turn a static list of options into a
//! keyboard-navigable picker, either replacing one value or collecting an
//! ordered set of tags. They are independent of any terminal; the [`app`]
//! and [`ui`] modules host them in a ratatui form.

pub mod app;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod focus;
pub mod input;
pub mod logging;
pub mod matcher;
pub mod mount;
pub mod registry;
pub mod suggestions;
pub mod timer;
pub mod ui;

pub use catalog::{Catalog, CatalogEntry, SourceOption};
pub use engine::{EngineOptions, KeyOutcome, MultiEngine, SingleEngine, Tag};
pub use events::Key;
pub use mount::{Control, Form, MountedControl};
pub use registry::ListRegistry;
