//! Event handling for the host.
//!
//! Terminal events are polled here and handed to the form; keys are reduced
//! to the logical [`Key`] vocabulary the pickers understand.

mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;
pub use keys::Key;

/// An event delivered to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse button or movement event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input within the tick rate; used to run deferred work.
    Tick,
}
