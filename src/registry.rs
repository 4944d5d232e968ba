//! Registry of open suggestion lists.
//!
//! At most one suggestion list is open across all mounted controls. Each
//! engine holds a handle to the same registry and records its list there
//! when it opens one; opening a list closes whatever list was open before.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Identity of a mounted control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u32);

impl ControlId {
    /// Numeric form of the id.
    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u32,
    open: Option<ControlId>,
}

/// Shared handle to the open-list registry.
///
/// Clones refer to the same registry.
#[derive(Debug, Clone, Default)]
pub struct ListRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl ListRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new control.
    pub fn register(&self) -> ControlId {
        let mut state = self.state.borrow_mut();
        let id = ControlId(state.next_id);
        state.next_id += 1;
        id
    }

    /// Record `id` as the owner of the open list.
    ///
    /// Returns the control whose list was closed by this, if any.
    pub fn open(&self, id: ControlId) -> Option<ControlId> {
        let mut state = self.state.borrow_mut();
        let previous = state.open.replace(id).filter(|&prev| prev != id);
        if let Some(prev) = previous {
            trace!(closed = prev.get(), opened = id.get(), "Closing other open list");
        }
        previous
    }

    /// Close the list of `id`, if it is the open one.
    pub fn close(&self, id: ControlId) {
        let mut state = self.state.borrow_mut();
        if state.open == Some(id) {
            state.open = None;
        }
    }

    /// Close every list except the one owned by `keep`.
    pub fn close_all_except(&self, keep: Option<ControlId>) {
        let mut state = self.state.borrow_mut();
        if state.open != keep {
            state.open = None;
        }
    }

    /// Close every list.
    pub fn close_all(&self) {
        self.close_all_except(None);
    }

    /// Check whether `id` owns the open list.
    pub fn is_open(&self, id: ControlId) -> bool {
        self.state.borrow().open == Some(id)
    }

    /// Owner of the open list.
    pub fn open_list(&self) -> Option<ControlId> {
        self.state.borrow().open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_unique_ids() {
        let registry = ListRegistry::new();
        let a = registry.register();
        let b = registry.register();
        assert_ne!(a, b);
    }

    #[test]
    fn test_opening_closes_others() {
        let registry = ListRegistry::new();
        let a = registry.register();
        let b = registry.register();

        assert_eq!(registry.open(a), None);
        assert!(registry.is_open(a));

        assert_eq!(registry.open(b), Some(a));
        assert!(!registry.is_open(a));
        assert!(registry.is_open(b));
    }

    #[test]
    fn test_reopening_same_list() {
        let registry = ListRegistry::new();
        let a = registry.register();
        registry.open(a);
        assert_eq!(registry.open(a), None);
        assert!(registry.is_open(a));
    }

    #[test]
    fn test_close_only_own_list() {
        let registry = ListRegistry::new();
        let a = registry.register();
        let b = registry.register();
        registry.open(b);
        registry.close(a);
        assert!(registry.is_open(b));
        registry.close(b);
        assert_eq!(registry.open_list(), None);
    }

    #[test]
    fn test_close_all_except() {
        let registry = ListRegistry::new();
        let a = registry.register();
        let b = registry.register();
        registry.open(a);

        registry.close_all_except(Some(a));
        assert!(registry.is_open(a));

        registry.close_all_except(Some(b));
        assert_eq!(registry.open_list(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = ListRegistry::new();
        let handle = registry.clone();
        let a = registry.register();
        handle.open(a);
        assert!(registry.is_open(a));
        registry.close_all();
        assert!(!handle.is_open(a));
    }
}
