//! Keyboard focus within an open suggestion list.

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Tracks the active item among the selectable rows of a list.
///
/// The focus is a position in the selectable subset, not a row index.
/// Moving past either end wraps around. The tracker also keeps a scroll
/// offset, in rows, so the active row stays inside a viewport of
/// `max_visible` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveItemTracker {
    count: usize,
    focus: Option<usize>,
    scroll: usize,
    max_visible: usize,
}

impl ActiveItemTracker {
    /// Create a tracker for a viewport of `max_visible` rows.
    pub fn new(max_visible: usize) -> Self {
        Self {
            count: 0,
            focus: None,
            scroll: 0,
            max_visible: max_visible.max(1),
        }
    }

    /// Start tracking a freshly opened list with `count` selectable items.
    ///
    /// The first selectable item becomes active, if there is one.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.focus = if count > 0 { Some(0) } else { None };
        self.scroll = 0;
    }

    /// Forget the list.
    pub fn clear(&mut self) {
        self.reset(0);
    }

    /// Move the focus one step, wrapping at either end.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        if self.count == 0 {
            self.focus = None;
            return None;
        }
        let next = match (direction, self.focus) {
            (Direction::Down, None) => 0,
            (Direction::Down, Some(current)) => (current + 1) % self.count,
            (Direction::Up, None) | (Direction::Up, Some(0)) => self.count - 1,
            (Direction::Up, Some(current)) => current - 1,
        };
        self.focus = Some(next.min(self.count - 1));
        self.focus
    }

    /// Position of the active item among selectable items.
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Check whether the given selectable position is the active one.
    pub fn is_active(&self, position: usize) -> bool {
        self.focus == Some(position)
    }

    /// Number of selectable items tracked.
    pub fn count(&self) -> usize {
        self.count
    }

    /// First visible row.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Maximum number of visible rows.
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Adjust the scroll offset so `row` is visible.
    pub fn reveal(&mut self, row: usize) {
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + self.max_visible {
            self.scroll = row + 1 - self.max_visible;
        }
    }
}

impl Default for ActiveItemTracker {
    fn default() -> Self {
        Self::new(8)
    }
}
