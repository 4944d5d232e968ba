//! Mapping pointer positions back to what was drawn there.

use ratatui::layout::Rect;

use crate::mount::PressTarget;

/// Regions recorded while rendering, in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    regions: Vec<(Rect, PressTarget)>,
}

impl HitMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `target` as drawn over `area`.
    pub fn push(&mut self, area: Rect, target: PressTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// Number of recorded regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The target under `(column, row)`.
    ///
    /// Later regions were drawn on top, so they win.
    pub fn hit_test(&self, column: u16, row: u16) -> PressTarget {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
            })
            .map(|(_, target)| *target)
            .unwrap_or(PressTarget::Elsewhere)
    }
}
