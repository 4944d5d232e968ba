//! Suggestion lists shown under a picker while the user types.
//!
//! A list is rebuilt from scratch on every query change. Items are either
//! catalog matches or, for tag inputs that accept free text, one synthetic
//! "create new" item at the end.

use crate::catalog::{Catalog, CatalogEntry};
use crate::matcher::{highlight_parts, Match};

/// Interaction mode of a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One value, replaced on each commit.
    #[default]
    Single,
    /// An ordered set of tags.
    Multi,
}

/// One row of a suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionItem {
    /// A catalog entry containing the query.
    Existing {
        entry: CatalogEntry,
        offset: usize,
        /// The entry's value is already a tag. Shown, but not actionable.
        already_selected: bool,
    },
    /// Free text offered as a new tag.
    CreateNew { text: String },
}

impl SuggestionItem {
    /// Display text of the item.
    pub fn text(&self) -> &str {
        match self {
            SuggestionItem::Existing { entry, .. } => &entry.text,
            SuggestionItem::CreateNew { text } => text,
        }
    }

    /// Value committed when the item is chosen.
    pub fn value(&self) -> &str {
        match self {
            SuggestionItem::Existing { entry, .. } => &entry.value,
            SuggestionItem::CreateNew { text } => text,
        }
    }

    /// Whether the item takes part in focus traversal and commits.
    pub fn is_selectable(&self) -> bool {
        !matches!(
            self,
            SuggestionItem::Existing {
                already_selected: true,
                ..
            }
        )
    }

    /// Whether this is the synthetic free-text item.
    pub fn is_new(&self) -> bool {
        matches!(self, SuggestionItem::CreateNew { .. })
    }

    /// Split the display text around the emphasized match.
    ///
    /// The free-text item has no emphasis.
    pub fn highlight(&self, query_len: usize) -> (&str, &str, &str) {
        match self {
            SuggestionItem::Existing { entry, offset, .. } => {
                highlight_parts(&entry.text, *offset, query_len)
            }
            SuggestionItem::CreateNew { text } => (text.as_str(), "", ""),
        }
    }
}

/// The list built for one query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuggestionList {
    query: String,
    items: Vec<SuggestionItem>,
    /// Row indices of the selectable items, in row order.
    selectable: Vec<usize>,
}

impl SuggestionList {
    /// Build the list for `query` from its catalog matches.
    ///
    /// In multi mode, matches whose value is in `selected` are flagged as
    /// already selected. When `allow_new` is set in multi mode and the
    /// trimmed query equals no catalog text, a create-new item is appended.
    pub fn build(
        catalog: &Catalog,
        matches: Vec<Match>,
        query: &str,
        mode: Mode,
        selected: &[&str],
        allow_new: bool,
    ) -> Self {
        let mut items: Vec<SuggestionItem> = matches
            .into_iter()
            .map(|m| {
                let already_selected = mode == Mode::Multi
                    && selected.iter().any(|value| *value == m.entry.value);
                SuggestionItem::Existing {
                    entry: m.entry,
                    offset: m.offset,
                    already_selected,
                }
            })
            .collect();

        let trimmed = query.trim();
        if mode == Mode::Multi
            && allow_new
            && !trimmed.is_empty()
            && catalog.find_exact_text(trimmed).is_none()
        {
            items.push(SuggestionItem::CreateNew {
                text: trimmed.to_string(),
            });
        }

        let selectable = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_selectable())
            .map(|(row, _)| row)
            .collect();

        Self {
            query: query.to_string(),
            items,
            selectable,
        }
    }

    /// The query this list was built for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// All rows, including already-selected ones.
    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    /// Get a row.
    pub fn get(&self, row: usize) -> Option<&SuggestionItem> {
        self.items.get(row)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selectable rows.
    pub fn selectable_count(&self) -> usize {
        self.selectable.len()
    }

    /// Row index of the `position`-th selectable item.
    pub fn row_of(&self, position: usize) -> Option<usize> {
        self.selectable.get(position).copied()
    }

    /// The `position`-th selectable item.
    pub fn selectable_item(&self, position: usize) -> Option<&SuggestionItem> {
        self.row_of(position).and_then(|row| self.items.get(row))
    }

    /// Position among selectable items of the given row, if selectable.
    pub fn position_of(&self, row: usize) -> Option<usize> {
        self.selectable.iter().position(|&r| r == row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Apple", "1"),
            CatalogEntry::new("Banana", "2"),
            CatalogEntry::new("Papaya", "3"),
        ])
    }

    fn build(query: &str, mode: Mode, selected: &[&str], allow_new: bool) -> SuggestionList {
        let catalog = catalog();
        let matches = find_matches(&catalog, query);
        SuggestionList::build(&catalog, matches, query, mode, selected, allow_new)
    }

    #[test]
    fn test_single_mode_all_selectable() {
        let list = build("a", Mode::Single, &["1"], true);
        assert_eq!(list.len(), 3);
        assert_eq!(list.selectable_count(), 3);
        assert!(list.items().iter().all(|item| !item.is_new()));
    }

    #[test]
    fn test_multi_mode_flags_already_selected() {
        let list = build("a", Mode::Multi, &["2"], false);
        assert_eq!(list.len(), 3);
        assert_eq!(list.selectable_count(), 2);
        assert!(!list.get(1).unwrap().is_selectable());
        assert_eq!(list.row_of(0), Some(0));
        assert_eq!(list.row_of(1), Some(2));
        assert_eq!(list.position_of(1), None);
        assert_eq!(list.position_of(2), Some(1));
    }

    #[test]
    fn test_create_new_appended_last() {
        let list = build("ap", Mode::Multi, &[], true);
        let last = list.items().last().unwrap();
        assert_eq!(last, &SuggestionItem::CreateNew { text: "ap".to_string() });
        assert!(last.is_selectable());
        assert_eq!(list.selectable_count(), 3);
    }

    #[test]
    fn test_create_new_uses_trimmed_query() {
        let list = build("  Cherry ", Mode::Multi, &[], true);
        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().text(), "Cherry");
        assert_eq!(list.get(0).unwrap().value(), "Cherry");
        assert_eq!(list.query(), "  Cherry ");
    }

    #[test]
    fn test_no_create_new_on_exact_match() {
        let list = build("BANANA", Mode::Multi, &[], true);
        assert!(list.items().iter().all(|item| !item.is_new()));
    }

    #[test]
    fn test_no_create_new_for_blank_query() {
        let list = build("   ", Mode::Multi, &[], true);
        assert!(list.is_empty());
    }

    #[test]
    fn test_no_create_new_in_single_mode() {
        let list = build("Cherry", Mode::Single, &[], true);
        assert!(list.is_empty());
    }

    #[test]
    fn test_no_create_new_without_allow_new() {
        let list = build("Cherry", Mode::Multi, &[], false);
        assert!(list.is_empty());
    }

    #[test]
    fn test_item_highlight() {
        let list = build("pa", Mode::Single, &[], false);
        assert_eq!(list.get(0).unwrap().highlight(2), ("", "Pa", "paya"));
        let list = build("Kiwi", Mode::Multi, &[], true);
        assert_eq!(list.get(0).unwrap().highlight(4), ("Kiwi", "", ""));
    }
}
