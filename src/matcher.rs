//! Substring matching of a query against the catalog.
//!
//! Matching is literal containment after ASCII upper-casing both sides. Since
//! ASCII folding never changes byte lengths, the offset found in the folded
//! text is also a valid byte offset into the original text.

use crate::catalog::{Catalog, CatalogEntry};

/// A catalog entry that contains the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Position of the entry in the catalog.
    pub index: usize,
    /// The matched entry.
    pub entry: CatalogEntry,
    /// Byte offset of the first occurrence of the query in `entry.text`.
    pub offset: usize,
}

impl Match {
    /// Split the entry text around the emphasized part.
    ///
    /// See [`highlight_parts`] for the emphasis rule.
    pub fn highlight(&self, query_len: usize) -> (&str, &str, &str) {
        highlight_parts(&self.entry.text, self.offset, query_len)
    }
}

/// Find every catalog entry containing `query`, keeping catalog order.
pub fn find_matches(catalog: &Catalog, query: &str) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_ascii_uppercase();
    catalog
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            entry
                .text
                .to_ascii_uppercase()
                .find(&needle)
                .map(|offset| Match {
                    index,
                    entry: entry.clone(),
                    offset,
                })
        })
        .collect()
}

/// Split `text` into the parts before, inside and after the emphasis.
///
/// The emphasized range starts at `offset` and is `len` bytes long, where
/// `len` is the length of the query, not of the matched text. With
/// non-ASCII input the two can differ and the emphasis is then misaligned.
/// The range is clamped to the text and to char boundaries.
pub fn highlight_parts(text: &str, offset: usize, len: usize) -> (&str, &str, &str) {
    let mut start = offset.min(text.len());
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = start.saturating_add(len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..start], &text[start..end], &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Apple", "1"),
            CatalogEntry::new("Banana", "2"),
            CatalogEntry::new("Pineapple", "3"),
            CatalogEntry::new("Mango", "4"),
        ])
    }

    #[test]
    fn test_single_match_with_offset() {
        let matches = find_matches(&catalog(), "an");
        let texts: Vec<&str> = matches.iter().map(|m| m.entry.text.as_str()).collect();
        assert_eq!(texts, vec!["Banana", "Mango"]);
        assert_eq!(matches[0].offset, 1);
        assert_eq!(matches[1].offset, 1);
    }

    #[test]
    fn test_case_insensitive() {
        let matches = find_matches(&catalog(), "APP");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].entry.text, "Apple");
        assert_eq!(matches[0].offset, 0);
        assert_eq!(matches[1].entry.text, "Pineapple");
        assert_eq!(matches[1].offset, 4);
    }

    #[test]
    fn test_catalog_order_not_offset_order() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("xxab", "late"),
            CatalogEntry::new("ab", "early"),
        ]);
        let matches = find_matches(&catalog, "ab");
        assert_eq!(matches[0].entry.value, "late");
        assert_eq!(matches[0].index, 0);
        assert_eq!(matches[1].index, 1);
    }

    #[test]
    fn test_no_match() {
        assert!(find_matches(&catalog(), "xyz").is_empty());
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        assert!(find_matches(&catalog(), "").is_empty());
    }

    #[test]
    fn test_every_match_contains_query_and_exclusions_do_not() {
        let catalog = catalog();
        for query in ["a", "P", "ng", "apple", "z", "e"] {
            let matches = find_matches(&catalog, query);
            let upper = query.to_ascii_uppercase();
            for m in &matches {
                let text = m.entry.text.to_ascii_uppercase();
                assert_eq!(&text[m.offset..m.offset + query.len()], upper);
            }
            for (index, entry) in catalog.entries().iter().enumerate() {
                if !matches.iter().any(|m| m.index == index) {
                    assert!(!entry.text.to_ascii_uppercase().contains(&upper));
                }
            }
        }
    }

    #[test]
    fn test_highlight_parts() {
        let matches = find_matches(&catalog(), "nan");
        assert_eq!(matches[0].highlight(3), ("Ba", "nan", "a"));
    }

    #[test]
    fn test_highlight_clamped_to_text() {
        assert_eq!(highlight_parts("abc", 2, 10), ("ab", "c", ""));
        assert_eq!(highlight_parts("abc", 7, 1), ("abc", "", ""));
    }

    #[test]
    fn test_highlight_respects_char_boundaries() {
        // "é" is two bytes; a one-byte emphasis must not split it
        assert_eq!(highlight_parts("café", 3, 1), ("caf", "", "é"));
    }
}
