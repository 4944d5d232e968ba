//! Option catalog for a picker.
//!
//! A catalog is built once, when a control is mounted, from the options the
//! source control declares. It is never mutated afterwards; every suggestion
//! list is a view over it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An option as declared by the source control, before normalization.
///
/// Both `text` and `value` are optional in the source data. Normalization
/// happens in [`Catalog::from_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOption {
    /// Display label of the option.
    #[serde(default)]
    pub text: Option<String>,
    /// Submitted value of the option. Defaults to the text when absent.
    #[serde(default)]
    pub value: Option<String>,
    /// Whether the option is explicitly marked as selected.
    #[serde(default)]
    pub selected: bool,
}

impl SourceOption {
    /// Create an option with both text and value.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            value: Some(value.into()),
            selected: false,
        }
    }

    /// Mark this option as selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Normalize into a catalog entry.
    ///
    /// Options without usable text are rejected. A missing value falls back
    /// to the text.
    fn normalize(&self) -> Option<CatalogEntry> {
        let text = self.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return None;
        }
        let value = self.value.clone().unwrap_or_else(|| text.to_string());
        Some(CatalogEntry::new(text, value))
    }
}

/// A known choice: what the user sees and what gets submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display label.
    pub text: String,
    /// Authoritative value.
    pub value: String,
}

impl CatalogEntry {
    /// Create a new entry.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Ordered, immutable list of catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create a catalog from already-normalized entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Build a catalog from source options, dropping malformed ones.
    pub fn from_options(options: &[SourceOption]) -> Self {
        let mut entries = Vec::with_capacity(options.len());
        for (position, option) in options.iter().enumerate() {
            match option.normalize() {
                Some(entry) => entries.push(entry),
                None => warn!(position, value = ?option.value, "Dropping option without text"),
            }
        }
        debug!(
            declared = options.len(),
            kept = entries.len(),
            "Built catalog"
        );
        Self { entries }
    }

    /// All entries, in source order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by position.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Find the first entry whose text equals `text`, ignoring ASCII case.
    pub fn find_exact_text(&self, text: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.text.eq_ignore_ascii_case(text))
    }

    /// Find the first entry with the given value.
    pub fn find_by_value(&self, value: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }
}

/// Values of the options explicitly marked as selected, in source order.
///
/// Options whose normalized value is empty never count as a selection.
pub fn preselected_values(options: &[SourceOption]) -> Vec<String> {
    options
        .iter()
        .filter(|option| option.selected)
        .filter_map(SourceOption::normalize)
        .map(|entry| entry.value)
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_options() -> Vec<SourceOption> {
        vec![
            SourceOption::new("Apple", "1"),
            SourceOption::new("Banana", "2").selected(),
            SourceOption::new("Cherry", "3"),
        ]
    }

    #[test]
    fn test_from_options_keeps_order() {
        let catalog = Catalog::from_options(&fruit_options());
        let texts: Vec<&str> = catalog.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_missing_value_falls_back_to_text() {
        let options = vec![SourceOption {
            text: Some("Plum".to_string()),
            value: None,
            selected: false,
        }];
        let catalog = Catalog::from_options(&options);
        assert_eq!(catalog.get(0), Some(&CatalogEntry::new("Plum", "Plum")));
    }

    #[test]
    fn test_missing_text_dropped() {
        let options = vec![
            SourceOption {
                text: None,
                value: Some("x".to_string()),
                selected: true,
            },
            SourceOption {
                text: Some("   ".to_string()),
                value: Some("y".to_string()),
                selected: false,
            },
            SourceOption::new("Kiwi", "k"),
        ];
        let catalog = Catalog::from_options(&options);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().text, "Kiwi");
    }

    #[test]
    fn test_text_is_trimmed() {
        let catalog = Catalog::from_options(&[SourceOption::new("  Fig \n", "f")]);
        assert_eq!(catalog.get(0).unwrap().text, "Fig");
    }

    #[test]
    fn test_duplicate_values_not_deduplicated() {
        let options = vec![SourceOption::new("Red", "c"), SourceOption::new("Crimson", "c")];
        let catalog = Catalog::from_options(&options);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_value("c").unwrap().text, "Red");
    }

    #[test]
    fn test_find_exact_text_ignores_case() {
        let catalog = Catalog::from_options(&fruit_options());
        assert_eq!(catalog.find_exact_text("banana").unwrap().value, "2");
        assert_eq!(catalog.find_exact_text("BANANA").unwrap().value, "2");
        assert!(catalog.find_exact_text("banan").is_none());
    }

    #[test]
    fn test_preselected_values() {
        assert_eq!(preselected_values(&fruit_options()), vec!["2"]);
    }

    #[test]
    fn test_preselected_empty_value_ignored() {
        let options = vec![SourceOption::new("Choose…", "").selected()];
        assert!(preselected_values(&options).is_empty());
    }

    #[test]
    fn test_source_option_deserialize_defaults() {
        let option: SourceOption = toml::from_str("text = \"Lime\"").unwrap();
        assert_eq!(option.text.as_deref(), Some("Lime"));
        assert!(option.value.is_none());
        assert!(!option.selected);
    }
}
