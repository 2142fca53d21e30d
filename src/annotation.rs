//! Raw annotation records as produced by a rater.
//!
//! An [`Annotation`] is one (item, labels) pair exactly as it came out of a
//! rater's export: the item text untrimmed, the label list as typed
//! (comma-separated, mixed case). Normalization happens when the two raters'
//! sets are merged, not here.

use serde::{Deserialize, Serialize};

/// One rater's labels for one item, in raw form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Raw item text identifying what was annotated.
    pub item: String,
    /// Raw comma-separated label list, as typed by the rater.
    pub labels: String,
}

impl Annotation {
    /// Create an annotation from raw item and label text.
    pub fn new(item: impl Into<String>, labels: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            labels: labels.into(),
        }
    }
}

/// All annotations from a single rater, in export order.
///
/// Order is irrelevant downstream (the merge keys by item), but it is kept so
/// the reconciled table comes out in a stable, reproducible order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSet {
    /// The rater's records.
    pub rows: Vec<Annotation>,
}

impl AnnotationSet {
    /// Wrap a list of annotations.
    pub fn new(rows: Vec<Annotation>) -> Self {
        Self { rows }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the rater produced no records at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a raw label string into lower-cased, trimmed tokens.
///
/// The separator is the exact two-character sequence `", "`; a bare comma
/// does not split. Tokens that are empty after trimming are dropped (an
/// all-whitespace label cell means "no labels", not an error). Tokens are
/// not deduplicated: a repeated token counts twice when tallied.
pub fn parse_labels(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(", ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_basic() {
        assert_eq!(parse_labels("Bug, Feature"), vec!["bug", "feature"]);
    }

    #[test]
    fn test_parse_labels_trims_tokens() {
        assert_eq!(parse_labels(" bug ,  feature  "), vec!["bug", "feature"]);
    }

    #[test]
    fn test_parse_labels_bare_comma_does_not_split() {
        assert_eq!(parse_labels("bug,feature"), vec!["bug,feature"]);
    }

    #[test]
    fn test_parse_labels_empty_is_no_labels() {
        assert!(parse_labels("").is_empty());
        assert!(parse_labels("   ").is_empty());
        assert!(parse_labels(", ").is_empty());
    }

    #[test]
    fn test_parse_labels_keeps_duplicates() {
        assert_eq!(parse_labels("bug, bug"), vec!["bug", "bug"]);
    }

    #[test]
    fn test_parse_labels_lowercases() {
        assert_eq!(parse_labels("BUG, QuEsTiOn"), vec!["bug", "question"]);
    }
}
