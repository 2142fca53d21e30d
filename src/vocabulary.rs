//! Label vocabulary: the fixed set of categories raters may assign.
//!
//! The vocabulary defines the columns of the reconciled agreement table. It
//! is loaded once (typically from a comma-separated `labels.txt`) and never
//! changes during a computation.

use std::collections::HashMap;
use std::path::Path;

use crate::{Error, Result};

/// An ordered set of unique, lower-cased, trimmed label names.
#[derive(Debug, Clone, Default)]
pub struct LabelVocabulary {
    labels: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl LabelVocabulary {
    /// Build a vocabulary from label names.
    ///
    /// Names are trimmed and lower-cased; empties are dropped; duplicates
    /// keep their first position.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for label in labels {
            let label = label.as_ref().trim().to_lowercase();
            if label.is_empty() || out.by_name.contains_key(&label) {
                continue;
            }
            out.by_name.insert(label.clone(), out.labels.len());
            out.labels.push(label);
        }
        out
    }

    /// Parse a comma-separated label list, e.g. the contents of `labels.txt`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Read and parse a comma-separated label file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let vocabulary = Self::parse(&raw);
        if vocabulary.is_empty() {
            return Err(Error::invalid_input(format!(
                "no labels found in {}",
                path.display()
            )));
        }
        log::debug!("loaded {} labels from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// Position of `label` in the vocabulary, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.by_name.get(label).copied()
    }

    /// Whether `label` is a known category.
    pub fn contains(&self, label: &str) -> bool {
        self.by_name.contains_key(label)
    }

    /// The labels, in vocabulary order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the vocabulary has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over the labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_normalizes() {
        let vocab = LabelVocabulary::parse("Bug, FEATURE , question");
        assert_eq!(vocab.labels(), ["bug", "feature", "question"]);
    }

    #[test]
    fn test_parse_dedups_keeping_first_position() {
        let vocab = LabelVocabulary::parse("bug, feature, BUG");
        assert_eq!(vocab.labels(), ["bug", "feature"]);
        assert_eq!(vocab.index_of("bug"), Some(0));
    }

    #[test]
    fn test_parse_drops_empties() {
        let vocab = LabelVocabulary::parse("bug,, ,feature,");
        assert_eq!(vocab.labels(), ["bug", "feature"]);
    }

    #[test]
    fn test_lookup() {
        let vocab = LabelVocabulary::parse("a, b, c");
        assert_eq!(vocab.index_of("b"), Some(1));
        assert_eq!(vocab.index_of("d"), None);
        assert!(vocab.contains("c"));
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Bug, Feature,\nquestion").unwrap();
        let vocab = LabelVocabulary::from_file(file.path()).unwrap();
        assert_eq!(vocab.labels(), ["bug", "feature", "question"]);
    }

    #[test]
    fn test_from_file_empty_is_invalid() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(LabelVocabulary::from_file(file.path()).is_err());
    }
}
