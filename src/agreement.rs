//! Merging two raters' annotation streams into one agreement table.
//!
//! Each rater hands in an [`AnnotationSet`]: raw (item, label-list) pairs in
//! whatever order their export produced. The builder reconciles the two
//! streams into a [`ReconciledTable`] with one row per distinct item and one
//! count column per vocabulary label, the input the reliability coefficient
//! is computed from.
//!
//! # Merge rules
//!
//! - Item keys are trimmed of surrounding whitespace before keying, so
//!   `"Foo "` from one rater and `"Foo"` from the other land in the same row.
//! - Label lists are lower-cased and split on `", "`; a rater's repeated
//!   token counts twice.
//! - If a rater annotates the same item twice, their later record replaces
//!   the earlier one.
//! - Items annotated by only one rater stay in the table (with
//!   `rater_count == 1`) and are listed in the diagnostics.
//!
//! # Example
//!
//! ```rust
//! use irr::{AgreementTableBuilder, Annotation, AnnotationSet, LabelVocabulary, MergeConfig};
//!
//! let vocabulary = LabelVocabulary::parse("a, b, c");
//! let rater1 = AnnotationSet::new(vec![
//!     Annotation::new("x", "a, b"),
//!     Annotation::new("y", "c"),
//! ]);
//! let rater2 = AnnotationSet::new(vec![Annotation::new("x", "a, b")]);
//!
//! let builder = AgreementTableBuilder::new(MergeConfig::default());
//! let table = builder.build(&rater1, &rater2, &vocabulary)?;
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.rows[0].label_counts, [2, 2, 0]); // both raters: a, b
//! assert_eq!(table.rows[1].label_counts, [0, 0, 1]); // rater 1 only: c
//! # Ok::<(), irr::Error>(())
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::annotation::{parse_labels, AnnotationSet};
use crate::vocabulary::LabelVocabulary;
use crate::{Error, Result};

// =============================================================================
// Configuration
// =============================================================================

/// What to do with a label token that is not in the vocabulary.
///
/// One policy applies to the whole merge; reject and ignore are never mixed
/// within a single build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLabelPolicy {
    /// Fail the merge with [`Error::UnknownLabel`].
    #[default]
    Reject,
    /// Drop the token (with a warning) and keep counting.
    Ignore,
}

/// Structural naming for the merge output.
///
/// The column identifiers carry no semantics; they name the item column in
/// exported tables and the two rater slots in diagnostic output. Defaults
/// match the conventional `data` / `label_1` / `label_2` export headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Name of the item column in exported tables.
    pub item_column: String,
    /// Identifier for rater 1's slot in diagnostics.
    pub rater1_column: String,
    /// Identifier for rater 2's slot in diagnostics.
    pub rater2_column: String,
    /// Policy for labels missing from the vocabulary.
    pub unknown_labels: UnknownLabelPolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            item_column: "data".to_string(),
            rater1_column: "label_1".to_string(),
            rater2_column: "label_2".to_string(),
            unknown_labels: UnknownLabelPolicy::default(),
        }
    }
}

// =============================================================================
// Reconciled table
// =============================================================================

/// Per-label rating counts for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledRow {
    /// Canonical item key (whitespace-trimmed).
    pub item: String,
    /// Count of raters who assigned each label, aligned with vocabulary order.
    ///
    /// Under two raters each count is 0, 1 or 2, except that a rater's
    /// repeated token inflates its label past the rater count.
    pub label_counts: Vec<u32>,
    /// Raters (0-2) whose label list for this item was non-empty.
    pub rater_count: u32,
}

impl ReconciledRow {
    /// Total label assignments on this item, across both raters.
    pub fn total_ratings(&self) -> u32 {
        self.label_counts.iter().sum()
    }

    /// Count for a single label, if it is in the vocabulary.
    pub fn count(&self, vocabulary: &LabelVocabulary, label: &str) -> Option<u32> {
        vocabulary.index_of(label).map(|k| self.label_counts[k])
    }
}

/// One item on which the two raters' label sets differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disagreement {
    /// Canonical item key.
    pub item: String,
    /// Rater 1's parsed labels, in annotation order.
    pub rater1_labels: Vec<String>,
    /// Rater 2's parsed labels, in annotation order.
    pub rater2_labels: Vec<String>,
}

/// Informational findings from a merge. Never affects the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeDiagnostics {
    /// Items annotated by exactly one of the two raters.
    pub single_rater_items: Vec<String>,
    /// Items where the raters' label sets differ (order-independent).
    pub disagreements: Vec<Disagreement>,
}

impl MergeDiagnostics {
    /// Number of items only one rater covered.
    pub fn single_rater_count(&self) -> usize {
        self.single_rater_items.len()
    }
}

/// The reconciled per-item, per-label count table.
///
/// Built once per rater pair and immutable afterwards. Rows appear in the
/// order items were first encountered across the two input streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledTable {
    /// One row per distinct item.
    pub rows: Vec<ReconciledRow>,
    /// Informational merge findings, reported alongside the table.
    pub diagnostics: MergeDiagnostics,
}

impl ReconciledTable {
    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no items were annotated by either rater.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Per-item label slots for the two raters, before counting.
#[derive(Debug, Default)]
struct RaterSlots {
    rater1: Vec<String>,
    rater2: Vec<String>,
}

/// Merges two raters' annotation sets against a fixed vocabulary.
#[derive(Debug, Clone, Default)]
pub struct AgreementTableBuilder {
    config: MergeConfig,
}

impl AgreementTableBuilder {
    /// Create a builder with the given merge configuration.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// The builder's configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge the two annotation sets into a reconciled table.
    ///
    /// Pure over its inputs apart from log output. With
    /// [`UnknownLabelPolicy::Reject`] the first out-of-vocabulary token fails
    /// the whole merge; with `Ignore` such tokens are dropped.
    pub fn build(
        &self,
        rater1: &AnnotationSet,
        rater2: &AnnotationSet,
        vocabulary: &LabelVocabulary,
    ) -> Result<ReconciledTable> {
        // Phase 1: key both streams by canonical item. A rater re-annotating
        // an item overwrites only their own slot.
        let mut order: Vec<String> = Vec::new();
        let mut slots: HashMap<String, RaterSlots> = HashMap::new();

        for annotation in &rater1.rows {
            let item = annotation.item.trim();
            let entry = slots.entry(item.to_string()).or_insert_with(|| {
                order.push(item.to_string());
                RaterSlots::default()
            });
            entry.rater1 = parse_labels(&annotation.labels);
        }
        for annotation in &rater2.rows {
            let item = annotation.item.trim();
            let entry = slots.entry(item.to_string()).or_insert_with(|| {
                order.push(item.to_string());
                RaterSlots::default()
            });
            entry.rater2 = parse_labels(&annotation.labels);
        }

        // Phase 2: tally counts per row and collect diagnostics.
        let mut rows = Vec::with_capacity(order.len());
        let mut diagnostics = MergeDiagnostics::default();

        for item in &order {
            let slot = &slots[item];
            let rater_count = u32::from(!slot.rater1.is_empty()) + u32::from(!slot.rater2.is_empty());

            let mut label_counts = vec![0u32; vocabulary.len()];
            for token in slot.rater1.iter().chain(slot.rater2.iter()) {
                match vocabulary.index_of(token) {
                    Some(k) => label_counts[k] += 1,
                    None => match self.config.unknown_labels {
                        UnknownLabelPolicy::Reject => {
                            return Err(Error::unknown_label(token, item));
                        }
                        UnknownLabelPolicy::Ignore => {
                            log::warn!("ignoring unknown label `{token}` for item `{item}`");
                        }
                    },
                }
            }

            if rater_count == 1 {
                log::debug!("item `{item}` was annotated by a single rater");
                diagnostics.single_rater_items.push(item.clone());
            }
            if rater_count == 2 && !same_label_set(&slot.rater1, &slot.rater2) {
                diagnostics.disagreements.push(Disagreement {
                    item: item.clone(),
                    rater1_labels: slot.rater1.clone(),
                    rater2_labels: slot.rater2.clone(),
                });
            }

            rows.push(ReconciledRow {
                item: item.clone(),
                label_counts,
                rater_count,
            });
        }

        log::info!(
            "merged {} items ({} single-rater, {} disagreements)",
            rows.len(),
            diagnostics.single_rater_count(),
            diagnostics.disagreements.len()
        );

        Ok(ReconciledTable { rows, diagnostics })
    }
}

/// Order-independent label-set equality.
fn same_label_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}
