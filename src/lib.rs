//! # irr
//!
//! Inter-rater reliability for multi-label annotation.
//!
//! Two people independently label the same collection of items (comments,
//! documents, tickets) with zero or more categories from a fixed vocabulary.
//! How consistently did they label? `irr` answers with a multi-label
//! extension of Krippendorff's alpha: a single chance-corrected score where
//! 1 is perfect agreement, 0 is chance level, and negative values mean
//! systematic disagreement.
//!
//! The pipeline is two pure steps: the two annotation streams are reconciled
//! into a per-item, per-label count table, and the table is reduced to the
//! coefficient.
//!
//! ```text
//! raw annotations -> reconciled table -> alpha
//! ```
//!
//! # Example
//!
//! ```rust
//! use irr::{Annotation, AnnotationSet, LabelVocabulary, MergeConfig};
//!
//! let vocabulary = LabelVocabulary::parse("bug, feature, question");
//! let rater1 = AnnotationSet::new(vec![
//!     Annotation::new("comment-1", "bug"),
//!     Annotation::new("comment-2", "bug, feature"),
//! ]);
//! let rater2 = AnnotationSet::new(vec![
//!     Annotation::new("comment-1", "bug"),
//!     Annotation::new("comment-2", "feature"),
//! ]);
//!
//! let alpha = irr::compute_reliability(&rater1, &rater2, &vocabulary, &MergeConfig::default())?;
//! assert!(alpha > 0.0 && alpha <= 1.0);
//! # Ok::<(), irr::Error>(())
//! ```
//!
//! # Reading annotations from disk
//!
//! Rater exports usually live as CSV trees; [`ingest::extract_rater_data`]
//! reads one directory per rater:
//!
//! ```rust,ignore
//! use irr::ingest::{extract_rater_data, RaterFileConfig};
//! use irr::{LabelVocabulary, MergeConfig};
//!
//! let rater1 = extract_rater_data("data/rater1".as_ref(), &RaterFileConfig::default())?;
//! let rater2 = extract_rater_data("data/rater2".as_ref(), &RaterFileConfig::new("Data", "Code"))?;
//! let vocabulary = LabelVocabulary::from_file("data/labels.txt")?;
//!
//! let alpha = irr::compute_reliability(&rater1, &rater2, &vocabulary, &MergeConfig::default())?;
//! ```
//!
//! # Diagnostics
//!
//! The reconciled table carries informational findings alongside the counts:
//! items only one rater covered, and items where the two label sets differ.
//! They never change the computed coefficient.

pub mod agreement;
pub mod annotation;
pub mod error;
pub mod ingest;
pub mod reliability;
pub mod vocabulary;

pub use agreement::{
    AgreementTableBuilder, Disagreement, MergeConfig, MergeDiagnostics, ReconciledRow,
    ReconciledTable, UnknownLabelPolicy,
};
pub use annotation::{parse_labels, Annotation, AnnotationSet};
pub use error::{Error, Result};
pub use reliability::{
    alpha_interpretation, NominalWeighting, ReliabilityCalculator, ReliabilityReport, Weighting,
};
pub use vocabulary::LabelVocabulary;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use irr::prelude::*;
    //!
    //! let vocabulary = LabelVocabulary::parse("a, b");
    //! let rater = AnnotationSet::new(vec![Annotation::new("x", "a")]);
    //! ```
    pub use crate::agreement::{
        AgreementTableBuilder, MergeConfig, ReconciledTable, UnknownLabelPolicy,
    };
    pub use crate::annotation::{Annotation, AnnotationSet};
    pub use crate::error::{Error, Result};
    pub use crate::ingest::{extract_rater_data, RaterFileConfig};
    pub use crate::reliability::{alpha_interpretation, ReliabilityCalculator, ReliabilityReport};
    pub use crate::vocabulary::LabelVocabulary;
}

/// Merge two raters' annotation sets into a reconciled table.
///
/// Convenience wrapper around [`AgreementTableBuilder::build`].
pub fn build_reconciled_table(
    rater1: &AnnotationSet,
    rater2: &AnnotationSet,
    vocabulary: &LabelVocabulary,
    config: &MergeConfig,
) -> Result<ReconciledTable> {
    AgreementTableBuilder::new(config.clone()).build(rater1, rater2, vocabulary)
}

/// Compute alpha over an existing reconciled table with nominal weighting.
pub fn compute_alpha(table: &ReconciledTable, vocabulary: &LabelVocabulary) -> Result<f64> {
    ReliabilityCalculator::nominal().alpha(table, vocabulary)
}

/// Chain merge and coefficient: annotations in, alpha out.
pub fn compute_reliability(
    rater1: &AnnotationSet,
    rater2: &AnnotationSet,
    vocabulary: &LabelVocabulary,
    config: &MergeConfig,
) -> Result<f64> {
    let table = build_reconciled_table(rater1, rater2, vocabulary, config)?;
    compute_alpha(&table, vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_reliability_chains_both_steps() {
        let vocabulary = LabelVocabulary::parse("a, b");
        let rater1 = AnnotationSet::new(vec![
            Annotation::new("x", "a"),
            Annotation::new("y", "b"),
        ]);
        let rater2 = rater1.clone();

        let alpha =
            compute_reliability(&rater1, &rater2, &vocabulary, &MergeConfig::default()).unwrap();
        assert!((alpha - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_alpha_matches_chained_result() {
        let vocabulary = LabelVocabulary::parse("a, b");
        let rater1 = AnnotationSet::new(vec![
            Annotation::new("x", "a, b"),
            Annotation::new("y", "a"),
        ]);
        let rater2 = AnnotationSet::new(vec![
            Annotation::new("x", "a"),
            Annotation::new("y", "b"),
        ]);
        let config = MergeConfig::default();

        let table = build_reconciled_table(&rater1, &rater2, &vocabulary, &config).unwrap();
        let direct = compute_alpha(&table, &vocabulary).unwrap();
        let chained = compute_reliability(&rater1, &rater2, &vocabulary, &config).unwrap();
        assert_eq!(direct, chained);
    }
}
