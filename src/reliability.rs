//! Krippendorff's alpha over a reconciled agreement table.
//!
//! Reduces a [`ReconciledTable`] to a single chance-corrected reliability
//! coefficient:
//!
//! ```text
//! alpha = (p_a - p_e) / (1 - p_e)
//! ```
//!
//! where `p_a` is the observed agreement probability and `p_e` the agreement
//! expected by chance from the per-label marginals. 1 is perfect agreement,
//! 0 is chance level, negative values mean systematic disagreement.
//!
//! The multi-label extension works on rating counts rather than one rating
//! per item: a rater's whole label set contributes to their item's row, so an
//! item can carry more ratings than raters.
//!
//! Only nominal weighting is built in (any label mismatch is full
//! disagreement). The [`Weighting`] trait isolates the two places an
//! ordinal or interval scheme would differ, so a weighted generalization can
//! replace just that term.

use serde::{Deserialize, Serialize};

use crate::agreement::ReconciledTable;
use crate::vocabulary::LabelVocabulary;
use crate::{Error, Result};

// =============================================================================
// Weighting seam
// =============================================================================

/// Disagreement weighting between label categories.
///
/// The general weighted formulation distinguishes an item-level expected
/// count from the observed count and weights the expected-agreement term by
/// inter-category distance. The nominal scheme collapses both; other schemes
/// would implement this trait differently.
pub trait Weighting {
    /// Weight-adjusted count for one label on one item, given the observed
    /// count `r_ik`.
    fn adjusted_count(&self, r_ik: f64) -> f64;

    /// Expected-agreement probability from the per-label marginal
    /// proportions.
    fn expected_agreement(&self, marginals: &[f64]) -> f64;
}

/// Nominal weighting: mismatched labels are full disagreement, matched
/// labels full agreement.
///
/// The adjusted count collapses to the observed count, and expected
/// agreement reduces to the sum of squared marginal proportions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NominalWeighting;

impl Weighting for NominalWeighting {
    fn adjusted_count(&self, r_ik: f64) -> f64 {
        r_ik
    }

    fn expected_agreement(&self, marginals: &[f64]) -> f64 {
        marginals.iter().map(|pi_k| pi_k * pi_k).sum()
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// The coefficient plus the aggregate statistics it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    /// Distinct items in the table.
    pub n_items: usize,
    /// Mean number of raters per item (`r_bar`).
    pub mean_raters_per_item: f64,
    /// Total label assignments across all items and raters.
    pub total_ratings: u64,
    /// Observed agreement probability (`p_a`).
    pub observed_agreement: f64,
    /// Expected-by-chance agreement probability (`p_e`).
    pub expected_agreement: f64,
    /// The reliability coefficient.
    pub alpha: f64,
}

/// Computes the reliability coefficient from a reconciled table.
///
/// Stateless: every call computes from scratch and returns the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReliabilityCalculator<W = NominalWeighting> {
    weighting: W,
}

impl ReliabilityCalculator<NominalWeighting> {
    /// Calculator with the built-in nominal weighting.
    pub fn nominal() -> Self {
        Self::default()
    }
}

impl<W: Weighting> ReliabilityCalculator<W> {
    /// Calculator with a custom weighting scheme.
    pub fn with_weighting(weighting: W) -> Self {
        Self { weighting }
    }

    /// Compute the coefficient alone.
    pub fn alpha(&self, table: &ReconciledTable, vocabulary: &LabelVocabulary) -> Result<f64> {
        self.report(table, vocabulary).map(|report| report.alpha)
    }

    /// Compute the coefficient together with its intermediate statistics.
    ///
    /// Fails with [`Error::DegenerateInput`] when any of the divisions is
    /// undefined: an empty table, zero raters, zero ratings, or a single
    /// label absorbing every rating (`p_e == 1`).
    pub fn report(
        &self,
        table: &ReconciledTable,
        vocabulary: &LabelVocabulary,
    ) -> Result<ReliabilityReport> {
        let n = table.len();
        if n == 0 {
            return Err(Error::degenerate("no items to compare (n = 0)"));
        }
        if let Some(row) = table
            .rows
            .iter()
            .find(|row| row.label_counts.len() != vocabulary.len())
        {
            return Err(Error::invalid_input(format!(
                "row `{}` has {} label columns but the vocabulary has {}",
                row.item,
                row.label_counts.len(),
                vocabulary.len()
            )));
        }
        let n_f = n as f64;

        let r_bar = table
            .rows
            .iter()
            .map(|row| f64::from(row.rater_count))
            .sum::<f64>()
            / n_f;
        if r_bar <= 0.0 {
            return Err(Error::degenerate(
                "no rater annotated any item (mean raters per item = 0)",
            ));
        }

        // Observed agreement: each row's per-label contribution is
        // r_ik * (rbar_ik - 1) / (r_bar * (r_i - 1)). A row with at most one
        // rating has a zero numerator for every label it could carry, so it
        // contributes zero; it still counts toward n, r_bar and the marginals.
        let mut p_primea = 0.0;
        let mut total_ratings = 0u64;
        for row in &table.rows {
            let r_i = f64::from(row.total_ratings());
            total_ratings += u64::from(row.total_ratings());
            if r_i <= 1.0 {
                continue;
            }
            for &count in &row.label_counts {
                let r_ik = f64::from(count);
                let rbar_ik = self.weighting.adjusted_count(r_ik);
                p_primea += r_ik * (rbar_ik - 1.0) / (r_bar * (r_i - 1.0));
            }
        }
        p_primea /= n_f;
        let p_a = p_primea * (1.0 - 1.0 / (n_f * r_bar)) + 1.0 / (n_f * r_bar);

        // Expected agreement from the per-label marginal proportions.
        if total_ratings == 0 {
            return Err(Error::degenerate("no labels were assigned (total ratings = 0)"));
        }
        let mut marginals = vec![0.0f64; vocabulary.len()];
        for row in &table.rows {
            for (k, &count) in row.label_counts.iter().enumerate() {
                marginals[k] += f64::from(count);
            }
        }
        for pi_k in &mut marginals {
            *pi_k /= total_ratings as f64;
        }
        let p_e = self.weighting.expected_agreement(&marginals);
        if (1.0 - p_e).abs() < 1e-12 {
            return Err(Error::degenerate(
                "expected agreement is 1 (a single label absorbs every rating)",
            ));
        }

        let alpha = (p_a - p_e) / (1.0 - p_e);
        log::debug!(
            "n = {n}, r_bar = {r_bar:.4}, p_a = {p_a:.4}, p_e = {p_e:.4}, alpha = {alpha:.4}"
        );

        Ok(ReliabilityReport {
            n_items: n,
            mean_raters_per_item: r_bar,
            total_ratings,
            observed_agreement: p_a,
            expected_agreement: p_e,
            alpha,
        })
    }
}

// =============================================================================
// Interpretation
// =============================================================================

/// Interpret an alpha value against Krippendorff's conventional cutoffs.
pub fn alpha_interpretation(alpha: f64) -> &'static str {
    if alpha < 0.0 {
        "Systematic disagreement"
    } else if alpha < 0.667 {
        "Unreliable"
    } else if alpha < 0.8 {
        "Tentative reliability"
    } else {
        "Acceptable reliability"
    }
}
