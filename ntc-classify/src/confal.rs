//! Confal scoring: how confidently a classified step belongs to its assigned cluster
//! (spec.md §4.8).
//!
//! Grounded on `original_source/src/classification.cpp`'s `calcConfalScore()`: twelve
//! per-metric Gaussian scores combined by harmonic mean, rounded by `+ 0.5` truncation
//! and zeroed outright when the step carries any [`crate::Violations`].

use crate::context::Confal;
use crate::nomenclature::NtC;
use crate::step_metrics::StepMetrics;
use crate::violations::Violations;
use crate::ClassificationContext;

/// The twelve per-metric confal scores plus their combined total (spec.md §4.8).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfalScore {
    pub per_metric: [f64; 12],
    pub total: f64,
}

/// Scores `differences` (signed, per-metric deviations of a step from its assigned
/// cluster's means, in [`StepMetrics::torsions`] + `[CC, NN, mu]` order) against
/// `confal`'s Gaussian widths.
///
/// Torsion and μ differences must be in *degrees*; CC/NN differences in Å, matching the
/// units `confal`'s own σ columns are expressed in.
pub fn confal_score(differences: &StepMetrics, confal: &Confal, violations: Violations) -> ConfalScore {
    let diffs = [
        differences.delta_1, differences.epsilon_1, differences.zeta_1, differences.alpha_2,
        differences.beta_2, differences.gamma_2, differences.delta_2, differences.chi_1,
        differences.chi_2, differences.cc, differences.nn, differences.mu,
    ];
    let widths = confal.widths();

    let mut per_metric = [0.0; 12];
    let mut inv_total = 0.0;
    for i in 0..12 {
        let sigma = widths[i];
        let score = 100.0 * (-(diffs[i] * diffs[i]) / (2.0 * sigma * sigma)).exp();
        per_metric[i] = score;
        inv_total += 1.0 / score;
    }

    let harmonic_mean = 12.0 / inv_total;
    let total = if violations.is_ok() { (harmonic_mean + 0.5).trunc() } else { 0.0 };

    ConfalScore { per_metric, total }
}

/// Arithmetic mean of a non-empty slice of confal totals; `0.0` if empty (spec.md §4.8).
pub fn average_confal_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// `{score, percentile}` summary over a batch of classified steps (spec.md §4.10's
/// `average_confal`/`average_confal_attempted`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfalStatistics {
    pub score: f64,
    pub percentile: i32,
}

/// Looks up a confal score's percentile rank, or `-1` if `score` is outside `[0, 100]`
/// (spec.md §4.10's `confal_percentile`). The context's own
/// [`ClassificationContext::confal_percentile`] only ever indexes its percentile table
/// and has no notion of "out of range"; this free function adds the public boundary
/// behaviour on top of it.
pub fn confal_percentile(score: f64, ctx: &ClassificationContext) -> i32 {
    if !(0.0..=100.0).contains(&score) {
        return -1;
    }
    ctx.confal_percentile(score) as i32
}

/// Looks up the confal row for `ntc`'s cluster (spec.md §4.10's `confal_for_ntc`),
/// returning [`crate::error::ClassificationError::InvalidArgument`] if no cluster is
/// assigned to that NtC class.
pub fn confal_for_ntc<'a>(
    ntc: NtC,
    ctx: &'a ClassificationContext,
) -> Result<&'a Confal, crate::error::ClassificationError> {
    ctx.confal_for_ntc(ntc).ok_or(crate::error::ClassificationError::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_confal() -> Confal {
        Confal {
            cluster_number: 1,
            delta_1: 5.0, epsilon_1: 5.0, zeta_1: 5.0, alpha_2: 5.0, beta_2: 5.0, gamma_2: 5.0,
            delta_2: 5.0, chi_1: 5.0, chi_2: 5.0, cc: 0.3, nn: 0.3, mu: 5.0,
            nu_1: [0.0; 5],
            nu_2: [0.0; 5],
        }
    }

    fn zero_diffs() -> StepMetrics {
        StepMetrics {
            delta_1: 0.0, epsilon_1: 0.0, zeta_1: 0.0, alpha_2: 0.0, beta_2: 0.0, gamma_2: 0.0,
            delta_2: 0.0, chi_1: 0.0, chi_2: 0.0, cc: 0.0, nn: 0.0, mu: 0.0,
        }
    }

    #[test]
    fn zero_differences_score_perfectly() {
        let score = confal_score(&zero_diffs(), &flat_confal(), Violations::empty());
        for s in score.per_metric {
            assert!((s - 100.0).abs() < 1e-9);
        }
        assert!((score.total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn violations_zero_the_total() {
        let score = confal_score(&zero_diffs(), &flat_confal(), Violations::CC_TOO_LOW);
        assert_eq!(score.total, 0.0);
    }

    #[test]
    fn average_confal_is_zero_for_an_empty_batch() {
        assert_eq!(average_confal_score(&[]), 0.0);
    }

    #[test]
    fn average_confal_is_the_arithmetic_mean() {
        assert!((average_confal_score(&[50.0, 100.0]) - 75.0).abs() < 1e-9);
    }
}
