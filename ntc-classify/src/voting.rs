//! Cluster voting: turns a set of valid nearest neighbours into a single winning
//! cluster index (spec.md §4.7's "Voting").
//!
//! Grounded on `original_source/src/classification.cpp`'s `determineBestieClusterIdx()`:
//! each valid neighbour casts a vote weighted by the inverse of its squared per-metric
//! distance, with torsion differences measured in *degrees* — the "degrees-in-voting
//! quirk" documented in `SPEC_FULL.md` §9, kept because it changes which cluster wins
//! ties at the margins and the spec's testable properties assume it.

use crate::calc::{to_degrees_f, to_radians_f};
use crate::context::constants;
use crate::nearest_neighbor::NearestNeighbor;

/// The outcome of voting: the winning cluster index and its accumulated score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoteResult {
    pub cluster_idx: usize,
    pub total_votes: f64,
}

fn neighbor_score(n: &NearestNeighbor) -> f64 {
    let d = n.differences;
    let torsions_deg = [
        to_degrees_f(d.delta_1),
        to_degrees_f(d.epsilon_1),
        to_degrees_f(d.zeta_1),
        to_degrees_f(d.alpha_2),
        to_degrees_f(d.beta_2),
        to_degrees_f(d.gamma_2),
        to_degrees_f(d.delta_2),
        to_degrees_f(d.chi_1),
        to_degrees_f(d.chi_2),
    ];
    let mut sq_sum: f64 = torsions_deg.iter().map(|t| t * t).sum();
    let d_mul = to_radians_f(constants::XR_DISTANCE_MULTIPLIER);
    sq_sum += (d.cc * d_mul).powi(2) + (d.nn * d_mul).powi(2);
    1.0 / sq_sum
}

/// Casts one vote per valid neighbour, weighted by [`neighbor_score`], accumulated by
/// `golden_step_idx`'s cluster; returns the winner, or `None` if `valid_neighbors` is
/// empty. Ties are broken by first-seen cluster index — the first valid neighbour's
/// cluster, scanning in ascending neighbour order, keeps the lead unless a later
/// cluster's total strictly exceeds it.
pub fn vote_for_cluster(
    valid_neighbors: &[NearestNeighbor],
    cluster_index_of_golden_step: impl Fn(usize) -> usize,
) -> Option<VoteResult> {
    let mut totals: Vec<(usize, f64)> = Vec::new();
    for n in valid_neighbors {
        let cluster_idx = cluster_index_of_golden_step(n.golden_step_idx);
        let score = neighbor_score(n);
        match totals.iter_mut().find(|(idx, _)| *idx == cluster_idx) {
            Some((_, total)) => *total += score,
            None => totals.push((cluster_idx, score)),
        }
    }

    totals
        .into_iter()
        .fold(None, |best: Option<VoteResult>, (cluster_idx, total_votes)| match best {
            Some(b) if b.total_votes >= total_votes => Some(b),
            _ => Some(VoteResult { cluster_idx, total_votes }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step_metrics::StepMetrics;

    fn zero_diffs() -> StepMetrics {
        StepMetrics {
            delta_1: 0.0, epsilon_1: 0.0, zeta_1: 0.0, alpha_2: 0.0, beta_2: 0.0, gamma_2: 0.0,
            delta_2: 0.0, chi_1: 0.0, chi_2: 0.0, cc: 0.0, nn: 0.0, mu: 0.0,
        }
    }

    #[test]
    fn no_neighbors_means_no_vote() {
        assert!(vote_for_cluster(&[], |i| i).is_none());
    }

    #[test]
    fn larger_accumulated_score_wins() {
        let mut small_diff = zero_diffs();
        small_diff.delta_1 = to_radians_f(1.0);
        let mut large_diff = zero_diffs();
        large_diff.delta_1 = to_radians_f(20.0);

        let neighbors = vec![
            NearestNeighbor { golden_step_idx: 0, differences: large_diff, euclidean_distance: 1.0 },
            NearestNeighbor { golden_step_idx: 1, differences: small_diff, euclidean_distance: 0.1 },
        ];
        // golden_step 0 -> cluster 0, golden_step 1 -> cluster 1
        let result = vote_for_cluster(&neighbors, |i| i).unwrap();
        assert_eq!(result.cluster_idx, 1);
    }

    #[test]
    fn ties_are_broken_by_first_seen() {
        let diff = zero_diffs();
        let neighbors = vec![
            NearestNeighbor { golden_step_idx: 0, differences: diff, euclidean_distance: 1.0 },
            NearestNeighbor { golden_step_idx: 1, differences: diff, euclidean_distance: 1.0 },
        ];
        // Both golden steps belong to cluster 0: identical scores accumulate into one entry.
        let result = vote_for_cluster(&neighbors, |_| 0).unwrap();
        assert_eq!(result.cluster_idx, 0);
    }
}
