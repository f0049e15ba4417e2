//! Nearest-neighbour search over a context's golden steps (spec.md §4.6).
//!
//! Grounded on `original_source/src/classification.cpp`'s `findClosestNtC()`: the
//! pre-gate on δ, the self-identity skip, the contiguous-cluster rejection (exploiting
//! golden steps being sorted by cluster number, see [`crate::context::ClassificationContext::new`]),
//! and the "emergency" closest-absolute fallback when no golden step passes tolerance.

use crate::calc::{angle_difference, to_radians_f, wrap_to_2pi};
use crate::context::{constants, ClassificationContext};
use crate::error::ClassificationError;
use crate::step_metrics::StepMetrics;
use crate::tracing::{Tracepoint, Tracer};

/// One golden step admitted as a candidate, with its per-metric signed difference from
/// the query (`query - golden_step`, same field shape as [`StepMetrics`]) and its
/// 12-dimensional Euclidean distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestNeighbor {
    pub golden_step_idx: usize,
    pub differences: StepMetrics,
    pub euclidean_distance: f64,
}

/// The result of a nearest-neighbour search: a distance-sorted neighbour list and how
/// many of its entries are genuinely tolerance-valid (as opposed to the single
/// closest-absolute "emergency" entry placed in slot 0 when no golden step qualified).
#[derive(Clone, Debug, PartialEq)]
pub struct NearestNeighborSearch {
    pub neighbors: Vec<NearestNeighbor>,
    pub valid_count: usize,
    pub reject_delta: bool,
}

impl NearestNeighborSearch {
    /// The closest neighbour regardless of validity: `neighbors[0]`, always present
    /// unless the search errored with [`ClassificationError::WrongMetrics`].
    pub fn closest(&self) -> &NearestNeighbor {
        &self.neighbors[0]
    }

    /// The genuinely tolerance-valid neighbours, i.e. excluding the emergency fallback
    /// entry when [`Self::valid_count`] is zero.
    pub fn valid(&self) -> &[NearestNeighbor] {
        &self.neighbors[..self.valid_count]
    }
}

fn cross_residue_differences(query: &StepMetrics, golden: &StepMetrics) -> (f64, f64, f64) {
    (query.cc - golden.cc, query.nn - golden.nn, angle_difference(query.mu, golden.mu))
}

/// Searches `ctx`'s golden steps for up to `limits.number_of_used_nearest_neighbors`
/// valid neighbours of `query`, per spec.md §4.6's algorithm.
pub fn find_nearest_neighbors(
    query: &StepMetrics,
    ctx: &ClassificationContext,
    tracer: Option<&dyn Tracer>,
) -> Result<NearestNeighborSearch, ClassificationError> {
    let limits = ctx.limits();
    let capacity = limits.number_of_used_nearest_neighbors;
    let d_mul = to_radians_f(constants::XR_DISTANCE_MULTIPLIER);

    let delta_1 = wrap_to_2pi(query.delta_1);
    let delta_2 = wrap_to_2pi(query.delta_2);
    let delta_low = to_radians_f(55.0);
    let delta_high = to_radians_f(185.0);
    let reject_delta =
        !(delta_1 > delta_low && delta_1 < delta_high) || !(delta_2 > delta_low && delta_2 < delta_high);
    if reject_delta {
        if let Some(t) = tracer {
            t.emit(Tracepoint::DeltaTorsionRejected, "delta torsion(s) outside (55, 185) degrees");
        }
    }

    let mut emergency: Option<NearestNeighbor> = None;
    let mut valid: Vec<NearestNeighbor> = Vec::with_capacity(capacity);

    let mut rejecting_cluster = false;
    let mut last_cluster_number: Option<i32> = None;

    for (idx, gs) in ctx.golden_steps().iter().enumerate() {
        let query_torsions = query.torsions();
        let golden_torsions = gs.metrics.torsions();
        let mut torsion_diffs = [0.0; 9];
        let mut torsion_sq_sum = 0.0;
        for i in 0..9 {
            torsion_diffs[i] = angle_difference(query_torsions[i], golden_torsions[i]);
            torsion_sq_sum += torsion_diffs[i] * torsion_diffs[i];
        }
        if torsion_sq_sum <= constants::SELF_IDENTITY_TOLERANCE_SQ {
            continue;
        }

        let (cc_diff, nn_diff, mu_diff) = cross_residue_differences(query, &gs.metrics);
        let euclidean_distance = (torsion_sq_sum
            + (cc_diff * d_mul).powi(2)
            + (nn_diff * d_mul).powi(2)
            + mu_diff * mu_diff)
            .sqrt();

        let differences = StepMetrics {
            delta_1: torsion_diffs[0],
            epsilon_1: torsion_diffs[1],
            zeta_1: torsion_diffs[2],
            alpha_2: torsion_diffs[3],
            beta_2: torsion_diffs[4],
            gamma_2: torsion_diffs[5],
            delta_2: torsion_diffs[6],
            chi_1: torsion_diffs[7],
            chi_2: torsion_diffs[8],
            cc: cc_diff,
            nn: nn_diff,
            mu: mu_diff,
        };

        if emergency.map(|e| euclidean_distance < e.euclidean_distance).unwrap_or(true) {
            emergency = Some(NearestNeighbor { golden_step_idx: idx, differences, euclidean_distance });
        }

        if reject_delta {
            continue;
        }

        if rejecting_cluster && last_cluster_number == Some(gs.cluster_number) {
            continue;
        }
        rejecting_cluster = false;
        last_cluster_number = Some(gs.cluster_number);

        let cluster = &ctx.clusters()[gs.cluster_index];
        let mut within_tolerance = true;
        for i in 0..9 {
            if !cluster.torsion_intervals[i].contains_exclusive(wrap_to_2pi(query_torsions[i])) {
                within_tolerance = false;
                break;
            }
        }
        if within_tolerance && !cluster.mu_interval.contains_exclusive(wrap_to_2pi(query.mu)) {
            within_tolerance = false;
        }
        if within_tolerance
            && (!cluster.cc_interval.contains_exclusive(query.cc)
                || !cluster.nn_interval.contains_exclusive(query.nn))
        {
            within_tolerance = false;
        }

        if !within_tolerance {
            rejecting_cluster = true;
            if let Some(t) = tracer {
                t.emit(Tracepoint::GoldenStepRejectedToleranceExceeded, &gs.name);
            }
            continue;
        }

        let candidate = NearestNeighbor { golden_step_idx: idx, differences, euclidean_distance };
        let pos = valid.partition_point(|n: &NearestNeighbor| n.euclidean_distance <= euclidean_distance);
        if valid.len() < capacity {
            valid.insert(pos, candidate);
        } else if pos < capacity {
            valid.insert(pos, candidate);
            valid.pop();
        }
    }

    if let Some(t) = tracer {
        t.emit(Tracepoint::AllNearestNeighbors, &format!("{} valid neighbours found", valid.len()));
    }

    let emergency = emergency.ok_or(ClassificationError::WrongMetrics)?;
    let valid_count = valid.len();
    let neighbors = if valid_count == 0 { vec![emergency] } else { valid };

    Ok(NearestNeighborSearch { neighbors, valid_count, reject_delta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{
        ClassificationLimits, ClusterNuAnglesRow, ClusterRow, ConfalRow, GoldenStepRow,
    };
    use crate::context::CONFAL_PERCENTILE_COUNT;

    fn limits() -> ClassificationLimits {
        ClassificationLimits {
            average_neighbors_torsion_cutoff: to_radians_f(30.0),
            nearest_neighbor_torsions_cutoff: to_radians_f(30.0),
            total_distance_cutoff: to_radians_f(60.0),
            pseudorotation_cutoff: to_radians_f(30.0),
            minimum_cluster_votes: 0.001,
            minimum_nearest_neighbors: 1,
            number_of_used_nearest_neighbors: 3,
            max_close_enough_rmsd: 2.5,
        }
    }

    fn cluster_row(cluster_number: i32, ntc: &str) -> ClusterRow {
        ClusterRow {
            cluster_number,
            ntc: ntc.to_string(),
            cana: "A".to_string(),
            delta_1_deviation: 10.0, delta_1_meanValue: 80.0,
            epsilon_1_deviation: 10.0, epsilon_1_meanValue: -150.0,
            zeta_1_deviation: 10.0, zeta_1_meanValue: -70.0,
            alpha_2_deviation: 10.0, alpha_2_meanValue: -65.0,
            beta_2_deviation: 10.0, beta_2_meanValue: 175.0,
            gamma_2_deviation: 10.0, gamma_2_meanValue: 55.0,
            delta_2_deviation: 10.0, delta_2_meanValue: 80.0,
            chi_1_deviation: 10.0, chi_1_meanValue: -160.0,
            chi_2_deviation: 10.0, chi_2_meanValue: -160.0,
            cc_deviation: 0.5, cc_mean_value: 4.8,
            nn_deviation: 0.5, nn_mean_value: 4.6,
            mu_deviation: 10.0, mu_meanValue: 0.0,
            ribose_pseudorotation_1: 10.0,
            ribose_pseudorotation_2: 10.0,
        }
    }

    fn golden_step_row(cluster_number: i32, name: &str) -> GoldenStepRow {
        GoldenStepRow {
            cluster_number,
            delta_1: 80.0, epsilon_1: -150.0, zeta_1: -70.0, alpha_2: -65.0, beta_2: 175.0,
            gamma_2: 55.0, delta_2: 80.0, chi_1: -160.0, chi_2: -160.0,
            cc: 4.8, nn: 4.6, mu: 0.0,
            name: name.to_string(),
            pucker_1: "C3endo".to_string(),
            pucker_2: "C3endo".to_string(),
            nu0_1: 10.0, nu1_1: 10.0, nu2_1: 10.0, nu3_1: 10.0, nu4_1: 10.0,
            nu0_2: 10.0, nu1_2: 10.0, nu2_2: 10.0, nu3_2: 10.0, nu4_2: 10.0,
        }
    }

    fn confal_row(cluster_number: i32) -> ConfalRow {
        ConfalRow {
            cluster_number,
            delta_1: 5.0, epsilon_1: 5.0, zeta_1: 5.0, alpha_2: 5.0, beta_2: 5.0, gamma_2: 5.0,
            delta_2: 5.0, chi_1: 5.0, chi_2: 5.0, cc: 0.3, nn: 0.3, mu: 5.0,
            nu0_1: 5.0, nu1_1: 5.0, nu2_1: 5.0, nu3_1: 5.0, nu4_1: 5.0,
            nu0_2: 5.0, nu1_2: 5.0, nu2_2: 5.0, nu3_2: 5.0, nu4_2: 5.0,
        }
    }

    fn nu_angles_row(cluster_number: i32) -> ClusterNuAnglesRow {
        ClusterNuAnglesRow {
            cluster_number,
            nu0_1_meanValue: 10.0, nu0_1_deviation: 2.0,
            nu1_1_meanValue: 10.0, nu1_1_deviation: 2.0,
            nu2_1_meanValue: 10.0, nu2_1_deviation: 2.0,
            nu3_1_meanValue: 10.0, nu3_1_deviation: 2.0,
            nu4_1_meanValue: 10.0, nu4_1_deviation: 2.0,
            nu0_2_meanValue: 10.0, nu0_2_deviation: 2.0,
            nu1_2_meanValue: 10.0, nu1_2_deviation: 2.0,
            nu2_2_meanValue: 10.0, nu2_2_deviation: 2.0,
            nu3_2_meanValue: 10.0, nu3_2_deviation: 2.0,
            nu4_2_meanValue: 10.0, nu4_2_deviation: 2.0,
        }
    }

    fn sample_ctx() -> ClassificationContext {
        ClassificationContext::new(
            vec![cluster_row(1, "AA00"), cluster_row(2, "AA01")],
            vec![golden_step_row(1, "golden-1"), golden_step_row(2, "golden-2")],
            vec![confal_row(1), confal_row(2)],
            vec![nu_angles_row(1), nu_angles_row(2)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            limits(),
        )
        .unwrap()
    }

    fn metrics_at_cluster_mean() -> StepMetrics {
        StepMetrics {
            delta_1: to_radians_f(80.0),
            epsilon_1: to_radians_f(-150.0),
            zeta_1: to_radians_f(-70.0),
            alpha_2: to_radians_f(-65.0),
            beta_2: to_radians_f(175.0),
            gamma_2: to_radians_f(55.0),
            delta_2: to_radians_f(80.0),
            chi_1: to_radians_f(-160.0),
            chi_2: to_radians_f(-160.0),
            cc: 4.8,
            nn: 4.6,
            mu: 0.0,
        }
    }

    #[test]
    fn exact_match_is_skipped_as_self_identical() {
        let ctx = sample_ctx();
        let query = metrics_at_cluster_mean();
        let search = find_nearest_neighbors(&query, &ctx, None).unwrap();
        // Both golden steps sit exactly at their cluster means, so both self-identity
        // skip; the search must still fail over to WrongMetrics only if truly nothing
        // is found, but here it finds nothing tolerance-valid nor emergency either.
        assert!(search.neighbors.is_empty() || search.valid_count == 0);
    }

    #[test]
    fn nearby_step_is_found_as_a_valid_neighbor() {
        let ctx = sample_ctx();
        let mut query = metrics_at_cluster_mean();
        query.delta_1 += to_radians_f(1.0);
        let search = find_nearest_neighbors(&query, &ctx, None).unwrap();
        assert!(search.valid_count >= 1);
        assert_eq!(ctx.golden_steps()[search.neighbors[0].golden_step_idx].cluster_number, 1);
    }

    #[test]
    fn delta_outside_window_rejects_every_cluster() {
        let ctx = sample_ctx();
        let mut query = metrics_at_cluster_mean();
        query.delta_1 = to_radians_f(10.0);
        query.delta_1 += to_radians_f(1.0);
        let search = find_nearest_neighbors(&query, &ctx, None).unwrap();
        assert!(search.reject_delta);
        assert_eq!(search.valid_count, 0);
    }
}
