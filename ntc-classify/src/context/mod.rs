//! Construction and querying of the classification context: the in-memory reference
//! library a step is classified against (spec.md §4.5).
//!
//! Grounded on `original_source/src/classification.cpp`'s
//! `LLKA_initializeClassificationContext()`, whose exact validation and derivation
//! order this module's [`ClassificationContext::new`] reproduces, generalised from that
//! function's four parallel C arrays into the arena + `HashMap<i32, usize>` pattern
//! (`cluster_index`) the teacher's own code never needed but whose shape mirrors how
//! `bioshell-pdb`'s `Deposit` resolves entity/chain cross-references once at load time.

mod tables;
mod types;

pub use tables::constants;
pub use tables::{ClusterNuAnglesRow, ClusterRow, ConfalRow, GoldenStepRow};
pub use types::{
    ClassificationLimits, Cluster, ClusterNuAngles, Confal, ClassificationMetric, GoldenStep,
    ToleranceInterval, TorsionIntervals,
};

use std::collections::HashMap;

use crate::error::ClassificationError;
use crate::nomenclature::{Cana, NtC};

/// The number of rows the confal-percentile table must have (spec.md §6): one entry
/// per integer percentile from 0 to 100, inclusive.
pub const CONFAL_PERCENTILE_COUNT: usize = 101;

/// The fully validated, queryable reference library a step is classified against.
#[derive(Debug)]
pub struct ClassificationContext {
    clusters: Vec<Cluster>,
    cluster_index: HashMap<i32, usize>,
    golden_steps: Vec<GoldenStep>,
    confals: Vec<Confal>,
    cluster_nu_angles: Vec<ClusterNuAngles>,
    confal_percentiles: [f64; CONFAL_PERCENTILE_COUNT],
    limits: ClassificationLimits,
}

impl ClassificationContext {
    /// Builds and validates a [`ClassificationContext`] from the five raw reference
    /// tables, in the original's exact validation/derivation order:
    ///
    /// 1. every table is non-empty, and `limits.max_close_enough_rmsd > 0`
    /// 2. clusters, confals and cluster-nu-angles all have the same length
    /// 3. the confal-percentile table has exactly [`CONFAL_PERCENTILE_COUNT`] rows
    /// 4. clusters are validated and indexed, rejecting duplicate cluster numbers
    /// 5. golden steps are validated against that index, then sorted by ascending
    ///    cluster number (enabling the nearest-neighbour search's contiguous-cluster
    ///    rejection optimisation, spec.md §4.6)
    /// 6. confals and cluster-nu-angles are validated against the same index
    /// 7. `limits` are range-checked
    pub fn new(
        clusters: Vec<ClusterRow>,
        golden_steps: Vec<GoldenStepRow>,
        confals: Vec<ConfalRow>,
        cluster_nu_angles: Vec<ClusterNuAnglesRow>,
        confal_percentiles: Vec<f64>,
        limits: ClassificationLimits,
    ) -> Result<ClassificationContext, ClassificationError> {
        if clusters.is_empty()
            || golden_steps.is_empty()
            || confals.is_empty()
            || cluster_nu_angles.is_empty()
        {
            return Err(ClassificationError::InvalidArgument);
        }
        if limits.max_close_enough_rmsd <= 0.0 {
            return Err(ClassificationError::InvalidArgument);
        }
        if clusters.len() != confals.len() || clusters.len() != cluster_nu_angles.len() {
            return Err(ClassificationError::MismatchingSizes);
        }
        if confal_percentiles.len() != CONFAL_PERCENTILE_COUNT {
            return Err(ClassificationError::BadData);
        }
        validate_limits(&limits)?;

        let mut cluster_index = HashMap::with_capacity(clusters.len());
        let mut built_clusters = Vec::with_capacity(clusters.len());
        for row in clusters {
            let number = row.cluster_number;
            let cluster = row.into_cluster()?;
            if cluster_index.insert(number, built_clusters.len()).is_some() {
                return Err(ClassificationError::BadClassificationClusters);
            }
            built_clusters.push(cluster);
        }

        let mut built_golden_steps = Vec::with_capacity(golden_steps.len());
        for row in golden_steps {
            let idx = *cluster_index.get(&row.cluster_number).ok_or(ClassificationError::BadGoldenSteps)?;
            built_golden_steps.push(row.into_golden_step(idx)?);
        }
        built_golden_steps.sort_by_key(|gs| gs.cluster_number);

        let mut built_confals = vec![None; built_clusters.len()];
        for row in confals {
            let idx = *cluster_index.get(&row.cluster_number).ok_or(ClassificationError::BadConfals)?;
            built_confals[idx] = Some(row.into_confal());
        }
        let built_confals: Vec<Confal> =
            built_confals.into_iter().collect::<Option<Vec<_>>>().ok_or(ClassificationError::BadConfals)?;

        let mut built_nu_angles = vec![None; built_clusters.len()];
        for row in cluster_nu_angles {
            let idx =
                *cluster_index.get(&row.cluster_number).ok_or(ClassificationError::BadAverageNuAngles)?;
            built_nu_angles[idx] = Some(row.into_cluster_nu_angles()?);
        }
        let built_nu_angles: Vec<ClusterNuAngles> = built_nu_angles
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(ClassificationError::BadAverageNuAngles)?;

        // `built_nu_angles` is indexed by the same `cluster_index` positions as
        // `built_clusters`, so the two line up 1:1; resolve each cluster's ν-angle
        // means onto it (classification.cpp:733-739 reads them off the winning
        // cluster, not the closest golden step).
        for (cluster, nu_angles) in built_clusters.iter_mut().zip(built_nu_angles.iter()) {
            cluster.nus_first = nu_angles.nu_1;
            cluster.nus_second = nu_angles.nu_2;
        }

        let mut percentiles = [0.0; CONFAL_PERCENTILE_COUNT];
        percentiles.copy_from_slice(&confal_percentiles);

        Ok(ClassificationContext {
            clusters: built_clusters,
            cluster_index,
            golden_steps: built_golden_steps,
            confals: built_confals,
            cluster_nu_angles: built_nu_angles,
            confal_percentiles: percentiles,
            limits,
        })
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn golden_steps(&self) -> &[GoldenStep] {
        &self.golden_steps
    }

    pub fn confals(&self) -> &[Confal] {
        &self.confals
    }

    pub fn cluster_nu_angles(&self) -> &[ClusterNuAngles] {
        &self.cluster_nu_angles
    }

    pub fn limits(&self) -> &ClassificationLimits {
        &self.limits
    }

    pub fn cluster_index_of(&self, cluster_number: i32) -> Option<usize> {
        self.cluster_index.get(&cluster_number).copied()
    }

    pub fn cluster(&self, idx: usize) -> Option<&Cluster> {
        self.clusters.get(idx)
    }

    pub fn confal(&self, idx: usize) -> Option<&Confal> {
        self.confals.get(idx)
    }

    /// Looks up the classification cluster assigned to a given `NtC` class
    /// (`LLKA_classificationClusterForNtC`).
    pub fn classification_cluster_for_ntc(&self, ntc: NtC) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.ntc == ntc)
    }

    /// Looks up the confal parameters for a given `NtC` class (`LLKA_confalForNtC`).
    pub fn confal_for_ntc(&self, ntc: NtC) -> Option<&Confal> {
        let cluster = self.classification_cluster_for_ntc(ntc)?;
        self.cluster_index_of(cluster.cluster_number).and_then(|idx| self.confal(idx))
    }

    /// Looks up every cluster belonging to a given CANA coarse class.
    pub fn clusters_for_cana(&self, cana: Cana) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.cana == cana)
    }

    /// Maps a confal score (0..=100) onto its percentile rank (`LLKA_confalPercentile`):
    /// the largest `p` in `0..=100` such that `confal_percentiles[p] <= score`, or `0`
    /// if the score is below every tabulated percentile.
    pub fn confal_percentile(&self, score: f64) -> u8 {
        self.confal_percentiles
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &threshold)| threshold <= score)
            .map(|(p, _)| p as u8)
            .unwrap_or(0)
    }
}

fn validate_limits(limits: &ClassificationLimits) -> Result<(), ClassificationError> {
    if limits.average_neighbors_torsion_cutoff <= 0.0
        || limits.nearest_neighbor_torsions_cutoff <= 0.0
        || limits.total_distance_cutoff <= 0.0
        || limits.pseudorotation_cutoff <= 0.0
        || limits.minimum_cluster_votes <= 0.0
        || limits.minimum_nearest_neighbors < 1
        || limits.number_of_used_nearest_neighbors < limits.minimum_nearest_neighbors
    {
        return Err(ClassificationError::BadClassificationLimits);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_limits() -> ClassificationLimits {
        ClassificationLimits {
            average_neighbors_torsion_cutoff: 0.5,
            nearest_neighbor_torsions_cutoff: 0.5,
            total_distance_cutoff: 1.0,
            pseudorotation_cutoff: 0.5,
            minimum_cluster_votes: 1.0,
            minimum_nearest_neighbors: 1,
            number_of_used_nearest_neighbors: 5,
            max_close_enough_rmsd: 2.5,
        }
    }

    fn sample_cluster_row(cluster_number: i32, ntc: &str) -> ClusterRow {
        ClusterRow {
            cluster_number,
            ntc: ntc.to_string(),
            cana: "A".to_string(),
            delta_1_deviation: 5.0, delta_1_meanValue: 80.0,
            epsilon_1_deviation: 5.0, epsilon_1_meanValue: -150.0,
            zeta_1_deviation: 5.0, zeta_1_meanValue: -70.0,
            alpha_2_deviation: 5.0, alpha_2_meanValue: -65.0,
            beta_2_deviation: 5.0, beta_2_meanValue: 175.0,
            gamma_2_deviation: 5.0, gamma_2_meanValue: 55.0,
            delta_2_deviation: 5.0, delta_2_meanValue: 80.0,
            chi_1_deviation: 5.0, chi_1_meanValue: -160.0,
            chi_2_deviation: 5.0, chi_2_meanValue: -160.0,
            cc_deviation: 0.3, cc_mean_value: 4.8,
            nn_deviation: 0.3, nn_mean_value: 4.6,
            mu_deviation: 5.0, mu_meanValue: 0.0,
            ribose_pseudorotation_1: 10.0,
            ribose_pseudorotation_2: 10.0,
        }
    }

    fn sample_golden_step_row(cluster_number: i32) -> GoldenStepRow {
        GoldenStepRow {
            cluster_number,
            delta_1: 80.0, epsilon_1: -150.0, zeta_1: -70.0, alpha_2: -65.0, beta_2: 175.0,
            gamma_2: 55.0, delta_2: 80.0, chi_1: -160.0, chi_2: -160.0,
            cc: 4.8, nn: 4.6, mu: 0.0,
            name: "sample".to_string(),
            pucker_1: "C3endo".to_string(),
            pucker_2: "C3endo".to_string(),
            nu0_1: 10.0, nu1_1: 10.0, nu2_1: 10.0, nu3_1: 10.0, nu4_1: 10.0,
            nu0_2: 10.0, nu1_2: 10.0, nu2_2: 10.0, nu3_2: 10.0, nu4_2: 10.0,
        }
    }

    fn sample_confal_row(cluster_number: i32) -> ConfalRow {
        ConfalRow {
            cluster_number,
            delta_1: 5.0, epsilon_1: 5.0, zeta_1: 5.0, alpha_2: 5.0, beta_2: 5.0, gamma_2: 5.0,
            delta_2: 5.0, chi_1: 5.0, chi_2: 5.0, cc: 0.3, nn: 0.3, mu: 5.0,
            nu0_1: 5.0, nu1_1: 5.0, nu2_1: 5.0, nu3_1: 5.0, nu4_1: 5.0,
            nu0_2: 5.0, nu1_2: 5.0, nu2_2: 5.0, nu3_2: 5.0, nu4_2: 5.0,
        }
    }

    fn sample_nu_angles_row(cluster_number: i32) -> ClusterNuAnglesRow {
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

    #[test]
    fn builds_a_valid_single_cluster_context() {
        let ctx = ClassificationContext::new(
            vec![sample_cluster_row(1, "AA00")],
            vec![sample_golden_step_row(1)],
            vec![sample_confal_row(1)],
            vec![sample_nu_angles_row(1)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            sample_limits(),
        )
        .expect("a single well-formed cluster should build cleanly");
        assert_eq!(ctx.clusters().len(), 1);
        assert_eq!(ctx.golden_steps().len(), 1);
        assert!(ctx.classification_cluster_for_ntc(NtC::AA00).is_some());
    }

    #[test]
    fn duplicate_cluster_numbers_are_rejected() {
        let result = ClassificationContext::new(
            vec![sample_cluster_row(1, "AA00"), sample_cluster_row(1, "AA01")],
            vec![sample_golden_step_row(1)],
            vec![sample_confal_row(1), sample_confal_row(1)],
            vec![sample_nu_angles_row(1), sample_nu_angles_row(1)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            sample_limits(),
        );
        assert!(matches!(result, Err(ClassificationError::BadClassificationClusters)));
    }

    #[test]
    fn golden_step_with_unknown_cluster_is_rejected() {
        let result = ClassificationContext::new(
            vec![sample_cluster_row(1, "AA00")],
            vec![sample_golden_step_row(2)],
            vec![sample_confal_row(1)],
            vec![sample_nu_angles_row(1)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            sample_limits(),
        );
        assert!(matches!(result, Err(ClassificationError::BadGoldenSteps)));
    }

    #[test]
    fn wrong_percentile_table_size_is_bad_data() {
        let result = ClassificationContext::new(
            vec![sample_cluster_row(1, "AA00")],
            vec![sample_golden_step_row(1)],
            vec![sample_confal_row(1)],
            vec![sample_nu_angles_row(1)],
            vec![0.0; 50],
            sample_limits(),
        );
        assert!(matches!(result, Err(ClassificationError::BadData)));
    }

    #[test]
    fn golden_steps_end_up_sorted_by_cluster_number() {
        let ctx = ClassificationContext::new(
            vec![sample_cluster_row(2, "AA01"), sample_cluster_row(1, "AA00")],
            vec![sample_golden_step_row(2), sample_golden_step_row(1)],
            vec![sample_confal_row(2), sample_confal_row(1)],
            vec![sample_nu_angles_row(2), sample_nu_angles_row(1)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            sample_limits(),
        )
        .unwrap();
        let numbers: Vec<i32> = ctx.golden_steps().iter().map(|gs| gs.cluster_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn confal_percentile_finds_the_highest_satisfied_threshold() {
        let mut percentiles = [0.0; CONFAL_PERCENTILE_COUNT];
        for (i, p) in percentiles.iter_mut().enumerate() {
            *p = i as f64;
        }
        let ctx = ClassificationContext::new(
            vec![sample_cluster_row(1, "AA00")],
            vec![sample_golden_step_row(1)],
            vec![sample_confal_row(1)],
            vec![sample_nu_angles_row(1)],
            percentiles.to_vec(),
            sample_limits(),
        )
        .unwrap();
        assert_eq!(ctx.confal_percentile(42.7), 42);
        assert_eq!(ctx.confal_percentile(0.0), 0);
        assert_eq!(ctx.confal_percentile(200.0), 100);
    }
}
