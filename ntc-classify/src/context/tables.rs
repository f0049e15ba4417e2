//! Row types for the reference library's five CSV tables, and the constants used to
//! derive tolerance windows from the raw mean/deviation statistics (spec.md §6).
//!
//! Column names and ordering are transcribed verbatim from
//! `original_source/src/resource_loaders.cpp`'s five `*Schema` definitions. Angles are
//! stored in the CSV files in degrees (the convention every published NtC reference
//! table the original ships with uses); every row is converted to radians on load so
//! the rest of this crate only ever works in radians.

use serde::Deserialize;

use crate::calc::to_radians_f;
use crate::context::types::{
    Cluster, ClusterNuAngles, Confal, ClassificationMetric, GoldenStep, ToleranceInterval,
};
use crate::error::ClassificationError;
use crate::nomenclature::{Cana, NtC};
use crate::nucleotide::SugarPucker;
use crate::step_metrics::StepMetrics;
use crate::nomenclature::SugarPuckerNames;

/// Tuning constants with no recoverable literal value in the retrieved sources
/// (confirmed absent from both `spec.md` and every `original_source/` file by
/// exhaustive grep — only their call sites survive). Each is a documented, reasoned
/// placeholder rather than a claimed reproduction of the unpublished original value
/// (see `DESIGN.md`): a neutral multiplier of `1.0` derives tolerance windows directly
/// from each metric's own deviation, with no extra amplification or damping.
pub mod constants {
    /// Scales the deviation of each of the nine backbone torsions when deriving a
    /// cluster's torsion tolerance windows.
    pub const BACKBONE_TORSIONS_DEVIATION_MULTIPLIER: f64 = 1.0;
    /// Scales the deviation of the CC/NN cross-residue distance metrics.
    pub const XR_DISTANCE_DEVIATION_MULTIPLIER: f64 = 1.0;
    /// Scales the deviation of the μ cross-residue torsion.
    pub const MU_TORSION_DEVIATION_MULTIPLIER: f64 = 1.0;
    /// Scales CC/NN distance differences before they are accumulated into the same
    /// 12-dimensional Euclidean distance as the (degree-valued) torsion differences
    /// during nearest-neighbour search and cluster voting.
    pub const XR_DISTANCE_MULTIPLIER: f64 = 1.0;

    /// Self-identity skip tolerance in the nearest-neighbour search: a golden step
    /// whose squared 9-torsion distance to the query is at or below this value is
    /// assumed to be the query itself, sourced from the reference library, and is
    /// skipped rather than counted as its own neighbour. `(0.0005 * 9)^2`, the one
    /// literal value `spec.md` itself provides.
    pub const SELF_IDENTITY_TOLERANCE_SQ: f64 = 0.00002025;
}

fn metric(mean_deg: f64, deviation_deg: f64) -> ClassificationMetric {
    ClassificationMetric { mean: to_radians_f(mean_deg), deviation: to_radians_f(deviation_deg) }
}

#[derive(Debug, Deserialize)]
pub struct ClusterRow {
    #[serde(rename = "clusterNumber")]
    pub cluster_number: i32,
    pub ntc: String,
    pub cana: String,
    pub delta_1_deviation: f64,
    pub delta_1_meanValue: f64,
    pub epsilon_1_deviation: f64,
    pub epsilon_1_meanValue: f64,
    pub zeta_1_deviation: f64,
    pub zeta_1_meanValue: f64,
    pub alpha_2_deviation: f64,
    pub alpha_2_meanValue: f64,
    pub beta_2_deviation: f64,
    pub beta_2_meanValue: f64,
    pub gamma_2_deviation: f64,
    pub gamma_2_meanValue: f64,
    pub delta_2_deviation: f64,
    pub delta_2_meanValue: f64,
    pub chi_1_deviation: f64,
    pub chi_1_meanValue: f64,
    pub chi_2_deviation: f64,
    pub chi_2_meanValue: f64,
    #[serde(rename = "CC_deviation")]
    pub cc_deviation: f64,
    #[serde(rename = "CC_meanValue")]
    pub cc_mean_value: f64,
    #[serde(rename = "NN_deviation")]
    pub nn_deviation: f64,
    #[serde(rename = "NN_meanValue")]
    pub nn_mean_value: f64,
    pub mu_deviation: f64,
    pub mu_meanValue: f64,
    #[serde(rename = "ribosePseudorotation_1")]
    pub ribose_pseudorotation_1: f64,
    #[serde(rename = "ribosePseudorotation_2")]
    pub ribose_pseudorotation_2: f64,
}

impl ClusterRow {
    /// Validates and converts this row into a [`Cluster`], deriving its tolerance
    /// windows (spec.md §4.5's cluster-derivation step).
    pub fn into_cluster(self) -> Result<Cluster, ClassificationError> {
        use constants::*;

        let torsion_devs = [
            self.delta_1_deviation, self.epsilon_1_deviation, self.zeta_1_deviation,
            self.alpha_2_deviation, self.beta_2_deviation, self.gamma_2_deviation,
            self.delta_2_deviation, self.chi_1_deviation, self.chi_2_deviation,
        ];
        if torsion_devs.iter().any(|d| *d < 0.0)
            || self.cc_deviation < 0.0
            || self.nn_deviation < 0.0
            || self.mu_deviation < 0.0
        {
            return Err(ClassificationError::BadClassificationClusters);
        }

        let ntc = NtC::from_name(&self.ntc).ok_or(ClassificationError::BadClassificationClusters)?;
        let cana = Cana::from_name(&self.cana).ok_or(ClassificationError::BadClassificationClusters)?;

        let delta_1 = metric(self.delta_1_meanValue, self.delta_1_deviation);
        let epsilon_1 = metric(self.epsilon_1_meanValue, self.epsilon_1_deviation);
        let zeta_1 = metric(self.zeta_1_meanValue, self.zeta_1_deviation);
        let alpha_2 = metric(self.alpha_2_meanValue, self.alpha_2_deviation);
        let beta_2 = metric(self.beta_2_meanValue, self.beta_2_deviation);
        let gamma_2 = metric(self.gamma_2_meanValue, self.gamma_2_deviation);
        let delta_2 = metric(self.delta_2_meanValue, self.delta_2_deviation);
        let chi_1 = metric(self.chi_1_meanValue, self.chi_1_deviation);
        let chi_2 = metric(self.chi_2_meanValue, self.chi_2_deviation);
        let cc = metric(self.cc_mean_value, self.cc_deviation);
        let nn = metric(self.nn_mean_value, self.nn_deviation);
        let mu = metric(self.mu_meanValue, self.mu_deviation);

        let torsions = [delta_1, epsilon_1, zeta_1, alpha_2, beta_2, gamma_2, delta_2, chi_1, chi_2];
        let mut torsion_intervals = [ToleranceInterval { min: 0.0, max: 0.0 }; 9];
        for (i, t) in torsions.iter().enumerate() {
            torsion_intervals[i] =
                ToleranceInterval::wrapped(t.mean, t.deviation, BACKBONE_TORSIONS_DEVIATION_MULTIPLIER);
        }

        let cc_interval = ToleranceInterval::plain(cc.mean, cc.deviation, XR_DISTANCE_DEVIATION_MULTIPLIER);
        let nn_interval = ToleranceInterval::plain(nn.mean, nn.deviation, XR_DISTANCE_DEVIATION_MULTIPLIER);
        let mu_interval = ToleranceInterval::wrapped(mu.mean, mu.deviation, MU_TORSION_DEVIATION_MULTIPLIER);

        Ok(Cluster {
            cluster_number: self.cluster_number,
            ntc,
            cana,
            delta_1, epsilon_1, zeta_1, alpha_2, beta_2, gamma_2, delta_2, chi_1, chi_2, cc, nn, mu,
            ribose_pseudorotation_1: to_radians_f(self.ribose_pseudorotation_1),
            ribose_pseudorotation_2: to_radians_f(self.ribose_pseudorotation_2),
            torsion_intervals,
            cc_interval,
            nn_interval,
            mu_interval,
            // Resolved from this cluster's `ClusterNuAngles` row right after
            // construction (`ClassificationContext::new`); a row-local placeholder
            // until then since the two tables are parsed independently.
            nus_first: [ClassificationMetric { mean: 0.0, deviation: 0.0 }; 5],
            nus_second: [ClassificationMetric { mean: 0.0, deviation: 0.0 }; 5],
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GoldenStepRow {
    #[serde(rename = "clusterNumber")]
    pub cluster_number: i32,
    pub delta_1: f64,
    pub epsilon_1: f64,
    pub zeta_1: f64,
    pub alpha_2: f64,
    pub beta_2: f64,
    pub gamma_2: f64,
    pub delta_2: f64,
    pub chi_1: f64,
    pub chi_2: f64,
    #[serde(rename = "CC")]
    pub cc: f64,
    #[serde(rename = "NN")]
    pub nn: f64,
    pub mu: f64,
    pub name: String,
    pub pucker_1: String,
    pub pucker_2: String,
    pub nu0_1: f64,
    pub nu1_1: f64,
    pub nu2_1: f64,
    pub nu3_1: f64,
    pub nu4_1: f64,
    pub nu0_2: f64,
    pub nu1_2: f64,
    pub nu2_2: f64,
    pub nu3_2: f64,
    pub nu4_2: f64,
}

impl GoldenStepRow {
    /// Resolves this row into a [`GoldenStep`], given the cluster-number-to-index
    /// mapping already built from the clusters table (spec.md §4.5).
    pub fn into_golden_step(
        self,
        cluster_index: usize,
    ) -> Result<GoldenStep, ClassificationError> {
        let pucker_1 = SugarPucker::from_name(&self.pucker_1).ok_or(ClassificationError::BadGoldenSteps)?;
        let pucker_2 = SugarPucker::from_name(&self.pucker_2).ok_or(ClassificationError::BadGoldenSteps)?;

        let metrics = StepMetrics {
            delta_1: to_radians_f(self.delta_1),
            epsilon_1: to_radians_f(self.epsilon_1),
            zeta_1: to_radians_f(self.zeta_1),
            alpha_2: to_radians_f(self.alpha_2),
            beta_2: to_radians_f(self.beta_2),
            gamma_2: to_radians_f(self.gamma_2),
            delta_2: to_radians_f(self.delta_2),
            chi_1: to_radians_f(self.chi_1),
            chi_2: to_radians_f(self.chi_2),
            cc: self.cc,
            nn: self.nn,
            mu: to_radians_f(self.mu),
        };

        Ok(GoldenStep {
            cluster_number: self.cluster_number,
            cluster_index,
            name: self.name,
            pucker_1,
            pucker_2,
            metrics,
            nu_1: [
                to_radians_f(self.nu0_1), to_radians_f(self.nu1_1), to_radians_f(self.nu2_1),
                to_radians_f(self.nu3_1), to_radians_f(self.nu4_1),
            ],
            nu_2: [
                to_radians_f(self.nu0_2), to_radians_f(self.nu1_2), to_radians_f(self.nu2_2),
                to_radians_f(self.nu3_2), to_radians_f(self.nu4_2),
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ConfalRow {
    #[serde(rename = "clusterNumber")]
    pub cluster_number: i32,
    pub delta_1: f64,
    pub epsilon_1: f64,
    pub zeta_1: f64,
    pub alpha_2: f64,
    pub beta_2: f64,
    pub gamma_2: f64,
    pub delta_2: f64,
    pub chi_1: f64,
    pub chi_2: f64,
    #[serde(rename = "CC")]
    pub cc: f64,
    #[serde(rename = "NN")]
    pub nn: f64,
    pub mu: f64,
    pub nu0_1: f64,
    pub nu1_1: f64,
    pub nu2_1: f64,
    pub nu3_1: f64,
    pub nu4_1: f64,
    pub nu0_2: f64,
    pub nu1_2: f64,
    pub nu2_2: f64,
    pub nu3_2: f64,
    pub nu4_2: f64,
}

impl ConfalRow {
    pub fn into_confal(self) -> Confal {
        Confal {
            cluster_number: self.cluster_number,
            delta_1: self.delta_1,
            epsilon_1: self.epsilon_1,
            zeta_1: self.zeta_1,
            alpha_2: self.alpha_2,
            beta_2: self.beta_2,
            gamma_2: self.gamma_2,
            delta_2: self.delta_2,
            chi_1: self.chi_1,
            chi_2: self.chi_2,
            cc: self.cc,
            nn: self.nn,
            mu: self.mu,
            nu_1: [self.nu0_1, self.nu1_1, self.nu2_1, self.nu3_1, self.nu4_1],
            nu_2: [self.nu0_2, self.nu1_2, self.nu2_2, self.nu3_2, self.nu4_2],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClusterNuAnglesRow {
    #[serde(rename = "clusterNumber")]
    pub cluster_number: i32,
    pub nu0_1_meanValue: f64,
    pub nu0_1_deviation: f64,
    pub nu1_1_meanValue: f64,
    pub nu1_1_deviation: f64,
    pub nu2_1_meanValue: f64,
    pub nu2_1_deviation: f64,
    pub nu3_1_meanValue: f64,
    pub nu3_1_deviation: f64,
    pub nu4_1_meanValue: f64,
    pub nu4_1_deviation: f64,
    pub nu0_2_meanValue: f64,
    pub nu0_2_deviation: f64,
    pub nu1_2_meanValue: f64,
    pub nu1_2_deviation: f64,
    pub nu2_2_meanValue: f64,
    pub nu2_2_deviation: f64,
    pub nu3_2_meanValue: f64,
    pub nu3_2_deviation: f64,
    pub nu4_2_meanValue: f64,
    pub nu4_2_deviation: f64,
}

impl ClusterNuAnglesRow {
    pub fn into_cluster_nu_angles(self) -> Result<ClusterNuAngles, ClassificationError> {
        let devs = [
            self.nu0_1_deviation, self.nu1_1_deviation, self.nu2_1_deviation, self.nu3_1_deviation,
            self.nu4_1_deviation, self.nu0_2_deviation, self.nu1_2_deviation, self.nu2_2_deviation,
            self.nu3_2_deviation, self.nu4_2_deviation,
        ];
        if devs.iter().any(|d| *d < 0.0) {
            return Err(ClassificationError::BadAverageNuAngles);
        }
        Ok(ClusterNuAngles {
            cluster_number: self.cluster_number,
            nu_1: [
                metric(self.nu0_1_meanValue, self.nu0_1_deviation),
                metric(self.nu1_1_meanValue, self.nu1_1_deviation),
                metric(self.nu2_1_meanValue, self.nu2_1_deviation),
                metric(self.nu3_1_meanValue, self.nu3_1_deviation),
                metric(self.nu4_1_meanValue, self.nu4_1_deviation),
            ],
            nu_2: [
                metric(self.nu0_2_meanValue, self.nu0_2_deviation),
                metric(self.nu1_2_meanValue, self.nu1_2_deviation),
                metric(self.nu2_2_meanValue, self.nu2_2_deviation),
                metric(self.nu3_2_meanValue, self.nu3_2_deviation),
                metric(self.nu4_2_meanValue, self.nu4_2_deviation),
            ],
        })
    }
}
