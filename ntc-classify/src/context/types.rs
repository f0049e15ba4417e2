//! The classification context's data model: clusters, golden steps, confals, the
//! confal-percentile table and classification limits (spec.md §3, §4.5).

use crate::calc::{angle_difference, wrap_to_2pi};
use crate::nomenclature::{Cana, NtC};
use crate::nucleotide::SugarPucker;
use crate::step_metrics::StepMetrics;

/// A mean/deviation pair as the reference library expresses every per-torsion and
/// per-cross-residue-metric statistic (spec.md §3 "Classification metric").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationMetric {
    pub mean: f64,
    pub deviation: f64,
}

/// A tolerance window `[min, max]` derived from a [`ClassificationMetric`].
///
/// For angular quantities wrapped into `[0, 2π)`, `min` can be numerically greater than
/// `max`: that means the window straddles the `0`/`2π` seam (spec.md §4.6's "inverted
/// interval"), and [`Self::contains`] handles both cases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToleranceInterval {
    pub min: f64,
    pub max: f64,
}

impl ToleranceInterval {
    /// Builds a wrapped angular interval `[wrap(mean - k*dev), wrap(mean + k*dev))`.
    pub fn wrapped(mean: f64, deviation: f64, multiplier: f64) -> ToleranceInterval {
        let half = deviation * multiplier;
        ToleranceInterval { min: wrap_to_2pi(mean - half), max: wrap_to_2pi(mean + half) }
    }

    /// Builds a plain, unwrapped interval `[mean - k*dev, mean + k*dev]`, as the original
    /// derives CC/NN bounds (distances are never wrapped).
    pub fn plain(mean: f64, deviation: f64, multiplier: f64) -> ToleranceInterval {
        let half = deviation * multiplier;
        ToleranceInterval { min: mean - half, max: mean + half }
    }

    /// `true` if `value` (an angle in `[0, 2π)`, or a plain distance for unwrapped
    /// intervals) falls inside this window.
    pub fn contains(&self, value: f64) -> bool {
        if self.min <= self.max {
            value >= self.min && value <= self.max
        } else {
            // Inverted interval: straddles the 0/2pi seam.
            value >= self.min || value <= self.max
        }
    }

    /// Like [`Self::contains`] but with open bounds: a value sitting exactly on `min` or
    /// `max` is outside. Used by the nearest-neighbour search's per-torsion cluster gate
    /// (spec.md §4.6), which the original evaluates with `LLKA_WITHIN_EXCLUSIVE`.
    pub fn contains_exclusive(&self, value: f64) -> bool {
        if self.min <= self.max {
            value > self.min && value < self.max
        } else {
            value > self.min || value < self.max
        }
    }
}

/// The nine backbone-torsion tolerance windows of a cluster, in
/// [`StepMetrics::torsions`]'s fixed order.
pub type TorsionIntervals = [ToleranceInterval; 9];

/// One classification cluster: its defining torsion/CC/NN/μ statistics, derived
/// tolerance windows, and reference ribose pseudorotation phases (spec.md §3
/// "Classification cluster").
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub cluster_number: i32,
    pub ntc: NtC,
    pub cana: Cana,

    pub delta_1: ClassificationMetric,
    pub epsilon_1: ClassificationMetric,
    pub zeta_1: ClassificationMetric,
    pub alpha_2: ClassificationMetric,
    pub beta_2: ClassificationMetric,
    pub gamma_2: ClassificationMetric,
    pub delta_2: ClassificationMetric,
    pub chi_1: ClassificationMetric,
    pub chi_2: ClassificationMetric,
    pub cc: ClassificationMetric,
    pub nn: ClassificationMetric,
    pub mu: ClassificationMetric,

    pub ribose_pseudorotation_1: f64,
    pub ribose_pseudorotation_2: f64,

    /// Tolerance windows derived from the nine torsion metrics above, in the same
    /// fixed order, for nearest-neighbour search and tolerance verification.
    pub torsion_intervals: TorsionIntervals,
    pub cc_interval: ToleranceInterval,
    pub nn_interval: ToleranceInterval,
    pub mu_interval: ToleranceInterval,

    /// Per-nucleotide ν-angle mean/deviation bundles (spec.md §3's cluster-level
    /// "per-nucleotide ν-angle statistics bundles"), resolved from this cluster's
    /// `ClusterNuAngles` row at context-build time. Consulted by ν-difference
    /// computation (classification.cpp:733-739).
    pub nus_first: [ClassificationMetric; 5],
    pub nus_second: [ClassificationMetric; 5],
}

impl Cluster {
    /// The nine torsion means, in [`StepMetrics::torsions`]'s fixed order.
    pub fn torsion_means(&self) -> [f64; 9] {
        [
            self.delta_1.mean,
            self.epsilon_1.mean,
            self.zeta_1.mean,
            self.alpha_2.mean,
            self.beta_2.mean,
            self.gamma_2.mean,
            self.delta_2.mean,
            self.chi_1.mean,
            self.chi_2.mean,
        ]
    }

    /// Signed angular difference of each of `step`'s nine torsions from this cluster's
    /// means, in the same fixed order (spec.md §4.7's distance-from-cluster-average).
    pub fn torsion_differences(&self, step: &StepMetrics) -> [f64; 9] {
        let means = self.torsion_means();
        let actual = step.torsions();
        let mut out = [0.0; 9];
        for i in 0..9 {
            out[i] = angle_difference(actual[i], means[i]);
        }
        out
    }
}

/// A single reference ("golden") step: a concrete, previously classified dinucleotide
/// step serving as a nearest-neighbour candidate (spec.md §3 "Golden step").
#[derive(Clone, Debug, PartialEq)]
pub struct GoldenStep {
    pub cluster_number: i32,
    pub cluster_index: usize,
    pub name: String,
    pub pucker_1: SugarPucker,
    pub pucker_2: SugarPucker,
    pub metrics: StepMetrics,
    pub nu_1: [f64; 5],
    pub nu_2: [f64; 5],
}

/// The per-cluster Gaussian-width ("confal") parameters used to score how confidently a
/// step belongs to its assigned cluster (spec.md §3 "Confal row").
///
/// `nu_*` fields are loaded and validated for schema completeness but, matching the
/// original's own `calcConfalScore` (which never reads them), are not consumed by
/// [`crate::confal`]'s scoring function.
#[derive(Clone, Debug, PartialEq)]
pub struct Confal {
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
    pub cc: f64,
    pub nn: f64,
    pub mu: f64,
    pub nu_1: [f64; 5],
    pub nu_2: [f64; 5],
}

impl Confal {
    /// The twelve Gaussian-width parameters, in the fixed order
    /// [`StepMetrics::torsions`] + `[CC, NN, mu]`, that [`crate::confal`] scores against.
    pub fn widths(&self) -> [f64; 12] {
        [
            self.delta_1, self.epsilon_1, self.zeta_1, self.alpha_2, self.beta_2,
            self.gamma_2, self.delta_2, self.chi_1, self.chi_2, self.cc, self.nn, self.mu,
        ]
    }
}

/// A cluster's mean/deviation ν-angle statistics (spec.md §3 "Nu-angle bundle" is the
/// per-step analogue; this is the reference-library counterpart). Resolved onto the
/// owning [`Cluster`] as `nus_first`/`nus_second` at context-build time and consulted
/// when computing a classified step's ν-differences (classification.cpp:733-739).
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNuAngles {
    pub cluster_number: i32,
    pub nu_1: [ClassificationMetric; 5],
    pub nu_2: [ClassificationMetric; 5],
}

/// Numeric thresholds controlling nearest-neighbour search, voting and tolerance
/// verification (spec.md §3 "Classification limits").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassificationLimits {
    pub average_neighbors_torsion_cutoff: f64,
    pub nearest_neighbor_torsions_cutoff: f64,
    pub total_distance_cutoff: f64,
    pub pseudorotation_cutoff: f64,
    pub minimum_cluster_votes: f64,
    pub minimum_nearest_neighbors: usize,
    pub number_of_used_nearest_neighbors: usize,
    pub max_close_enough_rmsd: f64,
}
