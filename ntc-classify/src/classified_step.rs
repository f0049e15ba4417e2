//! The outcome of classifying a single dinucleotide step (spec.md §3 "Classified step").

use crate::nomenclature::{Cana, NtC};
use crate::nucleotide::SugarPucker;
use crate::residue_id::ResidueId;
use crate::step_metrics::{NuAngles, StepMetrics};
use crate::violations::{TorsionViolationMask, Violations};

/// Everything a step's classification produces: its measured geometry, the cluster it
/// was assigned to (if any), the cluster it merely came closest to, every intermediate
/// difference used to reach that verdict, and the bit-flags recording which tolerance
/// checks it failed.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedStep {
    pub residue_1: ResidueId,
    pub residue_2: ResidueId,

    /// `NtC::Invalid`/`Cana::Invalid` unless every tolerance check passed.
    pub assigned_ntc: NtC,
    pub assigned_cana: Cana,

    /// The winning cluster's class, regardless of whether it was ultimately assigned.
    pub closest_ntc: NtC,
    pub closest_cana: Cana,

    pub measured_metrics: StepMetrics,
    /// Signed difference of each measured metric from the assigned/closest cluster's
    /// mean (torsions and μ in radians, CC/NN in Å; spec.md §4.7's
    /// "differences vs cluster mean").
    pub differences_from_cluster_mean: StepMetrics,

    pub nu_1: NuAngles,
    pub nu_2: NuAngles,
    /// Per-ν signed difference from the closest golden step's own ν bundle (spec.md §3).
    pub nu_differences_1: [f64; 5],
    pub nu_differences_2: [f64; 5],

    pub rmsd_to_closest_ntc: f64,
    pub closest_golden_step: String,

    pub confal_score: f64,

    pub violations: Violations,
    pub violating_torsions_average: TorsionViolationMask,
    pub violating_torsions_nearest: TorsionViolationMask,
}

impl ClassifiedStep {
    /// `true` if this step was assigned a cluster, i.e. [`Self::violations`] is empty.
    pub fn is_assigned(&self) -> bool {
        self.violations.is_ok()
    }

    pub fn sugar_pucker_1(&self) -> SugarPucker {
        self.nu_1.sugar_pucker
    }

    pub fn sugar_pucker_2(&self) -> SugarPucker {
        self.nu_2.sugar_pucker
    }
}
