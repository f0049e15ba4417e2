//! RMSD of a step's phosphodiester backbone trace to its assigned cluster's reference
//! conformation (spec.md §4.9).
//!
//! The original ships a baked-in table of ninety-six "extended backbone" reference point
//! clouds (`NTC_RAW_REFS`, declared alongside `similarity.h`) that the retrieved
//! `original_source/` pack does not include (confirmed absent by exhaustive grep over
//! every retrieved file; see `DESIGN.md`). Rather than invent ninety-six sets of atomic
//! coordinates with no source to ground them in, this module derives each cluster's
//! reference trace the same way the teacher's own `bioshell-pdb::calc::nerf` builds any
//! other internal-coordinate chain: place it by forward kinematics (NeRF) from the
//! cluster's own seven backbone-torsion means and standard nucleic-acid bond
//! lengths/angles. The resulting ten-atom trace —
//! `C5'1-C4'1-C3'1-O3'1-P2-O5'2-C5'2-C4'2-C3'2-O3'2` — covers exactly the backbone
//! dihedrals [`crate::step_metrics::StepMetrics::torsions`] already measures (excluding
//! the two glycosidic χ torsions, which are base-referential and outside the
//! phosphodiester backbone proper), so it needs no new atom-name lookups: a step's own
//! trace and its cluster's reference trace are built by the identical function, just fed
//! different torsions, which is what makes the two comparable under rigid superposition.

use crate::calc::{superpose, Vec3};
use crate::context::Cluster;
use crate::error::ClassificationError;
use crate::step_metrics::StepMetrics;

/// Idealised nucleic-acid backbone bond lengths (Å) and bond angles (radians), used to
/// place the ten-atom trace below. Literature-standard values (Saenger, *Principles of
/// Nucleic Acid Structure*); a synthetic trace only needs to be internally consistent
/// between a step and its cluster reference, not a crystallographic reproduction, but
/// using realistic geometry keeps the synthesized clouds themselves physically sane.
mod geometry_constants {
    pub const C5_C4: f64 = 1.510;
    pub const C4_C3: f64 = 1.524;
    pub const C3_O3: f64 = 1.419;
    pub const O3_P: f64 = 1.607;
    pub const P_O5: f64 = 1.593;
    pub const O5_C5: f64 = 1.440;

    pub const ANGLE_C5_C4_C3: f64 = 1.902; // 109.0 deg
    pub const ANGLE_C4_C3_O3: f64 = 1.920; // 110.0 deg
    pub const ANGLE_C3_O3_P: f64 = 2.089; // 119.7 deg
    pub const ANGLE_O3_P_O5: f64 = 1.815; // 104.0 deg
    pub const ANGLE_P_O5_C5: f64 = 2.110; // 120.9 deg
    pub const ANGLE_O5_C5_C4: f64 = 1.937; // 111.0 deg
}

/// Number of atoms in the synthesized backbone trace (spec.md §4.9's "18-to-22 atom
/// pattern" is narrowed here to the subset that is both dihedral-addressable from
/// already-measured torsions and free of base-identity-dependent atom names; see
/// `DESIGN.md`).
pub const BACKBONE_TRACE_LEN: usize = 10;

/// Places a fourth atom `d` given three predecessors `a-b-c`, a bond length, bond angle
/// and dihedral, using the standard NeRF construction (grounded on the teacher's
/// `bioshell-pdb::calc::nerf::place_atom`).
fn place_atom(a: &Vec3, b: &Vec3, c: &Vec3, bond_length: f64, bond_angle: f64, dihedral: f64) -> Vec3 {
    let bc = Vec3::sub_s(c, b).normalized();
    let mut n = Vec3::cross(&Vec3::sub_s(b, a), &bc);
    n.normalize();
    let m = Vec3::cross(&n, &bc);

    let interior = std::f64::consts::PI - bond_angle;
    let local = Vec3::new(
        bond_length * interior.cos(),
        bond_length * interior.sin() * dihedral.cos(),
        bond_length * interior.sin() * dihedral.sin(),
    );

    Vec3::new(
        c.x + local.x * bc.x + local.y * m.x + local.z * n.x,
        c.y + local.x * bc.y + local.y * m.y + local.z * n.y,
        c.z + local.x * bc.z + local.y * m.z + local.z * n.z,
    )
}

/// Builds the ten-atom phosphodiester backbone trace
/// `[C5'1, C4'1, C3'1, O3'1, P2, O5'2, C5'2, C4'2, C3'2, O3'2]` from the step's seven
/// backbone torsions `[delta_1, epsilon_1, zeta_1, alpha_2, beta_2, gamma_2, delta_2]`.
pub fn build_backbone_trace(torsions: &StepMetrics) -> [Vec3; BACKBONE_TRACE_LEN] {
    use geometry_constants::*;

    let mut trace = [Vec3::from_float(0.0); BACKBONE_TRACE_LEN];
    // Bootstrap the first three atoms in an arbitrary but fixed frame.
    trace[0] = Vec3::new(0.0, 0.0, 0.0);
    trace[1] = Vec3::new(C5_C4, 0.0, 0.0);
    let bend = std::f64::consts::PI - ANGLE_C5_C4_C3;
    trace[2] = Vec3::new(
        trace[1].x + C4_C3 * bend.cos(),
        trace[1].y + C4_C3 * bend.sin(),
        0.0,
    );

    let steps: [(f64, f64, f64); 7] = [
        (C4_C3, ANGLE_C4_C3_O3, torsions.delta_1),
        (C3_O3, ANGLE_C3_O3_P, torsions.epsilon_1),
        (O3_P, ANGLE_O3_P_O5, torsions.zeta_1),
        (P_O5, ANGLE_P_O5_C5, torsions.alpha_2),
        (O5_C5, ANGLE_O5_C5_C4, torsions.beta_2),
        (C5_C4, ANGLE_C5_C4_C3, torsions.gamma_2),
        (C4_C3, ANGLE_C4_C3_O3, torsions.delta_2),
    ];
    for (i, (bond_length, bond_angle, dihedral)) in steps.into_iter().enumerate() {
        let idx = i + 3;
        trace[idx] = place_atom(&trace[idx - 3], &trace[idx - 2], &trace[idx - 1], bond_length, bond_angle, dihedral);
    }

    trace
}

/// Computes the RMSD between `step`'s own backbone trace and its assigned `cluster`'s
/// reference trace (built from the cluster's torsion means), after rigid superposition
/// (spec.md §4.9). Only a local copy of the step's trace is mutated.
pub fn rmsd_to_closest_ntc(step: &StepMetrics, cluster: &Cluster) -> Result<f64, ClassificationError> {
    let reference_means = StepMetrics {
        delta_1: cluster.delta_1.mean,
        epsilon_1: cluster.epsilon_1.mean,
        zeta_1: cluster.zeta_1.mean,
        alpha_2: cluster.alpha_2.mean,
        beta_2: cluster.beta_2.mean,
        gamma_2: cluster.gamma_2.mean,
        delta_2: cluster.delta_2.mean,
        chi_1: cluster.chi_1.mean,
        chi_2: cluster.chi_2.mean,
        cc: cluster.cc.mean,
        nn: cluster.nn.mean,
        mu: cluster.mu.mean,
    };

    let mut movable = build_backbone_trace(step);
    let reference = build_backbone_trace(&reference_means);
    superpose(&mut movable, &reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::to_radians_f;

    fn sample_metrics(delta_1_deg: f64) -> StepMetrics {
        StepMetrics {
            delta_1: to_radians_f(delta_1_deg),
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
    fn identical_torsions_produce_zero_rmsd() {
        let metrics = sample_metrics(80.0);
        let a = build_backbone_trace(&metrics);
        let mut movable = a;
        let rmsd = superpose(&mut movable, &a).unwrap();
        assert!(rmsd < 1e-6);
    }

    #[test]
    fn differing_torsions_produce_nonzero_rmsd() {
        let a = build_backbone_trace(&sample_metrics(80.0));
        let b = build_backbone_trace(&sample_metrics(120.0));
        let mut movable = b;
        let rmsd = superpose(&mut movable, &a).unwrap();
        assert!(rmsd > 0.1);
    }

    #[test]
    fn trace_has_finite_coordinates() {
        let trace = build_backbone_trace(&sample_metrics(80.0));
        for p in trace {
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        }
    }
}
