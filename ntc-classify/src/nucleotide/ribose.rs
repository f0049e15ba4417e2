//! Ribose ring extraction, ν-torsion computation and pseudorotation analysis (spec.md §4.3).
//!
//! Grounded on `original_source/src/nucleotide.cpp`'s `pseudorotationCircular()` /
//! `P()`-style computation of the Altona-Sundaralingam pseudorotation phase, and on the
//! teacher's dihedral-via-`Vec3` approach (`calc::vec3::dihedral_angle4`).

use crate::atom::Atom;
use crate::calc::{dihedral_angle4, Vec3};
use crate::error::ClassificationError;

/// The five ribose ring atom names, in analysis order `[C4', O4', C1', C2', C3']`.
const RIBOSE_ATOM_ORDER: [&str; 5] = ["C4'", "O4'", "C1'", "C2'", "C3'"];

/// Locates the five ribose ring atoms of a residue (given as a slice of its atoms) and
/// returns their coordinates in `[C4', O4', C1', C2', C3']` order.
pub fn extract_ribose_ring(residue_atoms: &[Atom]) -> Result<[Vec3; 5], ClassificationError> {
    let mut found: [Option<Vec3>; 5] = [None, None, None, None, None];
    for a in residue_atoms {
        let name = a.auth_atom_name.trim();
        if let Some(idx) = RIBOSE_ATOM_ORDER.iter().position(|&n| n == name) {
            found[idx] = Some(a.pos);
        }
    }
    let mut out = [Vec3::from_float(0.0); 5];
    for (i, slot) in found.into_iter().enumerate() {
        out[i] = slot.ok_or(ClassificationError::MissingAtoms)?;
    }
    Ok(out)
}

/// Computes the five ν torsions (ν0..ν4) of a ribose ring given in `[C4', O4', C1', C2',
/// C3']` order: `nu_i` is the dihedral of the cyclic quadruple `(i, i+1, i+2, i+3) mod 5`.
pub fn nu_torsions(ring: &[Vec3; 5]) -> [f64; 5] {
    let mut nu = [0.0; 5];
    for i in 0..5 {
        let a = ring[i % 5];
        let b = ring[(i + 1) % 5];
        let c = ring[(i + 2) % 5];
        let d = ring[(i + 3) % 5];
        nu[i] = dihedral_angle4(&a, &b, &c, &d);
    }
    nu
}

const SIN_36: f64 = 0.587_785_252_292_473_1;
const SIN_72: f64 = 0.951_056_516_295_153_6;
const NU2_EPSILON: f64 = 5e-5;

/// Pseudorotation phase `P` (in `[0, 2π)`) and amplitude `τ_max`, per the
/// Altona-Sundaralingam convention (spec.md §4.3).
pub fn pseudorotation(nu: &[f64; 5]) -> (f64, f64) {
    let mut nu2 = nu[2];
    if nu2.abs() < NU2_EPSILON {
        nu2 = NU2_EPSILON.copysign(nu2);
    }

    let tan_p = (nu[4] + nu[1] - nu[3] - nu[0]) / (2.0 * nu2 * (SIN_36 + SIN_72));
    let mut p = tan_p.atan();
    if nu2 < 0.0 {
        p += std::f64::consts::PI;
    } else if tan_p < 0.0 {
        p += 2.0 * std::f64::consts::PI;
    }

    let tau_max = (nu2 / p.cos()).abs();
    (p, tau_max)
}

/// The ten sugar-pucker conformations, in the fixed bin order spec.md §4.3 assigns them
/// (each bin is 36° wide, starting at P = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SugarPucker {
    C3EndoEndo,
    C4Exo,
    O4Endo,
    C1Exo,
    C2Endo,
    C3Exo,
    C4Endo,
    O4Exo,
    C1Endo,
    C2Exo,
}

const SUGAR_PUCKER_ORDER: [SugarPucker; 10] = [
    SugarPucker::C3EndoEndo,
    SugarPucker::C4Exo,
    SugarPucker::O4Endo,
    SugarPucker::C1Exo,
    SugarPucker::C2Endo,
    SugarPucker::C3Exo,
    SugarPucker::C4Endo,
    SugarPucker::O4Exo,
    SugarPucker::C1Endo,
    SugarPucker::C2Exo,
];

impl SugarPucker {
    /// Discretises a pseudorotation phase (in `[0, 2π)`, radians) into its sugar-pucker bin.
    pub fn from_phase(p_radians: f64) -> SugarPucker {
        let degrees = p_radians.to_degrees().rem_euclid(360.0);
        let bin = (degrees / 36.0).floor() as usize;
        SUGAR_PUCKER_ORDER[bin.min(9)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{NO_ALT_ID, NO_INS_CODE};

    fn ring_atom(name: &str, pos: Vec3) -> Atom {
        Atom::new("C", name, "A", "DA", 1, NO_INS_CODE, 1, NO_ALT_ID, pos)
    }

    #[test]
    fn extraction_fails_when_an_atom_is_missing() {
        let atoms = vec![
            ring_atom("C4'", Vec3::new(0.0, 0.0, 0.0)),
            ring_atom("O4'", Vec3::new(1.0, 0.0, 0.0)),
        ];
        assert!(matches!(extract_ribose_ring(&atoms), Err(ClassificationError::MissingAtoms)));
    }

    #[test]
    fn sugar_pucker_bins_cover_full_circle() {
        assert_eq!(SugarPucker::from_phase(0.0), SugarPucker::C3EndoEndo);
        assert_eq!(SugarPucker::from_phase(std::f64::consts::PI), SugarPucker::C4Endo);
        let almost_2pi = 2.0 * std::f64::consts::PI - 0.0001;
        assert_eq!(SugarPucker::from_phase(almost_2pi), SugarPucker::C2Exo);
    }

    #[test]
    fn pseudorotation_near_zero_nu2_does_not_panic() {
        let nu = [0.1, 0.2, 0.0, -0.2, -0.1];
        let (p, tau) = pseudorotation(&nu);
        assert!(p.is_finite());
        assert!(tau.is_finite());
    }
}
