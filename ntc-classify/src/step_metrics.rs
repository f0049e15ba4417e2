//! Per-step geometric measurement: the nine backbone torsions plus the CC/NN/μ
//! cross-residue metrics a dinucleotide step is classified on (spec.md §3, §4.4).
//!
//! Grounded on the teacher's own torsion-measurement idiom (`calc::geometry::dihedral`,
//! built on `Vec3::dihedral_angle4`) and on `original_source/src/nucleotide.cpp`'s
//! `calculateStepMetrics()`/`calculateCrossResidueMetrics()`, which define CC and NN as
//! the plain Euclidean `C1'`-`C1'` and glycosidic-nitrogen-to-glycosidic-nitrogen
//! distances, and μ as the `C1'_i - N_i - N_i+1 - C1'_i+1` dihedral spanning the step.

use crate::atom::Atom;
use crate::calc::{dihedral, distance, Vec3};
use crate::error::ClassificationError;
use crate::nucleotide::{base_kind_of, extract_ribose_ring, is_purine, nu_torsions, pseudorotation, SugarPucker};
use crate::residue_id::ResidueId;
use crate::structure::Structure;

/// The glycosidic nitrogen used by CC/NN and the χ torsion differs between purines
/// (`N9`) and pyrimidines (`N1`).
fn glycosidic_nitrogen(is_purine: bool) -> &'static str {
    if is_purine {
        "N9"
    } else {
        "N1"
    }
}

/// χ is defined over `O4'-C1'-N9-C4` for purines and `O4'-C1'-N1-C2` for pyrimidines.
fn chi_base_atom(is_purine: bool) -> &'static str {
    if is_purine {
        "C4"
    } else {
        "C2"
    }
}

/// The nine backbone torsions and three cross-residue metrics a dinucleotide step is
/// classified on, in the fixed column order the reference library uses
/// (spec.md §6's `ClustersSchema`/`GoldenStepsSchema`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepMetrics {
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
}

impl StepMetrics {
    /// The nine torsions, in the order `[delta_1, epsilon_1, zeta_1, alpha_2, beta_2,
    /// gamma_2, delta_2, chi_1, chi_2]` — the order nearest-neighbour search and voting
    /// iterate over (spec.md §4.6, §4.7).
    pub fn torsions(&self) -> [f64; 9] {
        [
            self.delta_1,
            self.epsilon_1,
            self.zeta_1,
            self.alpha_2,
            self.beta_2,
            self.gamma_2,
            self.delta_2,
            self.chi_1,
            self.chi_2,
        ]
    }
}

/// The ν-torsion bundle and pseudorotation phase/amplitude of a single ribose ring,
/// plus its discretised sugar pucker (spec.md §3 "Nu-angle bundle").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NuAngles {
    pub nu: [f64; 5],
    pub pseudorotation_phase: f64,
    pub tau_max: f64,
    pub sugar_pucker: SugarPucker,
}

fn nu_angles_of(residue_atoms: &[Atom]) -> Result<NuAngles, ClassificationError> {
    let ring = extract_ribose_ring(residue_atoms)?;
    let nu = nu_torsions(&ring);
    let (p, tau_max) = pseudorotation(&nu);
    Ok(NuAngles { nu, pseudorotation_phase: p, tau_max, sugar_pucker: SugarPucker::from_phase(p) })
}

/// Splits a two-residue step [`Structure`] into its constituent residues' atom slices,
/// in step order (5'-residue first).
fn split_step_residues(step: &Structure) -> Result<(Vec<Atom>, Vec<Atom>), ClassificationError> {
    let residues = step.residues();
    if residues.len() != 2 {
        return Err(ClassificationError::BadGeometry);
    }
    let mut iter = residues.into_iter();
    let r1 = iter.next().unwrap();
    let r2 = iter.next().unwrap();
    Ok((r1, r2))
}

fn find_atom<'a>(atoms: &'a [Atom], name: &str) -> Result<&'a Atom, ClassificationError> {
    atoms.iter().find(|a| a.auth_atom_name.trim() == name).ok_or(ClassificationError::MissingAtoms)
}

/// Measures the nine backbone torsions and the CC/NN/μ cross-residue metrics of a
/// dinucleotide step (spec.md §4.4).
///
/// `step` must contain exactly two residues, the 5'-residue followed by the 3'-residue
/// (the order [`crate::structure::extract_dinucleotide_steps`] produces).
pub fn measure_step_metrics(step: &Structure) -> Result<StepMetrics, ClassificationError> {
    let (r1, r2) = split_step_residues(step)?;

    let kind_1 = base_kind_of(r1[0].auth_comp_id.trim()).ok_or(ClassificationError::BadGeometry)?;
    let kind_2 = base_kind_of(r2[0].auth_comp_id.trim()).ok_or(ClassificationError::BadGeometry)?;
    let purine_1 = is_purine(kind_1);
    let purine_2 = is_purine(kind_2);

    let c5_1 = find_atom(&r1, "C5'")?.pos;
    let c4_1 = find_atom(&r1, "C4'")?.pos;
    let c3_1 = find_atom(&r1, "C3'")?.pos;
    let o3_1 = find_atom(&r1, "O3'")?.pos;
    let o4_1 = find_atom(&r1, "O4'")?.pos;
    let c1_1 = find_atom(&r1, "C1'")?.pos;
    let n_1 = find_atom(&r1, glycosidic_nitrogen(purine_1))?.pos;
    let chi_base_1 = find_atom(&r1, chi_base_atom(purine_1))?.pos;

    let p_2 = find_atom(&r2, "P")?.pos;
    let o5_2 = find_atom(&r2, "O5'")?.pos;
    let c5_2 = find_atom(&r2, "C5'")?.pos;
    let c4_2 = find_atom(&r2, "C4'")?.pos;
    let c3_2 = find_atom(&r2, "C3'")?.pos;
    let o3_2 = find_atom(&r2, "O3'")?.pos;
    let o4_2 = find_atom(&r2, "O4'")?.pos;
    let c1_2 = find_atom(&r2, "C1'")?.pos;
    let n_2 = find_atom(&r2, glycosidic_nitrogen(purine_2))?.pos;
    let chi_base_2 = find_atom(&r2, chi_base_atom(purine_2))?.pos;

    let delta_1 = dihedral(&c5_1, &c4_1, &c3_1, &o3_1)?;
    let epsilon_1 = dihedral(&c4_1, &c3_1, &o3_1, &p_2)?;
    let zeta_1 = dihedral(&c3_1, &o3_1, &p_2, &o5_2)?;
    let alpha_2 = dihedral(&o3_1, &p_2, &o5_2, &c5_2)?;
    let beta_2 = dihedral(&p_2, &o5_2, &c5_2, &c4_2)?;
    let gamma_2 = dihedral(&o5_2, &c5_2, &c4_2, &c3_2)?;
    let delta_2 = dihedral(&c5_2, &c4_2, &c3_2, &o3_2)?;
    let chi_1 = dihedral(&o4_1, &c1_1, &n_1, &chi_base_1)?;
    let chi_2 = dihedral(&o4_2, &c1_2, &n_2, &chi_base_2)?;

    let cc = distance(&c1_1, &c1_2)?;
    let nn = distance(&n_1, &n_2)?;
    let mu = dihedral(&c1_1, &n_1, &n_2, &c1_2)?;

    Ok(StepMetrics {
        delta_1,
        epsilon_1,
        zeta_1,
        alpha_2,
        beta_2,
        gamma_2,
        delta_2,
        chi_1,
        chi_2,
        cc,
        nn,
        mu,
    })
}

/// Measures the ν-angle bundle of both residues of a dinucleotide step.
pub fn measure_nu_angles(step: &Structure) -> Result<(NuAngles, NuAngles), ClassificationError> {
    let (r1, r2) = split_step_residues(step)?;
    Ok((nu_angles_of(&r1)?, nu_angles_of(&r2)?))
}

/// Resolves the (5'-residue, 3'-residue) [`ResidueId`]s of a dinucleotide step, as
/// reported in a [`crate::ClassifiedStep`] for traceability back to the input structure.
pub fn step_residue_ids(step: &Structure) -> Result<(ResidueId, ResidueId), ClassificationError> {
    let (r1, r2) = split_step_residues(step)?;
    Ok((ResidueId::from(&r1[0]), ResidueId::from(&r2[0])))
}
