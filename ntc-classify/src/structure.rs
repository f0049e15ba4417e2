//! Structure segmentation: residue detection, alternate-location splitting and dinucleotide
//! step extraction (spec.md §3, §4.2).
//!
//! Grounded on the teacher's windowed `SameResidue`/`SameChain` bucketing
//! (`bioshell-pdb/src/structure.rs`), generalised from protein residues to nucleotide
//! steps and rebuilt on top of [`Atom`] instead of `PdbAtom`.

use crate::atom::{Atom, NO_ALT_ID};
use crate::atom_filters::ArePhosphodiesterBonded;
use crate::nucleotide::is_known_nucleotide;
use crate::residue_id::ResidueId;

/// An ordered sequence of atoms, either owning them (as a full [`Structure`]) or merely
/// borrowing them from a backing structure (see [`StructureView`]).
#[derive(Clone, Debug, Default)]
pub struct Structure {
    atoms: Vec<Atom>,
}

impl Structure {
    pub fn new() -> Self {
        Structure { atoms: Vec::new() }
    }

    /// Builds a [`Structure`] from atoms cloned out of an iterator, preserving order.
    pub fn from_iterator<'a, T: Iterator<Item = &'a Atom>>(iter: T) -> Structure {
        Structure { atoms: iter.cloned().collect() }
    }

    pub fn push_atom(&mut self, a: Atom) {
        self.atoms.push(a);
    }

    pub fn count_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &Vec<Atom> {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.atoms
    }

    pub fn atom(&self, res_id: &ResidueId, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| {
            a.auth_chain_id == res_id.chain_id
                && a.auth_seq_id == res_id.res_seq
                && a.ins_code == res_id.i_code
                && a.auth_atom_name.trim() == name
        })
    }

    /// Splits this structure into its residues (contiguous runs of atoms sharing model,
    /// chain and `label_seq_id`; spec.md §4.2).
    pub fn residues(&self) -> Vec<Vec<Atom>> {
        group_into_residues(&self.atoms)
    }

    /// Produces a view of every alternate-location variant of this structure.
    ///
    /// If there are no non-sentinel alt-ids, returns a single view identical to `self`
    /// tagged with the sentinel. Otherwise returns one view per distinct alt-id, each
    /// containing every atom whose alt-id is either that id or the sentinel
    /// (spec.md §4.2).
    pub fn alt_id_split(&self) -> Vec<(Structure, char)> {
        alt_id_split(&self.atoms)
    }
}

/// A borrowed, non-owning view over atoms of a source [`Structure`].
///
/// A view never outlives its source (spec.md §3); the view's atoms stay in the same
/// relative order as in the source.
pub struct StructureView<'a> {
    atoms: Vec<&'a Atom>,
}

impl<'a> StructureView<'a> {
    pub fn new(atoms: Vec<&'a Atom>) -> Self {
        StructureView { atoms }
    }

    pub fn atoms(&self) -> &[&'a Atom] {
        &self.atoms
    }
}

/// Groups a flat atom slice into contiguous residues by (model, chain, `label_seq_id`).
fn group_into_residues(atoms: &[Atom]) -> Vec<Vec<Atom>> {
    let mut residues: Vec<Vec<Atom>> = Vec::new();
    for a in atoms {
        let starts_new = match residues.last() {
            None => true,
            Some(current) => {
                let head = &current[0];
                head.model_number != a.model_number
                    || head.label_chain_id != a.label_chain_id
                    || head.label_seq_id != a.label_seq_id
            }
        };
        if starts_new {
            residues.push(vec![a.clone()]);
        } else {
            residues.last_mut().unwrap().push(a.clone());
        }
    }
    residues
}

fn alt_id_split(atoms: &[Atom]) -> Vec<(Structure, char)> {
    let mut alt_ids: Vec<char> = atoms.iter().map(|a| a.alt_id).filter(|&c| c != NO_ALT_ID).collect();
    alt_ids.sort_unstable();
    alt_ids.dedup();

    if alt_ids.is_empty() {
        return vec![(Structure { atoms: atoms.to_vec() }, NO_ALT_ID)];
    }

    alt_ids
        .into_iter()
        .map(|id| {
            let variant: Vec<Atom> =
                atoms.iter().filter(|a| a.alt_id == id || a.alt_id == NO_ALT_ID).cloned().collect();
            (Structure { atoms: variant }, id)
        })
        .collect()
}

/// Extracts dinucleotide steps from a flat atom sequence (spec.md §3, §4.2).
///
/// Non-nucleotide residues are dropped from consideration without breaking the scan
/// across chains; residues missing O3' or P are silently skipped as step partners.
/// Returns steps in the order they were produced.
pub fn extract_dinucleotide_steps(atoms: &[Atom]) -> Vec<Structure> {
    let residues = group_into_residues(atoms);
    let mut steps = Vec::new();

    let mut prev: Option<&Vec<Atom>> = None;
    for residue in &residues {
        let comp_id = residue[0].auth_comp_id.trim();
        if !is_known_nucleotide(comp_id) {
            continue;
        }
        if let Some(prev_residue) = prev {
            if prev_residue[0].label_chain_id == residue[0].label_chain_id
                && prev_residue[0].model_number == residue[0].model_number
            {
                steps.extend(steps_between(prev_residue, residue));
            }
        }
        prev = Some(residue);
    }

    steps
}

fn steps_between(r: &[Atom], r_next: &[Atom]) -> Vec<Structure> {
    let mut out = Vec::new();
    for (variant_r, _) in alt_id_split(r) {
        let o3 = match variant_r.atoms().iter().find(|a| a.auth_atom_name.trim() == "O3'") {
            Some(a) => a.clone(),
            None => continue,
        };
        for (variant_rn, _) in alt_id_split(r_next) {
            let p = match variant_rn.atoms().iter().find(|a| a.auth_atom_name.trim() == "P") {
                Some(a) => a.clone(),
                None => continue,
            };
            if ArePhosphodiesterBonded::check_distance(&o3, &p).is_some() {
                let mut step = Structure::new();
                for a in variant_r.atoms() {
                    step.push_atom(a.clone());
                }
                for a in variant_rn.atoms() {
                    step.push_atom(a.clone());
                }
                out.push(step);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{NO_ALT_ID, NO_INS_CODE};
    use crate::calc::Vec3;

    fn atom(name: &str, comp: &str, seq: i32, pos: Vec3) -> Atom {
        Atom::new("C", name, "A", comp, seq, NO_INS_CODE, 1, NO_ALT_ID, pos)
    }

    #[test]
    fn residue_grouping_splits_on_seq_change() {
        let atoms = vec![
            atom("C1'", "DA", 1, Vec3::from_float(0.0)),
            atom("C2'", "DA", 1, Vec3::from_float(0.0)),
            atom("C1'", "DA", 2, Vec3::from_float(0.0)),
        ];
        let residues = group_into_residues(&atoms);
        assert_eq!(residues.len(), 2);
        assert_eq!(residues[0].len(), 2);
    }

    #[test]
    fn step_extracted_when_o3_p_within_cutoff() {
        let mut r1 = atom("O3'", "DA", 1, Vec3::new(0.0, 0.0, 0.0));
        r1.label_seq_id = 1;
        let mut r2 = atom("P", "DC", 2, Vec3::new(1.0, 0.0, 0.0));
        r2.label_seq_id = 2;
        let atoms = vec![r1, r2];
        let steps = extract_dinucleotide_steps(&atoms);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].count_atoms(), 2);
    }

    #[test]
    fn non_nucleotide_residue_is_skipped_without_breaking_the_scan() {
        let mut r1 = atom("O3'", "DA", 1, Vec3::new(0.0, 0.0, 0.0));
        r1.label_seq_id = 1;
        let mut water = atom("O", "HOH", 2, Vec3::new(10.0, 10.0, 10.0));
        water.label_seq_id = 2;
        let mut r2 = atom("P", "DC", 3, Vec3::new(1.0, 0.0, 0.0));
        r2.label_seq_id = 3;
        let atoms = vec![r1, water, r2];
        let steps = extract_dinucleotide_steps(&atoms);
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn distant_atoms_do_not_form_a_step() {
        let mut r1 = atom("O3'", "DA", 1, Vec3::new(0.0, 0.0, 0.0));
        r1.label_seq_id = 1;
        let mut r2 = atom("P", "DC", 2, Vec3::new(100.0, 0.0, 0.0));
        r2.label_seq_id = 2;
        let atoms = vec![r1, r2];
        assert!(extract_dinucleotide_steps(&atoms).is_empty());
    }
}
