//! Predicates for filtering [`Atom`](crate::Atom)s and atom pairs with plain iterators.
//!
//! Mirrors the teacher's `pdb_atom_filters` module: structs implementing
//! [`AtomPredicate`] are used as predicates while filtering Rust iterators over a
//! structure's atoms.

use crate::atom::Atom;
use crate::residue_id::ResidueId;

/// A single-atom predicate.
pub trait AtomPredicate {
    fn check(&self, a: &Atom) -> bool;
}

/// A two-atom predicate, used to test relationships between atoms of different residues.
pub trait AtomPredicate2 {
    fn check(&self, ai: &Atom, aj: &Atom) -> bool;
}

/// Returns `true` if an atom belongs to a given chain.
pub struct ByChain {
    chain_id: String,
}

impl ByChain {
    pub fn new(chain_id: &str) -> Self {
        ByChain { chain_id: chain_id.to_string() }
    }
}

impl AtomPredicate for ByChain {
    fn check(&self, a: &Atom) -> bool {
        a.auth_chain_id == self.chain_id
    }
}

/// Returns `true` if an atom belongs to a given residue.
pub struct ByResidue {
    res_id: ResidueId,
}

impl ByResidue {
    pub fn new(res_id: ResidueId) -> Self {
        ByResidue { res_id }
    }
}

impl AtomPredicate for ByResidue {
    fn check(&self, a: &Atom) -> bool {
        self.res_id.check(a)
    }
}

/// Returns `true` for the backbone atom named `P` (the phosphate atoms anchor steps).
pub struct IsPhosphate;

impl AtomPredicate for IsPhosphate {
    fn check(&self, a: &Atom) -> bool {
        a.auth_atom_name.trim() == "P"
    }
}

/// Returns `true` for an atom matching one of the five ribose ring atom names.
pub struct IsRiboseRingAtom;

const RIBOSE_RING_ATOMS: [&str; 5] = ["C1'", "C2'", "C3'", "C4'", "O4'"];

impl AtomPredicate for IsRiboseRingAtom {
    fn check(&self, a: &Atom) -> bool {
        RIBOSE_RING_ATOMS.contains(&a.auth_atom_name.trim())
    }
}

/// Returns `true` if both atoms belong to the same chain.
pub struct SameChain;

impl AtomPredicate2 for SameChain {
    fn check(&self, ai: &Atom, aj: &Atom) -> bool {
        ai.auth_chain_id == aj.auth_chain_id
    }
}

/// Returns `true` if both atoms belong to the same residue.
pub struct SameResidue;

impl AtomPredicate2 for SameResidue {
    fn check(&self, ai: &Atom, aj: &Atom) -> bool {
        ai.auth_chain_id == aj.auth_chain_id
            && ai.auth_seq_id == aj.auth_seq_id
            && ai.ins_code == aj.ins_code
            && ai.model_number == aj.model_number
    }
}

/// Returns `true` if the O3' of the first residue and the P of the second are within
/// 1.9 A, i.e. they form a phosphodiester-bonded dinucleotide step (spec.md §3, §4.2).
pub struct ArePhosphodiesterBonded;

const STEP_BOND_CUTOFF: f64 = 1.9;

impl ArePhosphodiesterBonded {
    /// Returns `Some(distance)` if `o3_prime` and `p` are within the bonding cutoff.
    pub fn check_distance(o3_prime: &Atom, p: &Atom) -> Option<f64> {
        let d = o3_prime.pos.distance_to(&p.pos);
        if d <= STEP_BOND_CUTOFF {
            Some(d)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{NO_ALT_ID, NO_INS_CODE};
    use crate::calc::Vec3;

    fn atom_at(name: &str, x: f64) -> Atom {
        Atom::new("C", name, "A", "DA", 1, NO_INS_CODE, 1, NO_ALT_ID, Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn by_chain_filters_correctly() {
        let mut a = atom_at("P", 0.0);
        a.auth_chain_id = "B".to_string();
        let b = atom_at("P", 1.0);
        let filt = ByChain::new("A");
        assert!(!filt.check(&a));
        assert!(filt.check(&b));
    }

    #[test]
    fn phosphodiester_bond_cutoff_is_inclusive() {
        let o3 = atom_at("O3'", 0.0);
        let p_in = atom_at("P", 1.9);
        let p_out = atom_at("P", 1.9000001);
        assert!(ArePhosphodiesterBonded::check_distance(&o3, &p_in).is_some());
        assert!(ArePhosphodiesterBonded::check_distance(&o3, &p_out).is_none());
    }
}
