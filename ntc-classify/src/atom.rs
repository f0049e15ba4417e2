//! The atomic record used throughout the classification engine.
//!
//! Grounded on the teacher's `PdbAtom` (`bioshell-pdb/src/pdb_atom.rs`), extended with the
//! label/auth identifier pairs and the explicit model number spec.md §3 requires — fields
//! the original C library's `LLKA_Atom` carries (`label_atom_id`/`auth_atom_id`,
//! `label_comp_id`/`auth_comp_id`, `label_asym_id`/`auth_asym_id`,
//! `label_seq_id`/`auth_seq_id`, `label_alt_id`, `pdbx_PDB_ins_code`,
//! `pdbx_PDB_model_num`), as confirmed by `structure.cpp`'s `atomMatchesCriteria()` and
//! `LLKA_appendAtomFromParams()`.

use crate::calc::Vec3;

/// Sentinel alternate-location code meaning "no alt-id", matching `LLKA_NO_ALTID`.
pub const NO_ALT_ID: char = ' ';

/// Sentinel insertion code meaning "no insertion code", matching `LLKA_NO_INSCODE`.
pub const NO_INS_CODE: char = ' ';

/// One atom: element, paired label/auth identifiers, model number, alt-id and coordinates.
///
/// Atoms are addressed by equality of (model, chain, seq, alt, residue-name, atom-name);
/// see [`Atom::addressing_key`].
#[derive(Clone, Debug)]
pub struct Atom {
    /// Chemical element symbol, e.g. "C", "N", "P".
    pub element: String,

    /// `label_atom_id` — the mmCIF-dictionary atom name, e.g. "O3'".
    pub label_atom_name: String,
    /// `auth_atom_id` — the author-provided atom name (often identical to label).
    pub auth_atom_name: String,

    /// `label_entity_id`.
    pub label_entity_id: String,

    /// `label_comp_id` — the residue/component name as assigned by the dictionary.
    pub label_comp_id: String,
    /// `auth_comp_id` — the author-provided residue name.
    pub auth_comp_id: String,

    /// `label_asym_id` — the dictionary chain identifier.
    pub label_chain_id: String,
    /// `auth_asym_id` — the author-provided chain identifier.
    pub auth_chain_id: String,

    /// `label_seq_id`.
    pub label_seq_id: i32,
    /// `auth_seq_id`.
    pub auth_seq_id: i32,

    /// `pdbx_PDB_ins_code`, [`NO_INS_CODE`] if absent.
    pub ins_code: char,

    /// `pdbx_PDB_model_num`.
    pub model_number: i32,

    /// `label_alt_id`, [`NO_ALT_ID`] if this atom is shared across alternate locations.
    pub alt_id: char,

    /// Cartesian position.
    pub pos: Vec3,
}

/// The identity key atoms are addressed and compared by (spec.md §3).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtomKey {
    pub model_number: i32,
    pub chain_id: String,
    pub seq_id: i32,
    pub alt_id: char,
    pub comp_id: String,
    pub atom_name: String,
}

impl Atom {
    /// Convenience constructor using the *auth* identifiers for both label and auth
    /// fields — the common case when a caller has only one naming scheme available.
    pub fn new(
        element: &str,
        atom_name: &str,
        chain_id: &str,
        comp_id: &str,
        seq_id: i32,
        ins_code: char,
        model_number: i32,
        alt_id: char,
        pos: Vec3,
    ) -> Self {
        Atom {
            element: element.to_string(),
            label_atom_name: atom_name.to_string(),
            auth_atom_name: atom_name.to_string(),
            label_entity_id: String::new(),
            label_comp_id: comp_id.to_string(),
            auth_comp_id: comp_id.to_string(),
            label_chain_id: chain_id.to_string(),
            auth_chain_id: chain_id.to_string(),
            label_seq_id: seq_id,
            auth_seq_id: seq_id,
            ins_code,
            model_number,
            alt_id,
            pos,
        }
    }

    /// The (model, chain, seq, alt, comp, atom-name) key this atom is addressed by.
    ///
    /// Uses the *auth* identifiers, which is what residue segmentation and step
    /// extraction operate on: the author-provided numbering is what keeps chains and
    /// residues contiguous across most real-world depositions.
    pub fn addressing_key(&self) -> AtomKey {
        AtomKey {
            model_number: self.model_number,
            chain_id: self.auth_chain_id.clone(),
            seq_id: self.auth_seq_id,
            alt_id: self.alt_id,
            comp_id: self.auth_comp_id.clone(),
            atom_name: self.auth_atom_name.clone(),
        }
    }

    /// `true` if this atom's alt-id is the sentinel, i.e. it is shared by every
    /// alternate-location variant of its residue.
    pub fn is_shared_alt(&self) -> bool {
        self.alt_id == NO_ALT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addressing_key_uses_auth_identifiers() {
        let a = Atom::new("P", "P", "A", "DA", 11, NO_INS_CODE, 1, NO_ALT_ID, Vec3::from_float(0.0));
        let key = a.addressing_key();
        assert_eq!(key.chain_id, "A");
        assert_eq!(key.seq_id, 11);
        assert_eq!(key.atom_name, "P");
    }

    #[test]
    fn sentinel_alt_id_is_shared() {
        let a = Atom::new("C", "C1'", "A", "DA", 1, NO_INS_CODE, 1, NO_ALT_ID, Vec3::from_float(0.0));
        assert!(a.is_shared_alt());
        let mut b = a.clone();
        b.alt_id = 'A';
        assert!(!b.is_shared_alt());
    }
}
