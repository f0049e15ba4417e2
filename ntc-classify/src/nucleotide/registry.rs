//! Fixed registry mapping residue component names to their nucleobase kind (spec.md §4.2).
//!
//! Grounded on the teacher's `ResidueTypeManager` (`bioshell-seq/src/chemical/residue_types.rs`):
//! a lazily-built lookup table keyed by the three-letter residue code. Unlike that manager,
//! this registry is fixed at compile time — no amino-acid chemistry and no runtime
//! registration are needed here, only the handful of standard and common modified
//! nucleotide names a structure segmenter must recognise.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The nucleobase a residue carries, independent of whether it is a deoxy- or
/// ribonucleotide (the sugar is determined separately by ribose analysis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    AdenineLike,
    GuanineLike,
    CytosineLike,
    UracilLike,
    ThymineLike,
}

static BASE_KIND_REGISTRY: Lazy<HashMap<&'static str, BaseKind>> = Lazy::new(|| {
    use BaseKind::*;
    HashMap::from([
        ("DA", AdenineLike), ("A", AdenineLike), ("ADE", AdenineLike), ("1MA", AdenineLike),
        ("DG", GuanineLike), ("G", GuanineLike), ("GUA", GuanineLike), ("OMG", GuanineLike),
        ("DC", CytosineLike), ("C", CytosineLike), ("CYT", CytosineLike), ("5MC", CytosineLike),
        ("DU", UracilLike), ("U", UracilLike), ("URA", UracilLike), ("PSU", UracilLike),
        ("DT", ThymineLike), ("T", ThymineLike), ("THY", ThymineLike),
    ])
});

/// Looks up the base kind of a residue by its component name, trying the `auth_comp_id`
/// first. Returns `None` for anything not in the fixed registry — such residues are
/// treated as non-nucleotide and skipped during structure segmentation.
pub fn base_kind_of(comp_id: &str) -> Option<BaseKind> {
    BASE_KIND_REGISTRY.get(comp_id.trim()).copied()
}

/// `true` if a residue name is recognised as a nucleotide of any kind.
pub fn is_known_nucleotide(comp_id: &str) -> bool {
    base_kind_of(comp_id).is_some()
}

/// `true` if the residue is one of the two-ring purine bases (adenine or guanine), which
/// share the same χ-torsion atom naming (`N9`-based) distinct from pyrimidines (`N1`-based).
pub fn is_purine(kind: BaseKind) -> bool {
    matches!(kind, BaseKind::AdenineLike | BaseKind::GuanineLike)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_standard_dna_and_rna_codes() {
        assert_eq!(base_kind_of("DA"), Some(BaseKind::AdenineLike));
        assert_eq!(base_kind_of("G"), Some(BaseKind::GuanineLike));
        assert_eq!(base_kind_of(" DT "), Some(BaseKind::ThymineLike));
    }

    #[test]
    fn unknown_residue_is_not_a_nucleotide() {
        assert!(!is_known_nucleotide("HOH"));
        assert!(!is_known_nucleotide("ALA"));
    }

    #[test]
    fn purine_classification() {
        assert!(is_purine(BaseKind::AdenineLike));
        assert!(!is_purine(BaseKind::CytosineLike));
    }
}
