//! Semantic tolerance-check outcomes on an otherwise successfully classified step
//! (spec.md §3, §6, §7).
//!
//! `Violations` carries every check a classified step can fail without that failure
//! being a procedural error: the step still has a closest cluster, an RMSD and a confal
//! score, it just also failed one or more tolerance checks. Grounded on the complete
//! flag name list recovered from `original_source/src/classification.cpp`'s
//! `LLKA_classificationViolationToName()`; `bitflags` is adopted from the pack's
//! `freddiehaddad-oxidized` example, since the teacher itself has no bit-flag type and
//! hand-rolling one would mean abandoning the ecosystem's idiom for it.

use bitflags::bitflags;

bitflags! {
    /// Bit-flags recording which tolerance checks a classified step failed.
    ///
    /// An all-zero value means every check passed cleanly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Violations: u32 {
        /// Fewer than [`crate::context::ClassificationLimits::minimum_nearest_neighbors`]
        /// valid neighbours were found.
        const NOT_ENOUGH_NEAREST_NEIGHBORS = 1 << 0;
        /// The circular mean of the valid neighbours' torsions differs from the step's
        /// own torsions by more than `average_neighbors_torsion_cutoff` on at least one
        /// torsion (see [`Self::violating_torsions_average`]-style detail masks stored
        /// alongside this value on [`crate::classified_step::ClassifiedStep`]).
        const AVG_NEIGHBOURS_TORSIONS_TOO_DIFFERENT = 1 << 1;
        /// The single nearest neighbour's torsions differ from the step's own by more
        /// than `nearest_neighbor_torsions_cutoff` on at least one torsion.
        const NEIGHBOUR_TORSIONS_TOO_DIFFERENT = 1 << 2;
        const CC_TOO_LOW = 1 << 3;
        const CC_TOO_HIGH = 1 << 4;
        const NN_TOO_LOW = 1 << 5;
        const NN_TOO_HIGH = 1 << 6;
        const MU_TOO_LOW = 1 << 7;
        const MU_TOO_HIGH = 1 << 8;
        const TOTAL_DISTANCE_TOO_HIGH = 1 << 9;
        const FIRST_PSEUDOROTATION_TOO_DIFFERENT = 1 << 10;
        const SECOND_PSEUDOROTATION_TOO_DIFFERENT = 1 << 11;
        const BEST_CLUSTER_DOES_NOT_HAVE_ENOUGH_VOTES = 1 << 12;
        /// Both steps' δ torsions fall outside `(55°, 185°)`, the pre-gate that the
        /// original rejects before even attempting a nearest-neighbour search.
        const DELTA_TORSION_ANGLE_REJECTED = 1 << 13;
        /// No candidate cluster could be found at all; the step's closest-NtC fields are
        /// meaningless. See `DESIGN.md` for why this crate surfaces this case as
        /// [`crate::error::ClassificationError::WrongMetrics`] rather than as a
        /// violation flag on an otherwise-valid `ClassifiedStep`, unlike the original.
        const WRONG_METRICS = 1 << 14;
        /// A legacy flag kept for name-table completeness; no check in this engine
        /// (or, per the retrieved sources, in the original) ever sets it.
        const SCORE_TOO_LOW = 1 << 15;
        /// The step was assigned no cluster by voting, but its nearest neighbour was
        /// close enough that not flagging it at all would be misleading.
        const UNASSIGNED_BUT_CLOSE_ENOUGH = 1 << 16;
    }
}

impl Violations {
    /// `true` if this step classified cleanly, with no tolerance failures at all.
    pub fn is_ok(self) -> bool {
        self.is_empty()
    }
}

/// One bit per backbone torsion (bit 0 = δ₁) in the fixed order
/// `[δ₁, ε₁, ζ₁, α₂, β₂, γ₂, δ₂, χ₁, χ₂]`, used by
/// [`Violations::AVG_NEIGHBOURS_TORSIONS_TOO_DIFFERENT`]/
/// [`Violations::NEIGHBOUR_TORSIONS_TOO_DIFFERENT`] to report exactly which torsion(s)
/// exceeded tolerance (spec.md §9).
pub type TorsionViolationMask = u16;

/// Torsion index constants for building/reading a [`TorsionViolationMask`].
pub mod torsion_bit {
    pub const DELTA_1: u8 = 0;
    pub const EPSILON_1: u8 = 1;
    pub const ZETA_1: u8 = 2;
    pub const ALPHA_2: u8 = 3;
    pub const BETA_2: u8 = 4;
    pub const GAMMA_2: u8 = 5;
    pub const DELTA_2: u8 = 6;
    pub const CHI_1: u8 = 7;
    pub const CHI_2: u8 = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_violations_is_ok() {
        assert!(Violations::empty().is_ok());
        assert!(!Violations::CC_TOO_LOW.is_ok());
    }

    #[test]
    fn flags_compose_with_bitor() {
        let v = Violations::CC_TOO_LOW | Violations::MU_TOO_HIGH;
        assert!(v.contains(Violations::CC_TOO_LOW));
        assert!(v.contains(Violations::MU_TOO_HIGH));
        assert!(!v.contains(Violations::NN_TOO_LOW));
    }

    #[test]
    fn torsion_bit_constants_are_distinct_and_in_range() {
        let bits = [
            torsion_bit::DELTA_1, torsion_bit::EPSILON_1, torsion_bit::ZETA_1,
            torsion_bit::ALPHA_2, torsion_bit::BETA_2, torsion_bit::GAMMA_2,
            torsion_bit::DELTA_2, torsion_bit::CHI_1, torsion_bit::CHI_2,
        ];
        for &b in &bits {
            assert!(b < 9);
        }
        let mut sorted = bits;
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), bits.len());
    }
}
