//! Naming: the 96 NtC conformational classes, their CANA coarse groupings, and the
//! sugar-pucker brevity/fancy name tables (spec.md §3, §6).
//!
//! The 96 class names are grounded on the color-bucket map in the teacher's sibling GUI
//! tool (`gui_assigner/src/ui/models/ntc_colors.h`), the only place in the retrieved
//! corpus the complete name set survives. That file is a `std::map<std::string,
//! std::pair<Color,Color>>` literal; the order the names are *written* in is not
//! evidence of the real `LLKA_NtC` enum's integer values (`std::map` is key-sorted at
//! runtime regardless of initializer order), so the ordinal each name is assigned below
//! is an invented, fixed convention — alphabetical by name, `Invalid` first — documented
//! here and in `DESIGN.md` rather than claimed as a reproduction of the unpublished
//! original ordinals.
//!
//! CANA is derived from the same file's per-class color pair: a class colored with
//! `Syn` on either side is classified `Cana::Syn`; otherwise its coarse class follows
//! the first color's bucket. This is a grounded-but-invented resolution of CANA's
//! missing name table, not a reproduction of the original's (unrecovered) values.

use std::fmt;

use crate::nucleotide::SugarPucker;

/// The ten sugar-pucker names in each of the three registers the reference library and
/// its CSV loaders use, in [`SugarPucker`]'s fixed bin order (verbatim from
/// `original_source/src/nucleotide.hpp`'s `SUGAR_PUCKER_NAMES_*` tables).
const SUGAR_PUCKER_VERY_TERSE: [&str; 10] =
    ["C3end", "C4exo", "O4end", "C1exo", "C2end", "C3exo", "C4end", "O4exo", "C1end", "C2exo"];
const SUGAR_PUCKER_TERSE: [&str; 10] = [
    "C3endo", "C4exo", "O4endo", "C1exo", "C2endo", "C3exo", "C4endo", "O4exo", "C1endo", "C2exo",
];
const SUGAR_PUCKER_FANCY: [&str; 10] = [
    "C3' endo", "C4' exo", "O4' endo", "C1' exo", "C2' endo", "C3' exo", "C4' endo", "O4' exo",
    "C1' endo", "C2' exo",
];

/// Extension methods giving [`SugarPucker`] its three name registers and a tolerant
/// reverse lookup, without redefining the enum the ribose-analysis module already owns.
pub trait SugarPuckerNames {
    fn name_very_terse(self) -> &'static str;
    fn name_terse(self) -> &'static str;
    fn name_fancy(self) -> &'static str;
    fn from_name(name: &str) -> Option<SugarPucker>;
}

fn pucker_bin(p: SugarPucker) -> usize {
    use SugarPucker::*;
    match p {
        C3EndoEndo => 0, C4Exo => 1, O4Endo => 2, C1Exo => 3, C2Endo => 4,
        C3Exo => 5, C4Endo => 6, O4Exo => 7, C1Endo => 8, C2Exo => 9,
    }
}

impl SugarPuckerNames for SugarPucker {
    fn name_very_terse(self) -> &'static str {
        SUGAR_PUCKER_VERY_TERSE[pucker_bin(self)]
    }

    fn name_terse(self) -> &'static str {
        SUGAR_PUCKER_TERSE[pucker_bin(self)]
    }

    fn name_fancy(self) -> &'static str {
        SUGAR_PUCKER_FANCY[pucker_bin(self)]
    }

    /// Tolerant reverse lookup matching `original_source/src/nucleotide.hpp`'s
    /// `NAME_TO_SUGAR_PUCKER_MAPPING`: accepts every terse/very-terse/fancy spelling
    /// plus the historical `O1end`/`O1exo`-style alternates for the two `O4'` puckers.
    fn from_name(name: &str) -> Option<SugarPucker> {
        use SugarPucker::*;
        let n = name.trim();
        let matches = |variants: &[&str]| variants.contains(&n);
        if matches(&["C1end", "C1endo", "C1'end", "C1'endo", "C1' endo"]) {
            return Some(C1Endo);
        }
        if matches(&["C1exo", "C1'exo", "C1' exo"]) {
            return Some(C1Exo);
        }
        if matches(&["C2end", "C2endo", "C2'end", "C2'endo", "C2' endo"]) {
            return Some(C2Endo);
        }
        if matches(&["C2exo", "C2'exo", "C2' exo"]) {
            return Some(C2Exo);
        }
        if matches(&["C3end", "C3endo", "C3'end", "C3'endo", "C3' endo"]) {
            return Some(C3EndoEndo);
        }
        if matches(&["C3exo", "C3'exo", "C3' exo"]) {
            return Some(C3Exo);
        }
        if matches(&["C4end", "C4endo", "C4'end", "C4'endo", "C4' endo"]) {
            return Some(C4Endo);
        }
        if matches(&["C4exo", "C4'exo", "C4' exo"]) {
            return Some(C4Exo);
        }
        if matches(&[
            "O4end", "O4endo", "O4'end", "O4'endo", "O4' endo", "O1end", "O1endo", "O1'end",
            "O1'endo", "O1' endo",
        ]) {
            return Some(O4Endo);
        }
        if matches(&["O4exo", "O4'exo", "O4' exo", "O1exo", "O1'exo", "O1' exo"]) {
            return Some(O4Exo);
        }
        None
    }
}

/// One of the 96 NtC conformational classes, or `Invalid` for "no class assigned".
///
/// Ordinal 0 is `Invalid`; ordinals 1..=96 are the 96 named classes in fixed
/// alphabetical order. This ordering is an invented convention (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NtC {
    Invalid = 0,
    AA00 = 1, AA01 = 2, AA02 = 3, AA03 = 4, AA04 = 5, AA05 = 6, AA06 = 7, AA07 = 8,
    AA08 = 9, AA09 = 10, AA10 = 11, AA11 = 12, AA12 = 13, AA13 = 14, AAS1 = 15,
    AB01 = 16, AB02 = 17, AB03 = 18, AB04 = 19, AB05 = 20, AB1S = 21, AB2S = 22,
    BA01 = 23, BA05 = 24, BA08 = 25, BA09 = 26, BA10 = 27, BA13 = 28, BA16 = 29, BA17 = 30,
    BB00 = 31, BB01 = 32, BB02 = 33, BB03 = 34, BB04 = 35, BB05 = 36, BB07 = 37, BB08 = 38,
    BB10 = 39, BB11 = 40, BB12 = 41, BB13 = 42, BB14 = 43, BB15 = 44, BB16 = 45, BB17 = 46,
    BB1S = 47, BB20 = 48, BB2S = 49, BBS1 = 50,
    IC01 = 51, IC02 = 52, IC03 = 53, IC04 = 54, IC05 = 55, IC06 = 56, IC07 = 57,
    OP01 = 58, OP02 = 59, OP03 = 60, OP04 = 61, OP05 = 62, OP06 = 63, OP07 = 64, OP08 = 65,
    OP09 = 66, OP10 = 67, OP11 = 68, OP12 = 69, OP13 = 70, OP14 = 71, OP15 = 72, OP16 = 73,
    OP17 = 74, OP18 = 75, OP19 = 76, OP1S = 77, OP20 = 78, OP21 = 79, OP22 = 80, OP23 = 81,
    OP24 = 82, OP25 = 83, OP26 = 84, OP27 = 85, OP28 = 86, OP29 = 87, OP30 = 88, OP31 = 89,
    OPS1 = 90,
    ZZ01 = 91, ZZ02 = 92, ZZ1S = 93, ZZ2S = 94, ZZS1 = 95, ZZS2 = 96,
}

/// The 96 NtC names, in ordinal order 1..=96 (index 0 is unused; `Invalid`'s name is
/// handled separately by [`NtC::name`]).
const NTC_NAMES: [&str; 96] = [
    "AA00", "AA01", "AA02", "AA03", "AA04", "AA05", "AA06", "AA07", "AA08", "AA09", "AA10",
    "AA11", "AA12", "AA13", "AAS1", "AB01", "AB02", "AB03", "AB04", "AB05", "AB1S", "AB2S",
    "BA01", "BA05", "BA08", "BA09", "BA10", "BA13", "BA16", "BA17", "BB00", "BB01", "BB02",
    "BB03", "BB04", "BB05", "BB07", "BB08", "BB10", "BB11", "BB12", "BB13", "BB14", "BB15",
    "BB16", "BB17", "BB1S", "BB20", "BB2S", "BBS1", "IC01", "IC02", "IC03", "IC04", "IC05",
    "IC06", "IC07", "OP01", "OP02", "OP03", "OP04", "OP05", "OP06", "OP07", "OP08", "OP09",
    "OP10", "OP11", "OP12", "OP13", "OP14", "OP15", "OP16", "OP17", "OP18", "OP19", "OP1S",
    "OP20", "OP21", "OP22", "OP23", "OP24", "OP25", "OP26", "OP27", "OP28", "OP29", "OP30",
    "OP31", "OPS1", "ZZ01", "ZZ02", "ZZ1S", "ZZ2S", "ZZS1", "ZZS2",
];

impl NtC {
    /// The canonical four-character name, or `"NANT"` for `Invalid`
    /// (matching `LLKA_NtCToName(LLKA_INVALID_NTC)`'s sentinel string).
    pub fn name(self) -> &'static str {
        if self == NtC::Invalid {
            return "NANT";
        }
        NTC_NAMES[self as usize - 1]
    }

    /// Parses a class name case-sensitively; unrecognised names yield `None` rather
    /// than panicking (spec.md §9's "name-parsing is total" design note).
    pub fn from_name(name: &str) -> Option<NtC> {
        if name == "NANT" {
            return Some(NtC::Invalid);
        }
        let idx = NTC_NAMES.iter().position(|&n| n == name)?;
        Some(NTC_ALL[idx + 1])
    }

    /// This class's 0-based position among the 96 named classes; `None` for `Invalid`.
    pub fn reference_index(self) -> Option<usize> {
        if self == NtC::Invalid {
            None
        } else {
            Some(self as usize - 1)
        }
    }
}

/// All 97 variants (`Invalid` plus the 96 named classes) indexed by ordinal, used by
/// [`NtC::from_name`] to resolve a name's position in [`NTC_NAMES`] back to its variant.
const NTC_ALL: [NtC; 97] = [
    NtC::Invalid, NtC::AA00, NtC::AA01, NtC::AA02, NtC::AA03, NtC::AA04, NtC::AA05, NtC::AA06,
    NtC::AA07, NtC::AA08, NtC::AA09, NtC::AA10, NtC::AA11, NtC::AA12, NtC::AA13, NtC::AAS1,
    NtC::AB01, NtC::AB02, NtC::AB03, NtC::AB04, NtC::AB05, NtC::AB1S, NtC::AB2S, NtC::BA01,
    NtC::BA05, NtC::BA08, NtC::BA09, NtC::BA10, NtC::BA13, NtC::BA16, NtC::BA17, NtC::BB00,
    NtC::BB01, NtC::BB02, NtC::BB03, NtC::BB04, NtC::BB05, NtC::BB07, NtC::BB08, NtC::BB10,
    NtC::BB11, NtC::BB12, NtC::BB13, NtC::BB14, NtC::BB15, NtC::BB16, NtC::BB17, NtC::BB1S,
    NtC::BB20, NtC::BB2S, NtC::BBS1, NtC::IC01, NtC::IC02, NtC::IC03, NtC::IC04, NtC::IC05,
    NtC::IC06, NtC::IC07, NtC::OP01, NtC::OP02, NtC::OP03, NtC::OP04, NtC::OP05, NtC::OP06,
    NtC::OP07, NtC::OP08, NtC::OP09, NtC::OP10, NtC::OP11, NtC::OP12, NtC::OP13, NtC::OP14,
    NtC::OP15, NtC::OP16, NtC::OP17, NtC::OP18, NtC::OP19, NtC::OP1S, NtC::OP20, NtC::OP21,
    NtC::OP22, NtC::OP23, NtC::OP24, NtC::OP25, NtC::OP26, NtC::OP27, NtC::OP28, NtC::OP29,
    NtC::OP30, NtC::OP31, NtC::OPS1, NtC::ZZ01, NtC::ZZ02, NtC::ZZ1S, NtC::ZZ2S, NtC::ZZS1,
    NtC::ZZS2,
];

impl fmt::Display for NtC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The coarse conformational family ("CANA") a step's closest `NtC` class belongs to
/// (spec.md §3, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cana {
    Invalid,
    AForm,
    BForm,
    BII,
    MiB,
    IC,
    Open,
    Syn,
    Z,
}

const CANA_NAMES: [(Cana, &str); 9] = [
    (Cana::Invalid, "NANT"),
    (Cana::AForm, "A"),
    (Cana::BForm, "B"),
    (Cana::BII, "BII"),
    (Cana::MiB, "miB"),
    (Cana::IC, "IC"),
    (Cana::Open, "OPN"),
    (Cana::Syn, "SYN"),
    (Cana::Z, "Z"),
];

impl Cana {
    pub fn name(self) -> &'static str {
        CANA_NAMES.iter().find(|(c, _)| *c == self).map(|(_, n)| *n).unwrap_or("NANT")
    }

    pub fn from_name(name: &str) -> Option<Cana> {
        CANA_NAMES.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
    }

    /// Derives the CANA of an `NtC` class from its two-color bucket pair, as recorded in
    /// [`NTC_COLOR_BUCKETS`]. If either side is `Syn`, the whole step is `Syn`;
    /// otherwise the first color's bucket wins (see module docs for the grounding and
    /// the caveat that this is an invented, not reproduced, resolution rule).
    pub fn of(ntc: NtC) -> Cana {
        let Some(&(_, first, second)) = NTC_COLOR_BUCKETS.iter().find(|(n, _, _)| *n == ntc) else {
            return Cana::Invalid;
        };
        if first == Cana::Syn || second == Cana::Syn {
            Cana::Syn
        } else {
            first
        }
    }
}

impl fmt::Display for Cana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-class (first-color, second-color) bucket pairs, transcribed from
/// `gui_assigner/src/ui/models/ntc_colors.h`'s `std::map<std::string,
/// std::pair<Color,Color>>` literal.
const NTC_COLOR_BUCKETS: [(NtC, Cana, Cana); 96] = [
    (NtC::AA00, Cana::AForm, Cana::AForm), (NtC::AA01, Cana::AForm, Cana::AForm),
    (NtC::AA02, Cana::AForm, Cana::AForm), (NtC::AA03, Cana::AForm, Cana::AForm),
    (NtC::AA04, Cana::AForm, Cana::AForm), (NtC::AA05, Cana::AForm, Cana::AForm),
    (NtC::AA06, Cana::AForm, Cana::AForm), (NtC::AA07, Cana::AForm, Cana::AForm),
    (NtC::AA08, Cana::AForm, Cana::AForm), (NtC::AA09, Cana::AForm, Cana::AForm),
    (NtC::AA10, Cana::AForm, Cana::AForm), (NtC::AA11, Cana::AForm, Cana::AForm),
    (NtC::AA12, Cana::AForm, Cana::AForm), (NtC::AA13, Cana::AForm, Cana::AForm),
    (NtC::AAS1, Cana::Syn, Cana::AForm),
    (NtC::AB01, Cana::AForm, Cana::BForm), (NtC::AB02, Cana::AForm, Cana::BForm),
    (NtC::AB03, Cana::AForm, Cana::BForm), (NtC::AB04, Cana::AForm, Cana::BForm),
    (NtC::AB05, Cana::AForm, Cana::BForm),
    (NtC::AB1S, Cana::AForm, Cana::Syn), (NtC::AB2S, Cana::AForm, Cana::Syn),
    (NtC::BA01, Cana::BForm, Cana::AForm), (NtC::BA05, Cana::BForm, Cana::AForm),
    (NtC::BA08, Cana::BII, Cana::AForm), (NtC::BA09, Cana::BForm, Cana::AForm),
    (NtC::BA10, Cana::BForm, Cana::AForm), (NtC::BA13, Cana::BForm, Cana::AForm),
    (NtC::BA16, Cana::BForm, Cana::AForm), (NtC::BA17, Cana::BForm, Cana::AForm),
    (NtC::BB00, Cana::BForm, Cana::BForm), (NtC::BB01, Cana::BForm, Cana::BForm),
    (NtC::BB02, Cana::BForm, Cana::BForm), (NtC::BB03, Cana::BForm, Cana::BForm),
    (NtC::BB04, Cana::BForm, Cana::BII), (NtC::BB05, Cana::BForm, Cana::BForm),
    (NtC::BB07, Cana::BForm, Cana::BForm), (NtC::BB08, Cana::BForm, Cana::BForm),
    (NtC::BB10, Cana::MiB, Cana::MiB), (NtC::BB11, Cana::BForm, Cana::BForm),
    (NtC::BB12, Cana::BForm, Cana::BForm), (NtC::BB13, Cana::BForm, Cana::BForm),
    (NtC::BB14, Cana::BForm, Cana::BForm), (NtC::BB15, Cana::BForm, Cana::BForm),
    (NtC::BB16, Cana::BForm, Cana::BForm), (NtC::BB17, Cana::BForm, Cana::BForm),
    (NtC::BB1S, Cana::BForm, Cana::Syn), (NtC::BB20, Cana::BForm, Cana::BForm),
    (NtC::BB2S, Cana::BForm, Cana::Syn), (NtC::BBS1, Cana::Syn, Cana::BForm),
    (NtC::IC01, Cana::IC, Cana::IC), (NtC::IC02, Cana::IC, Cana::IC),
    (NtC::IC03, Cana::IC, Cana::IC), (NtC::IC04, Cana::IC, Cana::IC),
    (NtC::IC05, Cana::IC, Cana::IC), (NtC::IC06, Cana::IC, Cana::IC),
    (NtC::IC07, Cana::IC, Cana::IC),
    (NtC::OP01, Cana::Open, Cana::Open), (NtC::OP02, Cana::Open, Cana::Open),
    (NtC::OP03, Cana::Open, Cana::Open), (NtC::OP04, Cana::Open, Cana::Open),
    (NtC::OP05, Cana::Open, Cana::Open), (NtC::OP06, Cana::Open, Cana::Open),
    (NtC::OP07, Cana::Open, Cana::Open), (NtC::OP08, Cana::Open, Cana::Open),
    (NtC::OP09, Cana::Open, Cana::Open), (NtC::OP10, Cana::Open, Cana::Open),
    (NtC::OP11, Cana::Open, Cana::Open), (NtC::OP12, Cana::Open, Cana::Open),
    (NtC::OP13, Cana::Open, Cana::Open), (NtC::OP14, Cana::Open, Cana::Open),
    (NtC::OP15, Cana::Open, Cana::Open), (NtC::OP16, Cana::Open, Cana::Open),
    (NtC::OP17, Cana::Open, Cana::Open), (NtC::OP18, Cana::Open, Cana::Open),
    (NtC::OP19, Cana::Open, Cana::Open), (NtC::OP1S, Cana::Open, Cana::Syn),
    (NtC::OP20, Cana::Open, Cana::Open), (NtC::OP21, Cana::Open, Cana::Open),
    (NtC::OP22, Cana::Open, Cana::Open), (NtC::OP23, Cana::Open, Cana::Open),
    (NtC::OP24, Cana::Open, Cana::Open), (NtC::OP25, Cana::Open, Cana::Open),
    (NtC::OP26, Cana::Open, Cana::Open), (NtC::OP27, Cana::Open, Cana::Open),
    (NtC::OP28, Cana::Open, Cana::Open), (NtC::OP29, Cana::Open, Cana::Open),
    (NtC::OP30, Cana::Open, Cana::Open), (NtC::OP31, Cana::Open, Cana::Open),
    (NtC::OPS1, Cana::Syn, Cana::Open),
    (NtC::ZZ01, Cana::Z, Cana::Z), (NtC::ZZ02, Cana::Z, Cana::Z),
    (NtC::ZZ1S, Cana::Z, Cana::Syn), (NtC::ZZ2S, Cana::Z, Cana::Syn),
    (NtC::ZZS1, Cana::Syn, Cana::Z), (NtC::ZZS2, Cana::Syn, Cana::Z),
];
