//! Classifies dinucleotide steps of nucleic-acid 3D structures into NtC and CANA
//! conformational classes.
//!
//! # Measuring a step
//! Once a [`Structure`] has been segmented into dinucleotide steps (see
//! [`structure::extract_dinucleotide_steps`]), its backbone torsions and cross-residue
//! metrics are measured with [`step_metrics::measure_step_metrics`]:
//! ```no_run
//! # use ntc_classify::{structure::extract_dinucleotide_steps, step_metrics::measure_step_metrics};
//! # fn main() -> Result<(), ntc_classify::error::ClassificationError> {
//! # let atoms = Vec::new();
//! let steps = extract_dinucleotide_steps(&atoms);
//! for step in &steps {
//!     let metrics = measure_step_metrics(step)?;
//!     println!("CC = {}", metrics.cc);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Classification context
//! A [`context::ClassificationContext`] holds the reference library (clusters, golden
//! steps, confal parameters and classification limits) a step is classified against.
//! It is built once, from the five reference tables read with `ntc_io::read_table`,
//! and then reused for every step.
//!
//! # Classifying a step
//! [`classify::classify_step`] ties measurement, nearest-neighbour search, voting,
//! tolerance verification, RMSD and confal scoring together into a single
//! [`ClassifiedStep`]; [`classify::classify_steps`] does the same for a whole batch.
//!
//! # Structural calculation
//! The [`calc`] module provides the geometric primitives (distances, angles, dihedrals,
//! rigid superposition) every higher-level module is built from.

#![allow(clippy::needless_return)]

pub mod atom;
pub mod atom_filters;
pub mod calc;
pub mod classified_step;
pub mod classify;
pub mod confal;
pub mod context;
pub mod error;
pub mod nearest_neighbor;
pub mod nomenclature;
pub mod nucleotide;
pub mod residue_id;
pub mod rmsd;
pub mod step_metrics;
pub mod structure;
pub mod tracing;
pub mod violations;
pub mod voting;

pub use atom::{Atom, AtomKey, NO_ALT_ID, NO_INS_CODE};
pub use classified_step::ClassifiedStep;
pub use classify::{average_confal, average_confal_attempted, classify_step, classify_steps, AttemptedStep};
pub use confal::ConfalStatistics;
pub use context::ClassificationContext;
pub use error::ClassificationError;
pub use nomenclature::{Cana, NtC};
pub use residue_id::ResidueId;
pub use step_metrics::{measure_nu_angles, measure_step_metrics, NuAngles, StepMetrics};
pub use structure::{extract_dinucleotide_steps, Structure, StructureView};
pub use tracing::{NullTracer, Tracepoint, Tracer};
pub use violations::Violations;
