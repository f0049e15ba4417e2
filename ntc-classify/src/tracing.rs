//! Optional, zero-cost-when-unused tracing facility (spec.md §4.14, §5, §9).
//!
//! The original exposes this as a process-wide, integer-tracepoint-addressed facility
//! toggled at runtime (`ECHMET_TRACE`/`LLKA_tracepointInfo`), backed by global mutable
//! state. This crate drops the global state entirely: every function that can usefully
//! emit a trace takes an `Option<&dyn Tracer>` instead, so tracing is opt-in per call and
//! costs nothing when `None` is passed — the "orthogonal to concurrency, no global
//! mutable state" requirement is satisfied by construction rather than by a feature flag.
//! [`Tracepoint`]'s nine variants are transcribed from
//! `original_source/src/classification.cpp`'s `ECHMET_TRACE` call sites.

/// The nine distinct points in the classification pipeline the original instruments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tracepoint {
    /// Per-torsion signed differences between a step and its nearest neighbour.
    ClassificationMetricsDifferences,
    /// The full list of valid neighbours found for a step.
    AllNearestNeighbors,
    /// A batch classification run starting.
    BeginStepClassificationMultiple,
    /// A step's differences from its assigned cluster's averages.
    DifferencesFromNtcAverages,
    /// A golden step was rejected during nearest-neighbour search for exceeding its
    /// cluster's tolerance window.
    GoldenStepRejectedToleranceExceeded,
    /// A step that ended up with no valid neighbours at all.
    DetailsStepsWithNoNeighbors,
    /// The winning cluster's vote tally.
    BestieClusterInfo,
    /// A step whose pseudorotation differs too much from its cluster's reference.
    PseudorotationTooDifferent,
    /// The closest golden step found for a step.
    ClosestGoldenStepInfo,
    /// The δ pre-gate rejected a step's torsions outright (spec.md §4.6). Not present
    /// as a distinct tracepoint in the original, which folds it into the general
    /// nearest-neighbour trace; broken out here because this crate's search already
    /// separates the two concerns internally.
    DeltaTorsionRejected,
}

/// Receives tracepoint events during classification.
///
/// Implementors decide what "detail" formatting and storage means — a ring buffer, a
/// `log`/`tracing` sink, a test-only `Vec` collector. Passing `None` wherever a
/// `Option<&dyn Tracer>` is accepted disables tracing for that call with no overhead
/// beyond the `None` check.
pub trait Tracer {
    fn emit(&self, point: Tracepoint, detail: &str);
}

/// A [`Tracer`] that discards everything; the default when no tracer is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn emit(&self, _point: Tracepoint, _detail: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CollectingTracer {
        events: RefCell<Vec<(Tracepoint, String)>>,
    }

    impl Tracer for CollectingTracer {
        fn emit(&self, point: Tracepoint, detail: &str) {
            self.events.borrow_mut().push((point, detail.to_string()));
        }
    }

    #[test]
    fn null_tracer_discards_everything() {
        let tracer = NullTracer;
        tracer.emit(Tracepoint::BestieClusterInfo, "irrelevant");
    }

    #[test]
    fn collecting_tracer_records_events() {
        let tracer = CollectingTracer { events: RefCell::new(Vec::new()) };
        tracer.emit(Tracepoint::ClosestGoldenStepInfo, "golden-42");
        assert_eq!(tracer.events.borrow().len(), 1);
        assert_eq!(tracer.events.borrow()[0].0, Tracepoint::ClosestGoldenStepInfo);
    }
}
