use thiserror::Error;

/// Fatal / procedural error channel of the classification engine.
///
/// Every function that can fail to produce a result returns one of these variants; no
/// partial output is ever emitted alongside an `Err`. Semantic tolerance failures (a step
/// that *was* classifiable but violated a check) are reported separately as
/// [`crate::Violations`] bit-flags on a successfully-returned `ClassifiedStep`.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("invalid argument")]
    InvalidArgument,
    #[error("mismatching sizes")]
    MismatchingSizes,
    #[error("bad data")]
    BadData,
    #[error("bad classification clusters")]
    BadClassificationClusters,
    #[error("bad golden steps")]
    BadGoldenSteps,
    #[error("bad confals")]
    BadConfals,
    #[error("bad average nu angles")]
    BadAverageNuAngles,
    #[error("bad classification limits")]
    BadClassificationLimits,
    #[error("missing atoms")]
    MissingAtoms,
    #[error("multiple alternate locations")]
    MultipleAltIds,
    #[error("no such file")]
    NoFile,
    #[error("cannot read file: {0}")]
    CannotReadFile(#[from] std::io::Error),
    #[error("nothing to classify")]
    NothingToClassify,
    #[error("wrong metrics")]
    WrongMetrics,
    #[error("not implemented")]
    NotImplemented,
    #[error("bad geometry: non-finite input")]
    BadGeometry,
}
