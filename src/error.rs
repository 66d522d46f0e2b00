use thiserror::Error;

/// Construction-time and import-time contract failures (spec §1.B, §7).
///
/// These are recoverable by a caller: a malformed variant string or an
/// out-of-range label should surface as an error, not crash the process.
/// In-process hot-path violations of the `modify`/`undo` contract (the
/// optimiser reassigning a point to its own cluster, or emptying a cluster)
/// are a different class of bug entirely and are caught by `debug_assert!`
/// at the call site instead, since only this crate's own optimiser drives
/// that path and a `Result` there would tax every allocation-free probe.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum CviError {
    #[error("K must be in [2, 256], got {0}")]
    InvalidK(u16),
    #[error("point matrix buffer has length {found}, expected n*d = {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("labelling has length {found}, expected n = {expected}")]
    LabelCountMismatch { expected: usize, found: usize },
    #[error("label {label} at index {index} is out of range [0, {k})")]
    LabelOutOfRange { index: usize, label: u8, k: u8 },
    #[error("M must be > 0, got {0}")]
    InvalidM(i64),
    #[error("unknown cluster validity index variant: {0:?}")]
    UnknownVariant(String),
    #[error("unknown OWA operator: {0:?}")]
    UnknownOwaOperator(String),
    #[error("lowercase generalized Dunn delta index must be in 1..=6, got {0}")]
    InvalidLowercaseDelta(u8),
    #[error("uppercase generalized Dunn delta index must be in 1..=3, got {0}")]
    InvalidUppercaseDelta(u8),
    #[error("sample index {0} missing from new→old mapping")]
    MissingMapping(usize),
}
