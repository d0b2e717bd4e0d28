/// Errors surfaced by [`crate::WindowEngine`].
///
/// Most bad input (out-of-range indexes, contradicting measurements, offsets past the end) is
/// coerced instead of rejected. These are the only cases a caller can observe as failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A negative total count was supplied.
    #[error("total count must be non-negative (got {0})")]
    InvalidCount(i64),
    /// The engine has not received its first total count yet.
    #[error("the engine is idle: set a total count first")]
    NotReady,
}
