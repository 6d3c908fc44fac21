//! Crate-level error types for `convoy-tasks`.

use thiserror::Error;

/// Errors produced while building task descriptors and compositions.
///
/// Dispatch and execution failures are the broker's domain and never appear
/// here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// A chain must contain at least one signature.
    #[error("a chain requires at least one signature")]
    EmptyChain,

    /// A group must contain at least one signature.
    #[error("a group requires at least one signature")]
    EmptyGroup,

    /// A JSON (de)serialization error, e.g. while encoding task arguments.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
