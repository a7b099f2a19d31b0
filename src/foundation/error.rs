/// Convenience result alias used across shadegraph.
pub type ShadegraphResult<T> = Result<T, ShadegraphError>;

/// Error type for all fallible shadegraph operations.
///
/// Validation errors are caller contract violations caught at construction
/// time (bad threshold domain, mismatched texel buffers, unknown processor
/// kinds); nothing downstream tries to recover from them.
#[derive(thiserror::Error, Debug)]
pub enum ShadegraphError {
    /// A constructor or parser rejected its inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// A processor could not be evaluated or rendered.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Any other error bubbled up from a dependency.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShadegraphError {
    /// Build a [`ShadegraphError::Validation`] from a message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShadegraphError::Evaluation`] from a message.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}
