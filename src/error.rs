use thiserror::Error;

/// Failure kinds surfaced by every pipeline stage.
///
/// Nothing in the pipeline recovers locally; each error carries the message
/// of the stage that produced it up to `main`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Bad sampling parameters, mismatched lengths, empty inputs.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Operation not allowed in the current state (e.g. predicting before training).
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Classifier, renderer or filesystem failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl PipelineError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        PipelineError::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        PipelineError::InvalidState(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        PipelineError::Backend(msg.into())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Backend(err.to_string())
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
