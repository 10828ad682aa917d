use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoseMatchError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Pose Backend Error: {0}")]
    Backend(#[from] BackendError),

    #[error("Session Error: {0}")]
    Session(String),
}

/// Failures reported by a pose backend. These are recoverable: the session
/// keeps running and the next frame is tried as usual.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("backend '{0}' is unavailable")]
    Unavailable(String),

    #[error("backend '{backend}' failed: {reason}")]
    Failed { backend: String, reason: String },

    #[error("backend '{0}' has been released")]
    Released(String),
}

pub type PoseMatchResult<T> = Result<T, PoseMatchError>;
pub type BackendResult<T> = Result<T, BackendError>;
