//! Error types for Inbox Assist.

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Backend transport errors — one per failed round trip.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request to {operation} failed: {reason}")]
    RequestFailed { operation: String, reason: String },

    #[error("Backend returned {status} for {operation}: {detail}")]
    Status {
        operation: String,
        status: u16,
        detail: String,
    },

    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },
}

/// Email-list retrieval failed; the previous context is left intact.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Email list retrieval failed: {0}")]
    ListFailed(#[source] BackendError),
}

/// Classification request failed; no batch is started.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Classification request failed: {0}")]
    ClassifyFailed(#[source] BackendError),

    #[error("A workflow is already in flight")]
    AlreadyProcessing,

    #[error("Empty message")]
    EmptyMessage,
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
