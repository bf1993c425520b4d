//! Session status — Ready/Processing/Error with a single-flight guard.

use tokio::sync::RwLock;
use tracing::debug;

/// Whether a workflow is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Processing,
    Error(String),
}

impl Status {
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Processing => write!(f, "Processing"),
            Self::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Tracks the session status and enforces one run at a time.
pub struct StatusTracker {
    inner: RwLock<Status>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Status::Ready),
        }
    }

    /// Try to enter `Processing`. Returns `false` when a run is already in
    /// flight; `Ready` and `Error` both accept a new run.
    pub async fn begin(&self) -> bool {
        let mut status = self.inner.write().await;
        if status.is_processing() {
            return false;
        }
        debug!(from = %status, "Status -> Processing");
        *status = Status::Processing;
        true
    }

    /// A run completed successfully.
    pub async fn finish(&self) {
        let mut status = self.inner.write().await;
        debug!(from = %status, "Status -> Ready");
        *status = Status::Ready;
    }

    /// A run failed unrecoverably.
    pub async fn fail(&self, message: impl Into<String>) {
        let mut status = self.inner.write().await;
        let message = message.into();
        debug!(from = %status, error = %message, "Status -> Error");
        *status = Status::Error(message);
    }

    /// Snapshot of the current status.
    pub async fn current(&self) -> Status {
        self.inner.read().await.clone()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
