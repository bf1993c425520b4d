//! Backend client — the five remote operations the orchestration core drives.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::transcript::WorkflowKind;

pub use http::HttpBackend;

/// One email as listed by the backend. Read-only to the core; the backend's
/// ordering is preserved, never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    /// Epoch milliseconds.
    #[serde(rename = "internalDate")]
    pub internal_date: i64,
    pub snippet: String,
}

/// The backend's classification of a user command.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    /// Which workflow to run, if any.
    #[serde(rename = "type")]
    pub kind: WorkflowKind,
    /// Human-readable reply text shown in the transcript.
    #[serde(rename = "response")]
    pub text: String,
}

/// Result of the per-email event-detection operation. Both fields are null
/// when the email contains no event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDetection {
    pub event: Option<String>,
    pub datetime: Option<String>,
}

/// Result of the per-email summarize operation.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeResponse {
    pub response: String,
}

/// Result of the per-email labeling operation. May be empty; the caller
/// normalizes empty lists to the default label.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

/// The remote email-processing backend.
///
/// All five operations are one stateless round trip each and independently
/// fallible. The orchestration core only ever talks to this trait, so tests
/// drive it with scripted mock implementations.
#[async_trait]
pub trait Backend: Send + Sync {
    /// List candidate emails for a filter date (YYYY-MM-DD).
    async fn list_emails(&self, filter_date: &str) -> Result<Vec<EmailRecord>, BackendError>;

    /// Classify a free-text user command into a workflow kind.
    async fn classify(
        &self,
        message: &str,
        filter_date: &str,
    ) -> Result<Classification, BackendError>;

    /// Detect a calendar event in one email.
    async fn detect_event(&self, email_id: &str) -> Result<EventDetection, BackendError>;

    /// Summarize one email.
    async fn summarize_email(&self, email_id: &str) -> Result<SummarizeResponse, BackendError>;

    /// Generate labels for one email.
    async fn generate_labels(&self, email_id: &str) -> Result<LabelsResponse, BackendError>;
}
