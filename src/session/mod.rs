//! Session — the explicit object owning one conversation's state.
//!
//! Bundles the transcript store, email context, and status tracker with the
//! backend handle; created at session start, dropped at session end. There
//! are no ambient globals.

pub mod status;

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{Backend, EmailRecord};
use crate::emails::EmailContext;
use crate::error::{DispatchError, Error, FetchError, Result};
use crate::transcript::{TranscriptEntry, TranscriptStore};
use crate::workflow::WorkflowDispatcher;

pub use status::{Status, StatusTracker};

/// One chat session against the email backend.
pub struct Session {
    transcript: Arc<TranscriptStore>,
    emails: Arc<EmailContext>,
    status: Arc<StatusTracker>,
    dispatcher: WorkflowDispatcher,
}

impl Session {
    /// Create a session with an empty transcript and email context.
    pub fn new(backend: Arc<dyn Backend>, filter_date: impl Into<String>) -> Self {
        let transcript = TranscriptStore::new();
        let emails = EmailContext::new(backend.clone(), filter_date);
        let status = Arc::new(StatusTracker::new());
        let dispatcher = WorkflowDispatcher::new(
            backend,
            transcript.clone(),
            emails.clone(),
            status.clone(),
        );

        Self {
            transcript,
            emails,
            status,
            dispatcher,
        }
    }

    /// Submit a user command and drive it to completion.
    ///
    /// Rejects blank input before any state changes, and rejects submissions
    /// while a workflow is already in flight (single-flight per session).
    pub async fn submit(&self, message: &str) -> Result<()> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Dispatch(DispatchError::EmptyMessage));
        }

        if !self.status.begin().await {
            warn!("Submission rejected: a workflow is already in flight");
            return Err(Error::Dispatch(DispatchError::AlreadyProcessing));
        }

        info!(message, "User command submitted");
        self.transcript.append(TranscriptEntry::user(message)).await;

        self.dispatcher.dispatch(message).await
    }

    /// Append a system notice (welcome text, operator messages).
    pub async fn announce(&self, text: impl Into<String>) {
        self.transcript.append(TranscriptEntry::system(text)).await;
    }

    /// Refresh the email context for a new filter date.
    pub async fn refresh_emails(&self, filter_date: &str) -> std::result::Result<Vec<EmailRecord>, FetchError> {
        self.emails.refresh(filter_date).await
    }

    /// Snapshot of the current email context.
    pub async fn emails(&self) -> Vec<EmailRecord> {
        self.emails.current().await
    }

    /// The active email filter date.
    pub async fn filter_date(&self) -> String {
        self.emails.filter_date().await
    }

    /// Snapshot of the transcript in append order.
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.entries().await
    }

    /// Current session status.
    pub async fn status(&self) -> Status {
        self.status.current().await
    }
}
