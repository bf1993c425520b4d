//! Workflow dispatcher — classifies a user command and routes the response.
//!
//! All intent classification is delegated to the backend; nothing is
//! inferred locally from the user's text.

use std::sync::Arc;

use tracing::{error, info};

use crate::backend::Backend;
use crate::emails::EmailContext;
use crate::error::{DispatchError, Error, Result};
use crate::session::status::StatusTracker;
use crate::transcript::{TranscriptEntry, TranscriptStore};
use crate::workflow::runner::BatchRunner;

/// Classifies submissions and hands batch kinds off to the runner.
pub struct WorkflowDispatcher {
    backend: Arc<dyn Backend>,
    transcript: Arc<TranscriptStore>,
    emails: Arc<EmailContext>,
    status: Arc<StatusTracker>,
}

impl WorkflowDispatcher {
    pub fn new(
        backend: Arc<dyn Backend>,
        transcript: Arc<TranscriptStore>,
        emails: Arc<EmailContext>,
        status: Arc<StatusTracker>,
    ) -> Self {
        Self {
            backend,
            transcript,
            emails,
            status,
        }
    }

    /// Classify `message` and drive the resulting workflow to completion.
    ///
    /// The caller has already taken the single-flight slot; this method
    /// always leaves the status in a stable state (`Ready` or `Error`).
    pub async fn dispatch(&self, message: &str) -> Result<()> {
        let filter_date = self.emails.filter_date().await;
        info!(filter_date, "Classifying user command");

        let classification = match self.backend.classify(message, &filter_date).await {
            Ok(c) => c,
            Err(e) => {
                error!(error = %e, "Classification request failed");
                self.transcript
                    .append(TranscriptEntry::system(format!(
                        "Error communicating with backend: {e}"
                    )))
                    .await;
                self.status.fail(e.to_string()).await;
                return Err(Error::Dispatch(DispatchError::ClassifyFailed(e)));
            }
        };

        let kind = classification.kind;
        info!(kind = %kind, "Command classified");

        if kind.requires_batch() {
            // Captured once at hand-off; the snapshot is read-only for the
            // whole batch.
            let snapshot = self.emails.current().await;
            let total = snapshot.len();

            let entry_id = self
                .transcript
                .append(TranscriptEntry::assistant(
                    kind,
                    format!("{} (0/{total})", classification.text),
                ))
                .await;

            let runner = BatchRunner::new(self.backend.clone(), self.transcript.clone());
            runner
                .run(kind, entry_id, &classification.text, snapshot)
                .await;
        } else {
            self.transcript
                .append(TranscriptEntry::assistant(kind, classification.text))
                .await;
        }

        self.status.finish().await;
        Ok(())
    }
}
