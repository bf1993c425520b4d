//! Batch workflow runner — the sequential per-email loop.
//!
//! One generic algorithm for all batch kinds: the per-email operation and
//! the accumulation rule are selected by the accumulator's payload variant,
//! everything else (ordering, progress, failure policy) is shared.
//!
//! Updating the transcript after every item, rather than once at the end,
//! gives the user live progress for slow many-email batches without a push
//! channel from the backend.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::{Backend, EmailRecord};
use crate::error::BackendError;
use crate::transcript::{
    DetectedEvent, EmailSummary, EntryId, LabelSet, Payload, TranscriptStore, WorkflowKind,
};

/// Drives one batch over a pre-captured email snapshot, amending the target
/// transcript entry after every item.
pub struct BatchRunner {
    backend: Arc<dyn Backend>,
    transcript: Arc<TranscriptStore>,
}

impl BatchRunner {
    pub fn new(backend: Arc<dyn Backend>, transcript: Arc<TranscriptStore>) -> Self {
        Self {
            backend,
            transcript,
        }
    }

    /// Run the batch for `kind` over `emails`, in strict snapshot order.
    ///
    /// `base_text` is the original classification text; each progress suffix
    /// is recomputed from it so suffixes never compound. A per-item failure
    /// contributes nothing to the accumulator and does not abort the batch;
    /// the remaining items still run.
    pub async fn run(
        &self,
        kind: WorkflowKind,
        entry_id: EntryId,
        base_text: &str,
        emails: Vec<EmailRecord>,
    ) {
        let total = emails.len();
        let mut accumulator = Payload::empty_for(kind);

        info!(kind = %kind, total, entry_id = %entry_id, "Starting batch workflow");

        for (index, email) in emails.iter().enumerate() {
            debug!(email_id = %email.id, step = index + 1, total, "Processing email");

            match self.step(&email.id, &mut accumulator).await {
                Ok(()) => {}
                Err(e) => {
                    // Not retried, not surfaced per-item: the failing email
                    // contributes nothing and the counter still advances.
                    warn!(email_id = %email.id, error = %e, "Per-email operation failed");
                }
            }

            let snapshot = accumulator.clone();
            let display = format!("{base_text} ({}/{total})", index + 1);
            self.transcript
                .amend(entry_id, |entry| {
                    entry.text = display;
                    entry.timestamp = Utc::now();
                    entry.payload = snapshot;
                })
                .await;
        }

        info!(
            kind = %kind,
            total,
            collected = accumulator.len(),
            "Batch workflow complete"
        );
    }

    /// Run the per-email operation for one email and fold the result into
    /// the accumulator. The payload variant selects the operation.
    async fn step(&self, email_id: &str, accumulator: &mut Payload) -> Result<(), BackendError> {
        match accumulator {
            Payload::Events(events) => {
                let detection = self.backend.detect_event(email_id).await?;
                // A null event is a normal "nothing found" answer; the email
                // is skipped, not an error.
                if let Some(event) = detection.event {
                    events.push(DetectedEvent {
                        email_id: email_id.to_string(),
                        event,
                        datetime: detection.datetime,
                    });
                }
            }
            Payload::Summaries(summaries) => {
                let summary = self.backend.summarize_email(email_id).await?;
                summaries.push(EmailSummary {
                    email_id: email_id.to_string(),
                    response: summary.response,
                });
            }
            Payload::Labels(labels) => {
                let response = self.backend.generate_labels(email_id).await?;
                labels.push(LabelSet::normalized(email_id, response.labels));
            }
            // Plain classifications never reach the runner.
            Payload::Plain => {}
        }
        Ok(())
    }
}
