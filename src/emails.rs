//! Email context — the date-filtered candidate list batch workflows run over.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::backend::{Backend, EmailRecord};
use crate::error::FetchError;

struct Inner {
    filter_date: String,
    emails: Vec<EmailRecord>,
}

/// Holds the current email context for one filter date.
///
/// A refresh replaces the date and list together, and only on success:
/// readers keep seeing the previous context while a refresh is in flight or
/// after it fails.
pub struct EmailContext {
    backend: Arc<dyn Backend>,
    inner: RwLock<Inner>,
}

impl EmailContext {
    /// Create an empty context for the given filter date.
    pub fn new(backend: Arc<dyn Backend>, filter_date: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            inner: RwLock::new(Inner {
                filter_date: filter_date.into(),
                emails: Vec::new(),
            }),
        })
    }

    /// Fetch the email list for `filter_date` and replace the context.
    ///
    /// On failure the prior context stays intact and the error is surfaced
    /// to the caller; nothing is forced into the transcript.
    pub async fn refresh(&self, filter_date: &str) -> Result<Vec<EmailRecord>, FetchError> {
        let emails = self
            .backend
            .list_emails(filter_date)
            .await
            .map_err(|e| {
                warn!(filter_date, error = %e, "Email list refresh failed; keeping previous context");
                FetchError::ListFailed(e)
            })?;

        info!(filter_date, count = emails.len(), "Email context refreshed");

        let mut inner = self.inner.write().await;
        inner.filter_date = filter_date.to_string();
        inner.emails = emails.clone();
        Ok(emails)
    }

    /// Snapshot of the current email list, in backend order.
    pub async fn current(&self) -> Vec<EmailRecord> {
        self.inner.read().await.emails.clone()
    }

    /// The active filter date.
    pub async fn filter_date(&self) -> String {
        self.inner.read().await.filter_date.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::backend::{Classification, EventDetection, LabelsResponse, SummarizeResponse};
    use crate::error::BackendError;

    /// Mock backend whose email list is swapped per call.
    struct ListBackend {
        responses: Mutex<Vec<Result<Vec<EmailRecord>, BackendError>>>,
    }

    impl ListBackend {
        fn new(responses: Vec<Result<Vec<EmailRecord>, BackendError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl Backend for ListBackend {
        async fn list_emails(&self, _filter_date: &str) -> Result<Vec<EmailRecord>, BackendError> {
            self.responses.lock().await.remove(0)
        }

        async fn classify(
            &self,
            _message: &str,
            _filter_date: &str,
        ) -> Result<Classification, BackendError> {
            unimplemented!("not used in context tests")
        }

        async fn detect_event(&self, _email_id: &str) -> Result<EventDetection, BackendError> {
            unimplemented!("not used in context tests")
        }

        async fn summarize_email(&self, _email_id: &str) -> Result<SummarizeResponse, BackendError> {
            unimplemented!("not used in context tests")
        }

        async fn generate_labels(&self, _email_id: &str) -> Result<LabelsResponse, BackendError> {
            unimplemented!("not used in context tests")
        }
    }

    fn email(id: &str) -> EmailRecord {
        EmailRecord {
            id: id.into(),
            internal_date: 1_754_352_000_000,
            snippet: format!("snippet for {id}"),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_context() {
        let backend = ListBackend::new(vec![Ok(vec![email("a"), email("b")])]);
        let context = EmailContext::new(backend, "2026-08-05");

        let emails = context.refresh("2026-08-06").await.unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(context.current().await.len(), 2);
        assert_eq!(context.filter_date().await, "2026-08-06");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_context() {
        let backend = ListBackend::new(vec![
            Ok(vec![email("a")]),
            Err(BackendError::RequestFailed {
                operation: "list_emails".into(),
                reason: "connection refused".into(),
            }),
        ]);
        let context = EmailContext::new(backend, "2026-08-05");

        context.refresh("2026-08-05").await.unwrap();
        assert_eq!(context.current().await.len(), 1);

        let result = context.refresh("2026-08-06").await;
        assert!(result.is_err());
        // Prior context and date still visible
        assert_eq!(context.current().await.len(), 1);
        assert_eq!(context.current().await[0].id, "a");
        assert_eq!(context.filter_date().await, "2026-08-05");
    }

    #[tokio::test]
    async fn backend_order_is_preserved() {
        let backend = ListBackend::new(vec![Ok(vec![email("z"), email("a"), email("m")])]);
        let context = EmailContext::new(backend, "2026-08-06");

        context.refresh("2026-08-06").await.unwrap();
        let ids: Vec<String> = context.current().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
