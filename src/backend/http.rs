//! HTTP backend — reqwest client for the email-processing REST API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AssistConfig;
use crate::error::BackendError;

use super::{Backend, Classification, EmailRecord, EventDetection, LabelsResponse, SummarizeResponse};

/// Error body shape the backend uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Envelope around the email list.
#[derive(Debug, Deserialize)]
struct ListEmailsEnvelope {
    response: Vec<EmailRecord>,
}

/// Production backend client over HTTP.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a client from config. The per-request timeout applies to every
    /// backend call.
    pub fn new(config: &AssistConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed {
                operation: "client".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    /// Map a response to a typed body, extracting the backend's `error`
    /// field on non-success statuses.
    async fn read_json<T: serde::de::DeserializeOwned>(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(BackendError::Status {
                operation: operation.into(),
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse {
                operation: operation.into(),
                reason: e.to_string(),
            })
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.api_url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed {
                operation: operation.into(),
                reason: e.to_string(),
            })?;

        Self::read_json(operation, response).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_emails(&self, filter_date: &str) -> Result<Vec<EmailRecord>, BackendError> {
        let response = self
            .client
            .get(self.api_url("get-emails"))
            .query(&[("filterDate", filter_date)])
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed {
                operation: "list_emails".into(),
                reason: e.to_string(),
            })?;

        let envelope: ListEmailsEnvelope = Self::read_json("list_emails", response).await?;
        Ok(envelope.response)
    }

    async fn classify(
        &self,
        message: &str,
        filter_date: &str,
    ) -> Result<Classification, BackendError> {
        let body = serde_json::json!({
            "message": message,
            "filter_date": filter_date,
        });
        self.post_json("classify", "send-message", &body).await
    }

    async fn detect_event(&self, email_id: &str) -> Result<EventDetection, BackendError> {
        let body = serde_json::json!({ "email_id": email_id });
        self.post_json("detect_event", "detect-email-event", &body)
            .await
    }

    async fn summarize_email(&self, email_id: &str) -> Result<SummarizeResponse, BackendError> {
        let body = serde_json::json!({ "email_id": email_id });
        self.post_json("summarize_email", "summarize-email", &body)
            .await
    }

    async fn generate_labels(&self, email_id: &str) -> Result<LabelsResponse, BackendError> {
        let body = serde_json::json!({ "email_id": email_id });
        self.post_json("generate_labels", "generate-email-labels", &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        let config = AssistConfig {
            backend_url: "http://localhost:5000/".into(),
            ..Default::default()
        };
        HttpBackend::new(&config).unwrap()
    }

    #[test]
    fn api_url_joins_without_double_slash() {
        let backend = backend();
        assert_eq!(
            backend.api_url("send-message"),
            "http://localhost:5000/api/send-message"
        );
        assert_eq!(
            backend.api_url("get-emails"),
            "http://localhost:5000/api/get-emails"
        );
    }

    #[test]
    fn list_envelope_deserializes() {
        let json = r#"{"response": [{"id": "a", "internalDate": 1, "snippet": "s"}]}"#;
        let envelope: ListEmailsEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.response.len(), 1);
        assert_eq!(envelope.response[0].id, "a");
    }

    #[test]
    fn error_body_deserializes() {
        let json = r#"{"error": "Empty email_id"}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error, "Empty email_id");
    }
}
