//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Default per-request timeout for backend calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Base URL of the email-processing backend.
    pub backend_url: String,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
    /// Initial email filter date (YYYY-MM-DD). Today if unset.
    pub filter_date: Option<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            filter_date: None,
        }
    }
}

impl AssistConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// - `INBOX_ASSIST_BACKEND_URL` — backend base URL
    /// - `INBOX_ASSIST_TIMEOUT_SECS` — per-request timeout in seconds
    /// - `INBOX_ASSIST_FILTER_DATE` — initial filter date (YYYY-MM-DD)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("INBOX_ASSIST_BACKEND_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "INBOX_ASSIST_BACKEND_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.backend_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(secs) = std::env::var("INBOX_ASSIST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INBOX_ASSIST_TIMEOUT_SECS".into(),
                message: format!("'{secs}' is not a valid number of seconds"),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(date) = std::env::var("INBOX_ASSIST_FILTER_DATE") {
            config.filter_date = Some(date);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = AssistConfig::default();
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.filter_date.is_none());
    }
}
