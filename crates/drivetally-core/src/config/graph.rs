//! Upstream drive API configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for talking to the upstream storage API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// API root that relative request paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token supplied by the surrounding sign-in flow.
    #[serde(default)]
    pub access_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// How many times a throttled request is retried.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay when the upstream gives no `Retry-After`.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
    /// Upper bound for any single backoff delay.
    #[serde(default = "default_max_retry_delay")]
    pub max_retry_delay_seconds: u64,
}

impl GraphConfig {
    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::configuration("graph.base_url must not be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "graph.request_timeout_seconds must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            request_timeout_seconds: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
            max_retry_delay_seconds: default_max_retry_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    500
}

fn default_max_retry_delay() -> u64 {
    30
}
