//! Typed failures of the agent engine

use thiserror::Error;

/// Agent execution errors
///
/// The pipeline never retries; the variants exist so callers and logs can tell
/// a quota problem from a broken network or a garbled answer.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Credentials rejected (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Quota or rate limit exceeded (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Request rejected as malformed (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side failure (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Connection refused, DNS failure, transport timeout
    #[error("Network error: {0}")]
    Network(String),

    /// The engine answered but the answer carried no usable text
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AgentError {
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            401 | 403 => AgentError::Unauthorized(error_text),
            429 => AgentError::RateLimited(error_text),
            400 => AgentError::BadRequest(error_text),
            500..=599 => AgentError::ServiceError(error_text),
            _ => AgentError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }

    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AgentError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            AgentError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            AgentError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else {
            AgentError::Other(e.into())
        }
    }
}
