//! Error taxonomy for a single pipeline run
//!
//! Every variant is scoped to the run that raised it. The CLI converts them to a
//! user-visible message with [`HealthTwinError::user_message`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::agent::AgentError;
use crate::record::ValidationError;

pub type Result<T> = std::result::Result<T, HealthTwinError>;

#[derive(Debug, Error)]
pub enum HealthTwinError {
    /// Malformed or out-of-range user input. The user can correct and resubmit.
    #[error("invalid health data: {0}")]
    Validation(#[from] ValidationError),

    /// A prompt template needs a field the run context does not carry.
    #[error("template `{template}` requires field `{field}`")]
    MissingField { field: String, template: String },

    /// The agent engine failed (network, quota, malformed response).
    #[error("agent `{agent}` failed: {source}")]
    AgentExecution {
        agent: String,
        #[source]
        source: AgentError,
    },

    /// A stage did not return within its time budget.
    #[error("agent `{agent}` did not respond within {timeout:?}")]
    Timeout { agent: String, timeout: Duration },

    /// The report artifact could not be written. The displayed text stays valid.
    #[error("failed to export report to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl HealthTwinError {
    pub fn missing_field(field: impl Into<String>, template: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            template: template.into(),
        }
    }

    /// True when the user can fix the input and try again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Export { .. })
    }

    /// Message shown to the user in place of the report
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => format!("⚠️ Please check your health data: {}", e),
            Self::MissingField { .. } => {
                "❌ This page could not build its request. Please report this issue.".to_string()
            }
            Self::AgentExecution { .. } => {
                "❌ The AI service could not complete your request. Please try again later."
                    .to_string()
            }
            Self::Timeout { timeout, .. } => format!(
                "⏱️ The AI service did not answer within {:?}. Please try again.",
                timeout
            ),
            Self::Export { path, .. } => format!(
                "⚠️ Your report is shown above but could not be saved to {}.",
                path.display()
            ),
            Self::Config(msg) => format!("❌ Configuration problem: {}", msg),
        }
    }
}
