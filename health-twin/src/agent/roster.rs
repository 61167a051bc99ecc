//! Optional YAML overrides for agent descriptors
//!
//! ```yaml
//! health_analyst:
//!   role: Health Data Analyst
//!   goal: Analyze patient health data and detect potential health risks.
//!   backstory: A medical expert trained in analyzing biometric data.
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AgentDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentRoster {
    agents: BTreeMap<String, AgentDescriptor>,
}

impl AgentRoster {
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse agent roster YAML")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read agent roster: {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn get(&self, key: &str) -> Option<&AgentDescriptor> {
        self.agents.get(key)
    }

    /// Override for `key` if configured, otherwise the built-in descriptor
    pub fn resolve(&self, key: &str, default: AgentDescriptor) -> AgentDescriptor {
        match self.agents.get(key) {
            Some(agent) => {
                tracing::debug!(target: "agent", key, role = %agent.role, "Using roster override");
                agent.clone()
            }
            None => default,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
