use serde::{Deserialize, Serialize};

/// Role, goal and backstory of an agent
///
/// Stages own their descriptor; pages build a fresh copy per pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentDescriptor {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    /// System prompt sent ahead of every task for this agent
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}
