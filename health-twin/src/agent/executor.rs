//! The agent engine boundary

use async_trait::async_trait;

use super::{AgentDescriptor, AgentError};

/// One task handed to the agent engine
#[derive(Debug, Clone, Copy)]
pub struct AgentRequest<'a> {
    pub agent: &'a AgentDescriptor,
    pub description: &'a str,
    pub expected_output: &'a str,
}

impl AgentRequest<'_> {
    /// User message combining the task description and the expected-output hint
    pub fn task_prompt(&self) -> String {
        let mut prompt = self.description.trim().to_string();
        if !self.expected_output.trim().is_empty() {
            prompt.push_str("\n\nThis is the expected criteria for your final answer: ");
            prompt.push_str(self.expected_output.trim());
            prompt.push_str(
                "\nYou MUST return the actual complete content as the final answer, not a summary.",
            );
        }
        prompt
    }
}

/// Executes a task for an agent and returns its free-text answer
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(&self, request: AgentRequest<'_>) -> Result<String, AgentError>;
}
