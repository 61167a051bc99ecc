//! Agents and the engine that runs their tasks

pub mod descriptor;
pub mod error;
pub mod executor;
pub mod openai;
pub mod roster;

pub use descriptor::AgentDescriptor;
pub use error::AgentError;
pub use executor::{AgentExecutor, AgentRequest};
pub use openai::{OpenAiConfig, OpenAiExecutor};
pub use roster::AgentRoster;
