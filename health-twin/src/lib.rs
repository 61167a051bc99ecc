//! AI Health Twin
//!
//! Validated health records and free-text questions are rendered into task
//! descriptions and run through a strictly sequential pipeline of LLM agents.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod navigation;
pub mod pages;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod report;

pub use error::{HealthTwinError, Result};
pub use pipeline::{HandoffMode, Pipeline, PipelineRun, PipelineStage, StageDescription};
pub use prompt::{render, PromptFields, PromptTemplate, RunContext};
pub use record::{HealthRecord, HealthRecordInput, ValidationError};
pub use report::{FileReportSink, ReportArtifact, ReportHandle, ReportSink};
