//! The pages of the app, each a thin layer over [`Pipeline`]
//!
//! A page turns its command line input into a [`RunContext`], builds its
//! pipeline, runs it and optionally exports a report.

pub mod educator;
pub mod health_analysis;
pub mod nurse;
pub mod risk_assessment;
pub mod survey;
pub mod therapist;

use std::path::Path;
use std::time::Duration;

use uuid::Uuid;

use crate::agent::AgentRoster;
use crate::error::{HealthTwinError, Result};
use crate::pipeline::{HandoffMode, Pipeline};
use crate::record::{HealthRecord, ValidationError};
use crate::report::{ReportArtifact, ReportHandle, ReportSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    HealthAnalysis,
    RiskAssessment,
    Educator,
    Therapist,
    Nurse,
    Survey,
}

impl Page {
    /// Sidebar order
    pub const ALL: [Page; 7] = [
        Page::Home,
        Page::HealthAnalysis,
        Page::RiskAssessment,
        Page::Educator,
        Page::Therapist,
        Page::Nurse,
        Page::Survey,
    ];

    /// Subcommand that opens the page
    pub fn command(self) -> &'static str {
        match self {
            Page::Home => "pages",
            Page::HealthAnalysis => "analyze",
            Page::RiskAssessment => "risk",
            Page::Educator => "educator",
            Page::Therapist => "therapist",
            Page::Nurse => "nurse",
            Page::Survey => "survey",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::HealthAnalysis => "🩺 Health Analysis",
            Page::RiskAssessment => "⚠️ Risk Factor Detection",
            Page::Educator => "📖 General Educator",
            Page::Therapist => "💙 Emotional Support",
            Page::Nurse => "👩‍⚕️ Virtual Nurse",
            Page::Survey => "📋 Health Survey",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "👨‍⚕️ AI Health Twin",
            Page::HealthAnalysis => "👩‍⚕️ AI Health Twin - Personalized Health Advisor",
            Page::RiskAssessment => "👩‍⚕️ AI Health Twin - Future Health Risk Assessment",
            Page::Educator => "💡 AI Health Educator - Ask Me Anything!",
            Page::Therapist => "🧠 AI Therapist - Your Virtual Mental Health Companion",
            Page::Nurse => "👩‍⚕️ Virtual Nurse",
            Page::Survey => "📋 Health Survey",
        }
    }

    pub fn intro(self) -> &'static str {
        match self {
            Page::Home => "Your digital health companion. Pick a page below to get started.",
            Page::HealthAnalysis => "Upload your medical history file (JSON format), and the AI will provide a detailed health analysis.",
            Page::RiskAssessment => "Upload your health data file (JSON format), and the AI will analyze potential future health risks.",
            Page::Educator => "Chat with an AI-powered health educator to get answers on general health topics.",
            Page::Therapist => "Chat with a friendly, non-judgmental AI therapist about stress, motivation, and well-being.",
            Page::Nurse => "Describe your symptoms and current medication, and the virtual nurse will suggest next steps and a reminder plan.",
            Page::Survey => "Fill out the form to get a personalized health insight.",
        }
    }

    /// Heading shown above the page's result
    pub fn result_heading(self) -> &'static str {
        match self {
            Page::Home => "",
            Page::HealthAnalysis => "🤖 AI Health Twin Recommendations:",
            Page::RiskAssessment => "🩺 AI Health Risk Prediction:",
            Page::Educator => "🤖 AI Health Educator's Answer:",
            Page::Therapist => "🤖 AI Therapist's Response:",
            Page::Nurse => "🤖 AI Nurse Response:",
            Page::Survey => "✅ Survey successfully completed!",
        }
    }
}

/// What every page run needs besides its own input
pub struct PageContext<'a> {
    pub sink: &'a dyn ReportSink,
    pub roster: &'a AgentRoster,
    pub handoff: HandoffMode,
    pub stage_timeout: Option<Duration>,
}

impl PageContext<'_> {
    /// Apply the run-wide handoff mode and stage timeout
    pub fn configure(&self, pipeline: Pipeline) -> Pipeline {
        let pipeline = pipeline.with_handoff(self.handoff);
        match self.stage_timeout {
            Some(timeout) => pipeline.with_stage_timeout(timeout),
            None => pipeline,
        }
    }

    /// Export the artifact; a failed write is kept on the outcome instead of failing the run
    pub(crate) async fn export(&self, outcome: &mut PageOutcome, artifact: &ReportArtifact) {
        match self.sink.export(&outcome.run_id, artifact).await {
            Ok(handle) => outcome.report = Some(handle),
            Err(e) => {
                tracing::warn!(run_id = %outcome.run_id, error = %e, "Report export failed");
                outcome.export_error = Some(e);
            }
        }
    }
}

/// Result of one page run
#[derive(Debug)]
pub struct PageOutcome {
    pub page: Page,
    pub run_id: Uuid,
    pub text: String,
    pub report: Option<ReportHandle>,
    pub export_error: Option<HealthTwinError>,
}

impl PageOutcome {
    pub fn new(page: Page, run_id: Uuid, text: String) -> Self {
        Self {
            page,
            run_id,
            text,
            report: None,
            export_error: None,
        }
    }
}

/// Load and validate an uploaded survey document
pub(crate) async fn load_record(path: &Path) -> Result<HealthRecord> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        HealthTwinError::Validation(ValidationError::Malformed(format!(
            "cannot read {}: {}",
            path.display(),
            e
        )))
    })?;
    Ok(HealthRecord::from_json(&content)?)
}

/// Reject blank free-text input before any agent is called
pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: field.to_string(),
        }
        .into());
    }
    Ok(trimmed.to_string())
}
