//! Health analysis: analyst report followed by a lifestyle plan

use std::path::PathBuf;

use clap::Args;
use health_twin_sdk::WorkflowDefinition;

use super::{load_record, Page, PageContext, PageOutcome};
use crate::agent::{AgentDescriptor, AgentExecutor, AgentRoster};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun, PipelineStage};
use crate::prompt::{PromptTemplate, RunContext};
use crate::record::ValidationError;
use crate::report::ReportArtifact;

pub const ANALYST: &str = "health_analyst";
pub const ADVISOR: &str = "health_advisor";
pub const REPORT_STEM: &str = "health_report";

pub const LIFESTYLE_PLAN: &str = "\
Based on the patient's health metrics, provide a personalized lifestyle plan including:
- Ideal sleep patterns and stress management strategies.
- Recommended diet based on their chronic conditions.
- Optimal exercise routine and hydration goals.
- Preventive measures for risks like diabetes and heart disease.";

#[derive(Debug, Clone, Args, WorkflowDefinition)]
#[workflow(
    id = "health_analysis",
    name = "Health Analysis",
    description = "Health Data Analyst report on an uploaded survey, followed by a personalized lifestyle plan"
)]
pub struct HealthAnalysisArgs {
    /// Health data file (JSON) as exported by the survey page
    #[arg(short, long)]
    #[field(
        label = "Health Data File",
        description = "[FILE] Upload your Health Data file (JSON format)",
        type = "file_path",
        pattern = "*.json"
    )]
    pub file: Option<PathBuf>,

    /// Print page metadata as JSON and exit
    #[arg(long, hide = true)]
    pub workflow_metadata: bool,
}

pub fn analyst() -> AgentDescriptor {
    AgentDescriptor::new(
        "Health Data Analyst",
        "Analyze patient health metrics and generate a comprehensive health report.",
        "An AI-powered health specialist trained in analyzing patient lifestyle, medical history, and risk factors to generate insightful recommendations.",
    )
}

pub fn advisor() -> AgentDescriptor {
    AgentDescriptor::new(
        "AI Health Advisor",
        "Recommend personalized lifestyle changes to optimize health and prevent future diseases.",
        "An AI-driven preventive healthcare expert focusing on personalized diet, exercise, and stress management strategies.",
    )
}

pub fn pipeline(roster: &AgentRoster) -> Pipeline {
    Pipeline::new("health_analysis")
        .stage(PipelineStage::template(
            "health_analysis",
            roster.resolve(ANALYST, analyst()),
            PromptTemplate::analysis(
                "health_analysis",
                "Analyze the following health data:",
                "Evaluate key health trends, risks, and potential concerns based on this data.",
            ),
            "A structured report summarizing the health risks, key observations, and insights.",
        ))
        .stage(PipelineStage::fixed(
            "lifestyle_recommendation",
            roster.resolve(ADVISOR, advisor()),
            LIFESTYLE_PLAN,
            "A structured health improvement plan with specific, actionable recommendations.",
        ))
}

pub async fn run(
    args: &HealthAnalysisArgs,
    ctx: &PageContext<'_>,
    executor: &dyn AgentExecutor,
) -> Result<PageOutcome> {
    let path = args.file.as_deref().ok_or_else(|| ValidationError::Missing {
        field: "file".to_string(),
    })?;
    let record = load_record(path).await?;
    tracing::info!(bmi = record.bmi(), category = record.bmi_category().as_str(), "Health data loaded");

    let run = PipelineRun::new(RunContext::Record(record));
    let text = ctx.configure(pipeline(ctx.roster)).run(&run, executor).await?;

    let mut outcome = PageOutcome::new(Page::HealthAnalysis, run.id, text);
    let artifact = ReportArtifact::markdown(REPORT_STEM, outcome.text.clone());
    ctx.export(&mut outcome, &artifact).await;
    Ok(outcome)
}
