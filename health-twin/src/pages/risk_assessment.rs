//! Future risk prediction followed by a preventive care guide

use std::path::PathBuf;

use clap::Args;
use health_twin_sdk::WorkflowDefinition;

use super::{load_record, Page, PageContext, PageOutcome};
use crate::agent::{AgentDescriptor, AgentExecutor, AgentRoster};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun, PipelineStage};
use crate::prompt::{PromptTemplate, RunContext};
use crate::record::ValidationError;

pub const RISK_SPECIALIST: &str = "risk_specialist";
pub const PREVENTIVE_ADVISOR: &str = "preventive_advisor";

pub const PREVENTIVE_CARE: &str = "\
Based on the predicted health risks, provide actionable preventive measures.
Suggest lifestyle adjustments, dietary improvements, medical check-ups, and fitness routines
to reduce the likelihood of future health issues.";

#[derive(Debug, Clone, Args, WorkflowDefinition)]
#[workflow(
    id = "risk_assessment",
    name = "Risk Factor Detection",
    description = "Predicts future health risks from an uploaded survey and recommends preventive care"
)]
pub struct RiskAssessmentArgs {
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

pub fn risk_specialist() -> AgentDescriptor {
    AgentDescriptor::new(
        "Health Risk Specialist",
        "Analyze patient health data and predict potential future risks.",
        "An AI-powered medical expert trained to identify potential health risks based on current health metrics, medical history, and lifestyle habits.",
    )
}

pub fn preventive_advisor() -> AgentDescriptor {
    AgentDescriptor::new(
        "Preventive Health Advisor",
        "Recommend proactive health measures to reduce future risks.",
        "An AI-driven preventive care expert specializing in early disease prevention through lifestyle modifications and routine monitoring.",
    )
}

pub fn pipeline(roster: &AgentRoster) -> Pipeline {
    Pipeline::new("risk_assessment")
        .stage(PipelineStage::template(
            "risk_analysis",
            roster.resolve(RISK_SPECIALIST, risk_specialist()),
            PromptTemplate::bulleted_analysis(
                "risk_analysis",
                "Based on the patient's health data, analyze and outline possible future health risks.\nConsider the following factors:",
                "Predict potential future health risks based on trends in their data.\nIdentify diseases or conditions they may be susceptible to over time.",
            ),
            "A detailed health risk assessment report listing potential future health risks and explanations.",
        ))
        .stage(PipelineStage::fixed(
            "preventive_care",
            roster.resolve(PREVENTIVE_ADVISOR, preventive_advisor()),
            PREVENTIVE_CARE,
            "A structured preventive care guide with clear steps to reduce health risks.",
        ))
}

pub async fn run(
    args: &RiskAssessmentArgs,
    ctx: &PageContext<'_>,
    executor: &dyn AgentExecutor,
) -> Result<PageOutcome> {
    let path = args.file.as_deref().ok_or_else(|| ValidationError::Missing {
        field: "file".to_string(),
    })?;
    let record = load_record(path).await?;

    let run = PipelineRun::new(RunContext::Record(record));
    let text = ctx.configure(pipeline(ctx.roster)).run(&run, executor).await?;
    Ok(PageOutcome::new(Page::RiskAssessment, run.id, text))
}
