//! General health questions answered by a single educator agent

use clap::Args;
use health_twin_sdk::WorkflowDefinition;

use super::{require_text, Page, PageContext, PageOutcome};
use crate::agent::{AgentDescriptor, AgentExecutor, AgentRoster};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun, PipelineStage};
use crate::prompt::{PromptTemplate, RunContext};

pub const EDUCATOR: &str = "health_educator";

#[derive(Debug, Clone, Args, WorkflowDefinition)]
#[workflow(
    id = "health_educator",
    name = "General Educator",
    description = "Science-backed answers to general health questions"
)]
pub struct EducatorArgs {
    /// Health-related question
    #[arg(short, long)]
    #[field(
        label = "Question",
        description = "[TEXT] Ask a health-related question",
        type = "text"
    )]
    pub question: Option<String>,

    /// Print page metadata as JSON and exit
    #[arg(long, hide = true)]
    pub workflow_metadata: bool,
}

pub fn educator() -> AgentDescriptor {
    AgentDescriptor::new(
        "AI Health Educator",
        "Provide accurate, science-backed answers to general health-related questions.",
        "You are a highly knowledgeable AI health educator with expertise in nutrition, fitness, mental health, disease prevention, and wellness. You provide reliable, friendly, and easy-to-understand answers.",
    )
}

pub fn pipeline(roster: &AgentRoster) -> Pipeline {
    Pipeline::new("health_educator").stage(PipelineStage::template(
        "health_education",
        roster.resolve(EDUCATOR, educator()),
        PromptTemplate::freeform(
            "health_education",
            "Answer this health-related question in a clear and concise manner: ",
        ),
        "A well-researched and easy-to-understand answer to the user's health query.",
    ))
}

pub async fn run(
    args: &EducatorArgs,
    ctx: &PageContext<'_>,
    executor: &dyn AgentExecutor,
) -> Result<PageOutcome> {
    let question = require_text("question", args.question.as_deref().unwrap_or_default())?;

    let run = PipelineRun::new(RunContext::Query(question));
    let text = ctx.configure(pipeline(ctx.roster)).run(&run, executor).await?;
    Ok(PageOutcome::new(Page::Educator, run.id, text.trim().to_string()))
}
