//! Emotional support conversation with a single therapist agent

use clap::Args;
use health_twin_sdk::WorkflowDefinition;

use super::{require_text, Page, PageContext, PageOutcome};
use crate::agent::{AgentDescriptor, AgentExecutor, AgentRoster};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun, PipelineStage};
use crate::prompt::{PromptTemplate, RunContext};

pub const THERAPIST: &str = "therapist";

#[derive(Debug, Clone, Args, WorkflowDefinition)]
#[workflow(
    id = "therapist",
    name = "Emotional Support",
    description = "Supportive, empathetic conversation about stress, motivation and well-being"
)]
pub struct TherapistArgs {
    /// What is on your mind
    #[arg(short, long)]
    #[field(
        label = "Message",
        description = "[TEXT] Share your thoughts or ask for advice",
        type = "text"
    )]
    pub message: Option<String>,

    /// Print page metadata as JSON and exit
    #[arg(long, hide = true)]
    pub workflow_metadata: bool,
}

pub fn therapist() -> AgentDescriptor {
    AgentDescriptor::new(
        "AI Therapist",
        "Provide empathetic, supportive, and helpful mental health conversations.",
        "You are a compassionate and understanding AI therapist. You provide emotional support, help users manage stress, and encourage self-care practices. You are not a substitute for a professional therapist, but you offer thoughtful advice and encouragement.",
    )
}

pub fn pipeline(roster: &AgentRoster) -> Pipeline {
    Pipeline::new("therapist").stage(PipelineStage::template(
        "therapy_session",
        roster.resolve(THERAPIST, therapist()),
        PromptTemplate::freeform(
            "therapy_session",
            "Engage in a supportive, empathetic conversation. The user says: ",
        ),
        "A warm, thoughtful, and encouraging response that fosters emotional well-being.",
    ))
}

pub async fn run(
    args: &TherapistArgs,
    ctx: &PageContext<'_>,
    executor: &dyn AgentExecutor,
) -> Result<PageOutcome> {
    let message = require_text("message", args.message.as_deref().unwrap_or_default())?;

    let run = PipelineRun::new(RunContext::Query(message));
    let text = ctx.configure(pipeline(ctx.roster)).run(&run, executor).await?;
    Ok(PageOutcome::new(Page::Therapist, run.id, text.trim().to_string()))
}
