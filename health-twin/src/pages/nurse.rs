//! Virtual nurse: symptom analysis, then a medication reminder
//!
//! Both stages are run by the same nurse persona; each stage gets its own copy
//! of the descriptor.

use clap::Args;
use health_twin_sdk::WorkflowDefinition;

use super::{require_text, Page, PageContext, PageOutcome};
use crate::agent::{AgentDescriptor, AgentExecutor, AgentRoster};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineRun, PipelineStage};
use crate::prompt::{PromptFields, PromptTemplate, RunContext};

pub const NURSE: &str = "virtual_nurse";

pub const SYMPTOMS_FIELD: &str = "symptoms";
pub const MEDICATION_FIELD: &str = "medication";

#[derive(Debug, Clone, Args, WorkflowDefinition)]
#[workflow(
    id = "virtual_nurse",
    name = "Virtual Nurse",
    description = "Symptom insights followed by a medication reminder"
)]
pub struct NurseArgs {
    /// Symptoms you are experiencing
    #[arg(short, long)]
    #[field(
        label = "Symptoms",
        description = "[TEXT] What symptoms are you experiencing?",
        type = "text"
    )]
    pub symptoms: Option<String>,

    /// Medication name and dosage
    #[arg(short, long)]
    #[field(
        label = "Medication",
        description = "[TEXT] Are you taking any medications? If so, enter the name and dosage",
        type = "text"
    )]
    pub medication: Option<String>,

    /// Print page metadata as JSON and exit
    #[arg(long, hide = true)]
    pub workflow_metadata: bool,
}

pub fn nurse() -> AgentDescriptor {
    AgentDescriptor::new(
        "Virtual Nurse",
        "Assist patients by analyzing symptoms and providing medication reminders.",
        "A friendly and knowledgeable AI nurse who provides symptom insights, medication guidance, and health advice.",
    )
}

pub fn pipeline(roster: &AgentRoster) -> Pipeline {
    let nurse = roster.resolve(NURSE, nurse());

    Pipeline::new("virtual_nurse")
        .stage(PipelineStage::template(
            "symptom_analysis",
            nurse.clone(),
            PromptTemplate::freeform_input(
                "symptom_analysis",
                "Analyze the patient's symptoms: ",
                SYMPTOMS_FIELD,
                ". Provide possible causes and recommended next steps (e.g., rest, hydration, or seeing a doctor).",
            ),
            "A summary of symptoms with possible explanations and recommendations.",
        ))
        .stage(PipelineStage::template(
            "medication_reminder",
            nurse,
            PromptTemplate::freeform_input(
                "medication_reminder",
                "Remind the patient to take ",
                MEDICATION_FIELD,
                " at the correct time with proper dosage instructions.",
            ),
            "A medication reminder with dosage details and precautions.",
        ))
}

pub async fn run(
    args: &NurseArgs,
    ctx: &PageContext<'_>,
    executor: &dyn AgentExecutor,
) -> Result<PageOutcome> {
    let symptoms = require_text(SYMPTOMS_FIELD, args.symptoms.as_deref().unwrap_or_default())?;
    let medication =
        require_text(MEDICATION_FIELD, args.medication.as_deref().unwrap_or_default())?;

    let inputs = PromptFields::new()
        .with(SYMPTOMS_FIELD, symptoms)
        .with(MEDICATION_FIELD, medication);
    let run = PipelineRun::new(RunContext::Inputs(inputs));
    let text = ctx.configure(pipeline(ctx.roster)).run(&run, executor).await?;
    Ok(PageOutcome::new(Page::Nurse, run.id, text))
}
