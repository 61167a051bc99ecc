//! Sequential multi-agent pipeline
//!
//! A [`Pipeline`] is an ordered list of [`PipelineStage`]s. Each stage pairs an
//! agent with a task description; stages run strictly one after another and the
//! last stage's answer is the result of the run. Any failure aborts the run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use health_twin_sdk::{
    log_agent_complete, log_agent_failed, log_agent_start, log_run_complete, log_run_start,
    log_stage_complete, log_stage_failed, log_stage_start,
};

use crate::agent::{AgentDescriptor, AgentExecutor, AgentRequest};
use crate::error::{HealthTwinError, Result};
use crate::prompt::{render, PromptTemplate, RunContext};

/// Builds a stage description from the outputs of earlier stages
pub type DeriveFn = dyn Fn(&StageHistory) -> String + Send + Sync;

/// Where a stage's task description comes from
#[derive(Clone)]
pub enum StageDescription {
    /// Rendered from the run context
    Template(PromptTemplate),
    /// A fixed instruction, independent of the run context
    Static(String),
    /// Built from what earlier stages returned
    Derived(Arc<DeriveFn>),
}

impl StageDescription {
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&StageHistory) -> String + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    fn resolve(&self, context: &RunContext, history: &StageHistory) -> Result<String> {
        match self {
            Self::Template(template) => render(template, context),
            Self::Static(text) => Ok(text.trim().to_string()),
            Self::Derived(f) => Ok(f(history)),
        }
    }
}

impl fmt::Debug for StageDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(&template.name()).finish(),
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// One step of a pipeline
#[derive(Debug, Clone)]
pub struct PipelineStage {
    pub name: String,
    pub agent: AgentDescriptor,
    pub description: StageDescription,
    pub expected_output: String,
}

impl PipelineStage {
    pub fn new(
        name: impl Into<String>,
        agent: AgentDescriptor,
        description: StageDescription,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            agent,
            description,
            expected_output: expected_output.into(),
        }
    }

    pub fn template(
        name: impl Into<String>,
        agent: AgentDescriptor,
        template: PromptTemplate,
        expected_output: impl Into<String>,
    ) -> Self {
        Self::new(name, agent, StageDescription::Template(template), expected_output)
    }

    pub fn fixed(
        name: impl Into<String>,
        agent: AgentDescriptor,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            agent,
            StageDescription::Static(description.into()),
            expected_output,
        )
    }
}

/// Answer of a completed stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub stage: String,
    pub agent: String,
    pub text: String,
}

/// Outputs of the stages completed so far in a run
#[derive(Debug, Clone, Default)]
pub struct StageHistory {
    outputs: Vec<StageOutput>,
}

impl StageHistory {
    pub fn last(&self) -> Option<&StageOutput> {
        self.outputs.last()
    }

    pub fn get(&self, stage: &str) -> Option<&StageOutput> {
        self.outputs.iter().find(|o| o.stage == stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageOutput> {
        self.outputs.iter()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    fn push(&mut self, output: StageOutput) {
        self.outputs.push(output);
    }

    fn into_last_text(mut self) -> String {
        self.outputs.pop().map(|o| o.text).unwrap_or_default()
    }
}

/// How much of the earlier stages' text a stage gets to see
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HandoffMode {
    /// Stages see only their own description
    #[default]
    None,
    /// The previous stage's answer is appended to the description
    PreviousOutput,
    /// Every earlier answer is appended, oldest first
    AllOutputs,
}

impl HandoffMode {
    fn decorate(self, description: String, history: &StageHistory) -> String {
        let handed_off: Vec<&StageOutput> = match self {
            Self::None => return description,
            Self::PreviousOutput => history.last().into_iter().collect(),
            Self::AllOutputs => history.iter().collect(),
        };
        if handed_off.is_empty() {
            return description;
        }

        let mut text = description;
        text.push_str("\n\nContext from previous stages:");
        for output in handed_off {
            text.push_str(&format!("\n\n[{} ({})]\n{}", output.stage, output.agent, output.text));
        }
        text
    }
}

/// One submission: a run id and what the user provided
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub id: Uuid,
    pub context: RunContext,
}

impl PipelineRun {
    pub fn new(context: RunContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    stages: Vec<PipelineStage>,
    handoff: HandoffMode,
    stage_timeout: Option<Duration>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            handoff: HandoffMode::default(),
            stage_timeout: None,
        }
    }

    pub fn stage(mut self, stage: PipelineStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_handoff(mut self, handoff: HandoffMode) -> Self {
        self.handoff = handoff;
        self
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn handoff(&self) -> HandoffMode {
        self.handoff
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order and return the last stage's answer
    pub async fn run(&self, run: &PipelineRun, executor: &dyn AgentExecutor) -> Result<String> {
        if self.stages.is_empty() {
            tracing::debug!(pipeline = %self.name, run_id = %run.id, "Empty pipeline, nothing to run");
            return Ok(String::new());
        }

        log_run_start!(run.id, self.name, self.stages.len());
        tracing::info!(
            pipeline = %self.name,
            run_id = %run.id,
            stages = self.stages.len(),
            handoff = ?self.handoff,
            "Starting pipeline run"
        );

        let mut history = StageHistory::default();
        for (index, stage) in self.stages.iter().enumerate() {
            let number = index + 1;
            log_stage_start!(run.id, number, stage.name);

            let text = match self.run_stage(run, stage, &history, executor).await {
                Ok(text) => text,
                Err(e) => {
                    log_stage_failed!(run.id, number, stage.name, e);
                    tracing::warn!(
                        pipeline = %self.name,
                        run_id = %run.id,
                        stage = %stage.name,
                        error = %e,
                        "Pipeline run aborted"
                    );
                    return Err(e);
                }
            };

            log_stage_complete!(run.id, number, stage.name);
            history.push(StageOutput {
                stage: stage.name.clone(),
                agent: stage.agent.role.clone(),
                text,
            });
        }

        log_run_complete!(run.id, self.name);
        tracing::info!(pipeline = %self.name, run_id = %run.id, "Pipeline run completed");
        Ok(history.into_last_text())
    }

    async fn run_stage(
        &self,
        run: &PipelineRun,
        stage: &PipelineStage,
        history: &StageHistory,
        executor: &dyn AgentExecutor,
    ) -> Result<String> {
        let description = stage.description.resolve(&run.context, history)?;
        let description = self.handoff.decorate(description, history);
        let agent = stage.agent.role.as_str();

        log_agent_start!(run.id, agent, summarize(&description));
        tracing::debug!(stage = %stage.name, agent, chars = description.len(), "Invoking agent");

        let request = AgentRequest {
            agent: &stage.agent,
            description: &description,
            expected_output: &stage.expected_output,
        };

        let outcome = match self.stage_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, executor.execute(request)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    log_agent_failed!(run.id, agent, "timed out");
                    return Err(HealthTwinError::Timeout {
                        agent: agent.to_string(),
                        timeout,
                    });
                }
            },
            None => executor.execute(request).await,
        };

        match outcome {
            Ok(text) => {
                log_agent_complete!(run.id, agent, text.chars().count());
                Ok(text)
            }
            Err(source) => {
                log_agent_failed!(run.id, agent, source);
                Err(HealthTwinError::AgentExecution {
                    agent: agent.to_string(),
                    source,
                })
            }
        }
    }
}

/// First line of a description, shortened for event output
fn summarize(description: &str) -> String {
    const MAX_CHARS: usize = 80;
    let first = description.lines().next().unwrap_or_default().trim();
    if first.chars().count() > MAX_CHARS {
        let cut: String = first.chars().take(MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use crate::record::{HealthRecord, HealthRecordInput};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted answers and records every description it receives
    struct ScriptedExecutor {
        calls: AtomicUsize,
        answers: Mutex<VecDeque<std::result::Result<String, AgentError>>>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedExecutor {
        fn new(answers: Vec<std::result::Result<String, AgentError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answers: Mutex::new(answers.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn seen(&self) -> Vec<(String, String)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentExecutor for ScriptedExecutor {
        async fn execute(
            &self,
            request: AgentRequest<'_>,
        ) -> std::result::Result<String, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((request.agent.role.clone(), request.description.to_string()));
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()))
        }
    }

    struct StalledExecutor;

    #[async_trait]
    impl AgentExecutor for StalledExecutor {
        async fn execute(&self, _: AgentRequest<'_>) -> std::result::Result<String, AgentError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    const PREVENTIVE_CARE: &str = "Based on the predicted health risks, provide actionable preventive measures.";

    fn record() -> HealthRecord {
        HealthRecord::new(HealthRecordInput {
            age: Some(30),
            gender: Some("Male".to_string()),
            height_cm: Some(180.0),
            weight_kg: Some(81.0),
            exercise: Some("Daily".to_string()),
            sleep: Some("7-9".to_string()),
            water: Some("More than 2L".to_string()),
            diet: Some("Balanced".to_string()),
            alcohol: Some("Occasionally".to_string()),
            smoking: Some("No".to_string()),
            stress_level: Some(4),
            mental_health: Some("No".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    fn stage(name: &str, role: &str, description: &str) -> PipelineStage {
        PipelineStage::fixed(name, AgentDescriptor::new(role, "goal", "backstory"), description, "")
    }

    fn two_stage() -> Pipeline {
        Pipeline::new("risk_assessment")
            .stage(PipelineStage::template(
                "risk_analysis",
                AgentDescriptor::new("Health Risk Specialist", "g", "b"),
                PromptTemplate::bulleted_analysis(
                    "risk_analysis",
                    "Consider the following factors:",
                    "Predict potential future health risks.",
                ),
                "A detailed health risk assessment report.",
            ))
            .stage(PipelineStage::fixed(
                "preventive_care",
                AgentDescriptor::new("Preventive Health Advisor", "g", "b"),
                PREVENTIVE_CARE,
                "A structured preventive care guide.",
            ))
    }

    #[tokio::test]
    async fn test_empty_pipeline_makes_no_calls() {
        let executor = ScriptedExecutor::new(vec![]);
        let run = PipelineRun::new(RunContext::Query("hello".to_string()));

        let output = Pipeline::new("empty").run(&run, &executor).await.unwrap();
        assert_eq!(output, "");
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_returns_last_stage_output() {
        let executor = ScriptedExecutor::new(vec![Ok("first".to_string()), Ok("second".to_string())]);
        let pipeline = Pipeline::new("two")
            .stage(stage("one", "A", "do one"))
            .stage(stage("two", "B", "do two"));
        let run = PipelineRun::new(RunContext::Query("q".to_string()));

        assert_eq!(pipeline.run(&run, &executor).await.unwrap(), "second");
        let seen = executor.seen();
        assert_eq!(seen[0], ("A".to_string(), "do one".to_string()));
        assert_eq!(seen[1], ("B".to_string(), "do two".to_string()));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_stages() {
        let executor = ScriptedExecutor::new(vec![
            Ok("first".to_string()),
            Err(AgentError::RateLimited("quota".to_string())),
            Ok("never".to_string()),
        ]);
        let pipeline = Pipeline::new("three")
            .stage(stage("one", "A", "x"))
            .stage(stage("two", "B", "y"))
            .stage(stage("three", "C", "z"));
        let run = PipelineRun::new(RunContext::Query("q".to_string()));

        let err = pipeline.run(&run, &executor).await.unwrap_err();
        match err {
            HealthTwinError::AgentExecution { agent, source } => {
                assert_eq!(agent, "B");
                assert!(matches!(source, AgentError::RateLimited(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(executor.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_field_stops_before_calling_agent() {
        let executor = ScriptedExecutor::new(vec![]);
        let pipeline = two_stage();
        let run = PipelineRun::new(RunContext::Query("not a record".to_string()));

        let err = pipeline.run(&run, &executor).await.unwrap_err();
        assert!(matches!(err, HealthTwinError::MissingField { .. }));
        assert_eq!(executor.calls(), 0);
    }

    #[tokio::test]
    async fn test_stage_timeout() {
        let pipeline = Pipeline::new("slow")
            .stage(stage("one", "Virtual Nurse", "x"))
            .with_stage_timeout(Duration::from_millis(50));
        let run = PipelineRun::new(RunContext::Query("q".to_string()));

        let err = pipeline.run(&run, &StalledExecutor).await.unwrap_err();
        match err {
            HealthTwinError::Timeout { agent, timeout } => {
                assert_eq!(agent, "Virtual Nurse");
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_second_stage_gets_fixed_preventive_description() {
        let executor = ScriptedExecutor::new(vec![
            Ok("RISK: high cholesterol".to_string()),
            Ok("Eat more fiber.".to_string()),
        ]);
        let run = PipelineRun::new(RunContext::Record(record()));

        let output = two_stage().run(&run, &executor).await.unwrap();
        assert_eq!(output, "Eat more fiber.");

        let seen = executor.seen();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].1.contains("- Age: 30, Gender: Male"));
        assert_eq!(seen[1].0, "Preventive Health Advisor");
        assert_eq!(seen[1].1, PREVENTIVE_CARE);
        assert!(!seen[1].1.contains("RISK: high cholesterol"));
        assert!(!seen[1].1.contains("Age: 30"));
    }

    #[tokio::test]
    async fn test_previous_output_handoff() {
        let executor = ScriptedExecutor::new(vec![
            Ok("RISK: high cholesterol".to_string()),
            Ok("plan".to_string()),
        ]);
        let pipeline = two_stage().with_handoff(HandoffMode::PreviousOutput);
        let run = PipelineRun::new(RunContext::Record(record()));

        pipeline.run(&run, &executor).await.unwrap();
        let seen = executor.seen();
        assert!(!seen[0].1.contains("Context from previous stages"));
        assert!(seen[1].1.starts_with(PREVENTIVE_CARE));
        assert!(seen[1].1.contains(
            "Context from previous stages:\n\n[risk_analysis (Health Risk Specialist)]\nRISK: high cholesterol"
        ));
    }

    #[tokio::test]
    async fn test_all_outputs_handoff() {
        let executor = ScriptedExecutor::new(vec![Ok("a1".to_string()), Ok("b1".to_string())]);
        let pipeline = Pipeline::new("three")
            .stage(stage("one", "A", "x"))
            .stage(stage("two", "B", "y"))
            .stage(stage("three", "C", "z"))
            .with_handoff(HandoffMode::AllOutputs);
        let run = PipelineRun::new(RunContext::Query("q".to_string()));

        pipeline.run(&run, &executor).await.unwrap();
        let third = &executor.seen()[2].1;
        let a = third.find("a1").unwrap();
        let b = third.find("b1").unwrap();
        assert!(a < b);
    }

    #[tokio::test]
    async fn test_derived_description_sees_history() {
        let executor = ScriptedExecutor::new(vec![Ok("RISK: high cholesterol".to_string())]);
        let pipeline = Pipeline::new("derived")
            .stage(stage("risk", "A", "find risks"))
            .stage(PipelineStage::new(
                "plan",
                AgentDescriptor::new("B", "g", "b"),
                StageDescription::derived(|history| {
                    let risks = history.get("risk").map(|o| o.text.as_str()).unwrap_or("none");
                    format!("Address these risks: {}", risks)
                }),
                "",
            ));
        let run = PipelineRun::new(RunContext::Query("q".to_string()));

        pipeline.run(&run, &executor).await.unwrap();
        assert_eq!(
            executor.seen()[1].1,
            "Address these risks: RISK: high cholesterol"
        );
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("short\nsecond line"), "short");
        let long = "x".repeat(100);
        assert_eq!(summarize(&long).chars().count(), 83);
    }

    #[test]
    fn test_description_debug() {
        let description = StageDescription::derived(|_| String::new());
        assert_eq!(format!("{:?}", description), "Derived(..)");
    }
}
