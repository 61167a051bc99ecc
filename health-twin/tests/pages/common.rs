//! Common utilities for page tests

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use health_twin::agent::{AgentError, AgentExecutor, AgentRequest, AgentRoster};
use health_twin::pages::PageContext;
use health_twin::pipeline::HandoffMode;
use health_twin::report::FileReportSink;
use tempfile::TempDir;

/// One call received by [`MockExecutor`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub role: String,
    pub description: String,
    pub expected_output: String,
}

/// Agent engine answering from a script; unscripted calls get a canned reply
pub struct MockExecutor {
    answers: Mutex<VecDeque<Result<String, AgentError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn answering(answers: &[&str]) -> Self {
        let executor = Self::new();
        for answer in answers {
            executor.push(Ok(answer.to_string()));
        }
        executor
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, answer: Result<String, AgentError>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentExecutor for MockExecutor {
    async fn execute(&self, request: AgentRequest<'_>) -> Result<String, AgentError> {
        self.calls.lock().unwrap().push(RecordedCall {
            role: request.agent.role.clone(),
            description: request.description.to_string(),
            expected_output: request.expected_output.to_string(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.answers.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(format!("answer from {}", request.agent.role)))
    }
}

/// Scratch report directory plus the shared page dependencies
pub struct Harness {
    pub dir: TempDir,
    pub sink: FileReportSink,
    pub roster: AgentRoster,
    pub handoff: HandoffMode,
    pub stage_timeout: Option<Duration>,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let sink = FileReportSink::new(dir.path().join("reports"));
        Self {
            dir,
            sink,
            roster: AgentRoster::default(),
            handoff: HandoffMode::None,
            stage_timeout: None,
        }
    }

    pub fn ctx(&self) -> PageContext<'_> {
        PageContext {
            sink: &self.sink,
            roster: &self.roster,
            handoff: self.handoff,
            stage_timeout: self.stage_timeout,
        }
    }

    /// Write `content` into the scratch directory and return its path
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn report_files(&self) -> Vec<PathBuf> {
        let dir = self.dir.path().join("reports");
        if !dir.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        files.sort();
        files
    }
}

/// Survey document as exported by the survey page
pub fn sample_survey_json() -> String {
    r#"{
    "age": 30,
    "gender": "Male",
    "height": 180,
    "weight": 81,
    "bmi": 25.0,
    "exercise": "1-2 times a week",
    "sleep": "5-7",
    "water": "1-2L",
    "diet": "High in Sugar",
    "alcohol": "Occasionally",
    "smoking": "No",
    "chronic_conditions": ["Hypertension"],
    "allergies": "No",
    "family_history": ["Diabetes", "Heart disease"],
    "stress_level": 7,
    "mental_health": "Occasionally",
    "medications": [
        {"name": "Lisinopril", "dosage": "10mg", "frequency": "Once a day"}
    ],
    "supplements": ["Vitamin D"],
    "health_goals": ["Lower blood pressure", "Sleep better"]
}"#
    .to_string()
}
