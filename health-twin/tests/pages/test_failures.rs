//! Failure handling: agent errors, timeouts, bad uploads, export failures

use std::time::Duration;

use super::common::*;
use health_twin::agent::AgentError;
use health_twin::pages::health_analysis::{self, HealthAnalysisArgs};
use health_twin::pages::risk_assessment::{self, RiskAssessmentArgs};
use health_twin::pages::PageContext;
use health_twin::record::ValidationError;
use health_twin::report::FileReportSink;
use health_twin::HealthTwinError;

fn analysis_args(file: std::path::PathBuf) -> HealthAnalysisArgs {
    HealthAnalysisArgs {
        file: Some(file),
        workflow_metadata: false,
    }
}

#[tokio::test]
async fn test_agent_failure_aborts_run_without_report() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::new();
    executor.push(Err(AgentError::ServiceError("upstream overloaded".to_string())));

    let err = health_analysis::run(&analysis_args(file), &harness.ctx(), &executor)
        .await
        .unwrap_err();

    assert!(matches!(err, HealthTwinError::AgentExecution { ref agent, .. } if agent == "Health Data Analyst"));
    assert!(!err.user_message().contains("upstream overloaded"));
    assert_eq!(executor.call_count(), 1);
    assert!(harness.report_files().is_empty());
}

#[tokio::test]
async fn test_stage_timeout() {
    let mut harness = Harness::new();
    harness.stage_timeout = Some(Duration::from_millis(50));
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::new().with_delay(Duration::from_secs(10));
    let args = RiskAssessmentArgs {
        file: Some(file),
        workflow_metadata: false,
    };

    let err = risk_assessment::run(&args, &harness.ctx(), &executor)
        .await
        .unwrap_err();

    assert!(matches!(err, HealthTwinError::Timeout { ref agent, .. } if agent == "Health Risk Specialist"));
    assert_eq!(executor.call_count(), 1);
}

#[tokio::test]
async fn test_upload_missing_key() {
    let harness = Harness::new();
    let mut survey: serde_json::Value = serde_json::from_str(&sample_survey_json()).unwrap();
    survey.as_object_mut().unwrap().remove("weight");
    let file = harness.write_file("health.json", &survey.to_string());
    let executor = MockExecutor::new();

    let err = health_analysis::run(&analysis_args(file), &harness.ctx(), &executor)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HealthTwinError::Validation(ValidationError::Missing { ref field }) if field == "weight_kg"
    ));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_upload_not_json() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", "age: 30\ngender: Male\n");
    let executor = MockExecutor::new();

    let err = health_analysis::run(&analysis_args(file), &harness.ctx(), &executor)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HealthTwinError::Validation(ValidationError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_export_failure_keeps_text() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", &sample_survey_json());
    let blocker = harness.write_file("blocked", "not a directory");
    let sink = FileReportSink::new(blocker.join("reports"));
    let ctx = PageContext {
        sink: &sink,
        roster: &harness.roster,
        handoff: harness.handoff,
        stage_timeout: None,
    };
    let executor = MockExecutor::answering(&["analysis", "the plan"]);

    let outcome = health_analysis::run(&analysis_args(file), &ctx, &executor)
        .await
        .unwrap();

    assert_eq!(outcome.text, "the plan");
    assert!(outcome.report.is_none());
    let err = outcome.export_error.expect("export error kept");
    assert!(matches!(err, HealthTwinError::Export { .. }));
    assert!(err.user_message().contains("could not be saved"));
}
