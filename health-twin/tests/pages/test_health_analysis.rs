//! Health analysis page: analyst report, lifestyle plan, markdown export

use super::common::*;
use health_twin::pages::health_analysis::{self, HealthAnalysisArgs, LIFESTYLE_PLAN};
use health_twin::pages::Page;
use health_twin::pipeline::HandoffMode;

fn args(file: std::path::PathBuf) -> HealthAnalysisArgs {
    HealthAnalysisArgs {
        file: Some(file),
        workflow_metadata: false,
    }
}

#[tokio::test]
async fn test_analysis_runs_both_stages_and_exports_markdown() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::answering(&["Observations: elevated stress.", "## Your plan\nSleep 8h."]);

    let outcome = health_analysis::run(&args(file), &harness.ctx(), &executor)
        .await
        .unwrap();

    assert_eq!(outcome.page, Page::HealthAnalysis);
    assert_eq!(outcome.text, "## Your plan\nSleep 8h.");

    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].role, "Health Data Analyst");
    assert!(calls[0].description.starts_with("Analyze the following health data:\n"));
    assert!(calls[0].description.contains("Age: 30, Gender: Male"));
    assert!(calls[0].description.contains("Height: 180 cm, Weight: 81 kg, BMI: 25.00"));
    assert!(calls[0].description.contains("Family History: Diabetes, Heart disease"));
    assert!(calls[0].description.contains("Medications: Lisinopril 10mg (Once a day)"));
    assert!(calls[0]
        .expected_output
        .starts_with("A structured report summarizing the health risks"));
    assert_eq!(calls[1].role, "AI Health Advisor");
    assert_eq!(calls[1].description, LIFESTYLE_PLAN);

    let report = outcome.report.expect("report exported");
    assert_eq!(report.mime, "text/markdown");
    assert_eq!(report.file_name, format!("health_report_{}.md", outcome.run_id));
    assert_eq!(std::fs::read_to_string(&report.path).unwrap(), outcome.text);
    assert!(outcome.export_error.is_none());
}

#[tokio::test]
async fn test_two_runs_produce_two_reports() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::new();

    let first = health_analysis::run(&args(file.clone()), &harness.ctx(), &executor)
        .await
        .unwrap();
    let second = health_analysis::run(&args(file), &harness.ctx(), &executor)
        .await
        .unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(harness.report_files().len(), 2);
}

#[tokio::test]
async fn test_previous_output_handoff_reaches_advisor() {
    let mut harness = Harness::new();
    harness.handoff = HandoffMode::PreviousOutput;
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::answering(&["Key risk: hypertension.", "plan"]);

    health_analysis::run(&args(file), &harness.ctx(), &executor)
        .await
        .unwrap();

    let advisor = &executor.calls()[1];
    assert!(advisor.description.starts_with(LIFESTYLE_PLAN));
    assert!(advisor.description.contains("Key risk: hypertension."));
}

#[tokio::test]
async fn test_missing_file_argument_is_validation_error() {
    let harness = Harness::new();
    let executor = MockExecutor::new();
    let args = HealthAnalysisArgs {
        file: None,
        workflow_metadata: false,
    };

    let err = health_analysis::run(&args, &harness.ctx(), &executor)
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("file"));
    assert_eq!(executor.call_count(), 0);
}
