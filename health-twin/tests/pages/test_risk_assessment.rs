//! Risk assessment page: bulleted risk analysis, then fixed preventive care

use super::common::*;
use health_twin::pages::risk_assessment::{self, RiskAssessmentArgs, PREVENTIVE_CARE};
use health_twin::pages::Page;

#[tokio::test]
async fn test_preventive_stage_gets_fixed_description() {
    let harness = Harness::new();
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::answering(&["RISK: high cholesterol", "Eat more fiber."]);
    let args = RiskAssessmentArgs {
        file: Some(file),
        workflow_metadata: false,
    };

    let outcome = risk_assessment::run(&args, &harness.ctx(), &executor)
        .await
        .unwrap();

    assert_eq!(outcome.page, Page::RiskAssessment);
    assert_eq!(outcome.text, "Eat more fiber.");
    assert!(outcome.report.is_none());
    assert!(harness.report_files().is_empty());

    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].role, "Health Risk Specialist");
    assert!(calls[0].description.contains("Consider the following factors:\n- Age: 30, Gender: Male\n"));
    assert!(calls[0].description.contains("- Stress Level: 7/10, Mental Health: Occasionally"));

    assert_eq!(calls[1].role, "Preventive Health Advisor");
    assert_eq!(calls[1].description, PREVENTIVE_CARE);
    assert!(!calls[1].description.contains("RISK: high cholesterol"));
    assert!(!calls[1].description.contains("Age: 30"));
}

#[tokio::test]
async fn test_roster_overrides_agents() {
    let mut harness = Harness::new();
    harness.roster = health_twin::agent::AgentRoster::from_yaml(
        "preventive_advisor:\n  role: Family Doctor\n  goal: Keep patients well.\n  backstory: Runs a rural practice.\n",
    )
    .unwrap();
    let file = harness.write_file("health.json", &sample_survey_json());
    let executor = MockExecutor::new();
    let args = RiskAssessmentArgs {
        file: Some(file),
        workflow_metadata: false,
    };

    let outcome = risk_assessment::run(&args, &harness.ctx(), &executor)
        .await
        .unwrap();

    assert_eq!(outcome.text, "answer from Family Doctor");
    assert_eq!(executor.calls()[0].role, "Health Risk Specialist");
}
