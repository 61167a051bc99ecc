//! Survey page and the JSON document it exports

use super::common::*;
use health_twin::pages::survey::{self, SurveyArgs};
use health_twin::record::{HealthRecord, ValidationError};
use health_twin::HealthTwinError;

fn complete_args() -> SurveyArgs {
    SurveyArgs {
        age: Some(30),
        gender: Some("Male".to_string()),
        height: Some(180.0),
        weight: Some(81.0),
        exercise: Some("3-5 times a week".to_string()),
        sleep: Some("7-9".to_string()),
        water: Some("More than 2L".to_string()),
        diet: Some("Balanced".to_string()),
        alcohol: Some("No".to_string()),
        smoking: Some("No".to_string()),
        allergies: Some("No".to_string()),
        stress_level: 5,
        mental_health: Some("No".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_empty_multi_selects_export_as_none() {
    let harness = Harness::new();

    let outcome = survey::run(&complete_args(), &harness.ctx()).await.unwrap();

    let report = outcome.report.expect("survey exported");
    assert_eq!(report.mime, "application/json");
    assert!(report.file_name.starts_with("health_survey_"));
    assert!(report.file_name.ends_with(".json"));

    let written = std::fs::read_to_string(&report.path).unwrap();
    assert_eq!(written, outcome.text);

    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["chronic_conditions"], serde_json::json!(["None"]));
    assert_eq!(value["family_history"], serde_json::json!(["None"]));
    assert_eq!(value["bmi"], serde_json::json!(25.0));
    assert_eq!(value["medications"], serde_json::json!([]));
}

#[tokio::test]
async fn test_exported_survey_feeds_analysis_pages() {
    let harness = Harness::new();
    let mut args = complete_args();
    args.chronic_conditions = vec!["Diabetes".to_string()];
    args.medication_name = Some("Metformin".to_string());
    args.medication_dosage = Some("850mg".to_string());
    args.medication_frequency = Some("Twice a day".to_string());
    args.health_goals = Some("Improve energy levels, Reduce stress".to_string());

    let outcome = survey::run(&args, &harness.ctx()).await.unwrap();
    let record = HealthRecord::from_json(&outcome.text).unwrap();

    assert_eq!(record.chronic_conditions(), ["Diabetes".to_string()]);
    assert_eq!(record.medications()[0].describe(), "Metformin 850mg (Twice a day)");
    assert_eq!(record.health_goals().len(), 2);
    assert_eq!(record.bmi(), 25.0);
}

#[tokio::test]
async fn test_out_of_range_answer_is_rejected() {
    let harness = Harness::new();
    let mut args = complete_args();
    args.stress_level = 11;

    let err = survey::run(&args, &harness.ctx()).await.unwrap_err();
    match err {
        HealthTwinError::Validation(ValidationError::OutOfRange { field, .. }) => {
            assert_eq!(field, "stress_level")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(harness.report_files().is_empty());
}

#[tokio::test]
async fn test_unknown_choice_is_rejected() {
    let harness = Harness::new();
    let mut args = complete_args();
    args.diet = Some("Carnivore".to_string());

    let err = survey::run(&args, &harness.ctx()).await.unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.user_message().contains("Carnivore"));
}
