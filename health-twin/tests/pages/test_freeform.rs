//! Free-text pages: educator, therapist and virtual nurse

use super::common::*;
use health_twin::pages::educator::{self, EducatorArgs};
use health_twin::pages::nurse::{self, NurseArgs};
use health_twin::pages::therapist::{self, TherapistArgs};
use health_twin::HealthTwinError;

#[tokio::test]
async fn test_educator_wraps_question() {
    let harness = Harness::new();
    let executor = MockExecutor::answering(&["  Moderate coffee intake is fine.\n"]);
    let args = EducatorArgs {
        question: Some("Is coffee bad for me?".to_string()),
        workflow_metadata: false,
    };

    let outcome = educator::run(&args, &harness.ctx(), &executor).await.unwrap();

    assert_eq!(outcome.text, "Moderate coffee intake is fine.");
    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].role, "AI Health Educator");
    assert_eq!(
        calls[0].description,
        "Answer this health-related question in a clear and concise manner: Is coffee bad for me?"
    );
}

#[tokio::test]
async fn test_blank_question_never_reaches_agent() {
    let harness = Harness::new();
    let executor = MockExecutor::new();
    let args = EducatorArgs {
        question: Some("   ".to_string()),
        workflow_metadata: false,
    };

    let err = educator::run(&args, &harness.ctx(), &executor).await.unwrap_err();
    assert!(matches!(err, HealthTwinError::Validation(_)));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_therapist_conversation() {
    let harness = Harness::new();
    let executor = MockExecutor::new();
    let args = TherapistArgs {
        message: Some("I feel overwhelmed at work.".to_string()),
        workflow_metadata: false,
    };

    let outcome = therapist::run(&args, &harness.ctx(), &executor).await.unwrap();

    assert_eq!(outcome.text, "answer from AI Therapist");
    let call = &executor.calls()[0];
    assert_eq!(
        call.description,
        "Engage in a supportive, empathetic conversation. The user says: I feel overwhelmed at work."
    );
    assert!(call.expected_output.contains("encouraging response"));
}

#[tokio::test]
async fn test_nurse_runs_symptoms_then_medication() {
    let harness = Harness::new();
    let executor = MockExecutor::answering(&["Likely a cold.", "Take it after breakfast."]);
    let args = NurseArgs {
        symptoms: Some("sore throat and mild fever".to_string()),
        medication: Some("Paracetamol 500mg".to_string()),
        workflow_metadata: false,
    };

    let outcome = nurse::run(&args, &harness.ctx(), &executor).await.unwrap();

    assert_eq!(outcome.text, "Take it after breakfast.");
    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.role == "Virtual Nurse"));
    assert!(calls[0]
        .description
        .starts_with("Analyze the patient's symptoms: sore throat and mild fever. Provide possible causes"));
    assert_eq!(
        calls[1].description,
        "Remind the patient to take Paracetamol 500mg at the correct time with proper dosage instructions."
    );
}

#[tokio::test]
async fn test_nurse_requires_medication() {
    let harness = Harness::new();
    let executor = MockExecutor::new();
    let args = NurseArgs {
        symptoms: Some("headache".to_string()),
        medication: None,
        workflow_metadata: false,
    };

    let err = nurse::run(&args, &harness.ctx(), &executor).await.unwrap_err();
    assert!(err.to_string().contains("medication"));
    assert_eq!(executor.call_count(), 0);
}
