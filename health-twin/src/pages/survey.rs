//! Health survey form: builds a validated record and exports it as JSON
//!
//! No agent is involved. The exported document is the input of the analysis
//! and risk pages.

use clap::Args;
use health_twin_sdk::{log_info, WorkflowDefinition};
use uuid::Uuid;

use super::{Page, PageContext, PageOutcome};
use crate::error::Result;
use crate::record::{
    format_number, HealthRecord, HealthRecordInput, MedicationInput, SurveyDocument,
    ValidationError,
};
use crate::report::ReportArtifact;

pub const REPORT_STEM: &str = "health_survey";

#[derive(Debug, Clone, Default, Args, WorkflowDefinition)]
#[workflow(
    id = "health_survey",
    name = "Health Survey",
    description = "Collects basic information, habits, medical history and goals, and exports them as JSON"
)]
pub struct SurveyArgs {
    #[arg(long)]
    #[field(label = "Age", description = "[NUMBER] What is your age?", type = "number", min = "10", max = "100")]
    pub age: Option<i64>,

    #[arg(long)]
    #[field(label = "Gender", description = "[CHOICE] What is your gender?", type = "select", options = "Male|Female|Other")]
    pub gender: Option<String>,

    /// Height in cm
    #[arg(long)]
    #[field(label = "Height (cm)", description = "[NUMBER] What is your height?", type = "number", min = "50", max = "250")]
    pub height: Option<f64>,

    /// Weight in kg
    #[arg(long)]
    #[field(label = "Weight (kg)", description = "[NUMBER] What is your weight?", type = "number", min = "10", max = "300")]
    pub weight: Option<f64>,

    #[arg(long)]
    #[field(
        label = "Exercise",
        description = "[CHOICE] How often do you exercise?",
        type = "select",
        options = "Never|1-2 times a week|3-5 times a week|Daily"
    )]
    pub exercise: Option<String>,

    /// Hours of sleep per night
    #[arg(long)]
    #[field(
        label = "Sleep",
        description = "[CHOICE] How many hours of sleep do you get per night?",
        type = "select",
        options = "Less than 5|5-7|7-9|More than 9"
    )]
    pub sleep: Option<String>,

    /// Daily water intake
    #[arg(long)]
    #[field(
        label = "Water",
        description = "[CHOICE] How much water do you drink daily?",
        type = "select",
        options = "Less than 1L|1-2L|More than 2L"
    )]
    pub water: Option<String>,

    #[arg(long)]
    #[field(
        label = "Diet",
        description = "[CHOICE] How would you describe your daily diet?",
        type = "select",
        options = "Balanced|Mostly Junk|High in Sugar|High in Processed Foods|Vegetarian|Vegan"
    )]
    pub diet: Option<String>,

    #[arg(long)]
    #[field(label = "Alcohol", description = "[CHOICE] Do you consume alcohol?", type = "select", options = "No|Occasionally|Frequently")]
    pub alcohol: Option<String>,

    #[arg(long)]
    #[field(label = "Smoking", description = "[CHOICE] Do you smoke?", type = "select", options = "No|Occasionally|Yes")]
    pub smoking: Option<String>,

    /// Diagnosed chronic condition (repeatable)
    #[arg(long = "chronic-condition", value_delimiter = ',')]
    #[field(
        label = "Chronic Conditions",
        description = "[MULTI] Do you have any diagnosed chronic conditions?",
        type = "multi_select",
        options = "Diabetes|Hypertension|Heart Disease|None"
    )]
    pub chronic_conditions: Vec<String>,

    #[arg(long)]
    #[field(label = "Allergies", description = "[CHOICE] Do you have any allergies?", type = "select", options = "Yes|No")]
    pub allergies: Option<String>,

    /// Family health issue (repeatable)
    #[arg(long = "family-history", value_delimiter = ',')]
    #[field(
        label = "Family History",
        description = "[MULTI] Does your family have a history of health issues?",
        type = "multi_select",
        options = "Diabetes|Heart disease|Hypertension|None"
    )]
    pub family_history: Vec<String>,

    /// Daily stress from 1 to 10
    #[arg(long, default_value = "5")]
    #[field(
        label = "Stress Level",
        description = "[NUMBER] On a scale of 1-10, how would you rate your daily stress levels?",
        type = "number",
        min = "1",
        max = "10"
    )]
    pub stress_level: i64,

    #[arg(long)]
    #[field(
        label = "Mental Health",
        description = "[CHOICE] Do you experience frequent anxiety or mood swings?",
        type = "select",
        options = "Yes|No|Occasionally"
    )]
    pub mental_health: Option<String>,

    #[arg(long)]
    #[field(label = "Medication Name", description = "[TEXT] Medication name, if any (e.g. Metformin)", type = "text")]
    pub medication_name: Option<String>,

    #[arg(long)]
    #[field(label = "Dosage", description = "[TEXT] Dosage (e.g. 850mg)", type = "text")]
    pub medication_dosage: Option<String>,

    #[arg(long)]
    #[field(
        label = "Frequency",
        description = "[CHOICE] How often do you take it?",
        type = "select",
        options = "Once a day|Twice a day|Weekly|None"
    )]
    pub medication_frequency: Option<String>,

    /// Comma-separated supplements
    #[arg(long)]
    #[field(label = "Supplements", description = "[TEXT] Do you take any supplements? (e.g. Vitamin D, Omega-3)", type = "text")]
    pub supplements: Option<String>,

    /// Comma-separated health goals
    #[arg(long)]
    #[field(label = "Health Goals", description = "[TEXT] What are your health goals? (e.g. Improve energy levels, Reduce stress)", type = "text")]
    pub health_goals: Option<String>,

    /// Print page metadata as JSON and exit
    #[arg(long, hide = true)]
    pub workflow_metadata: bool,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(|item| item.trim().to_string()).collect())
        .unwrap_or_default()
}

impl SurveyArgs {
    /// Form answers as raw record input; validation happens in [`HealthRecord::new`]
    pub fn to_input(&self) -> HealthRecordInput {
        let medications = match self.medication_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => vec![MedicationInput {
                name: name.to_string(),
                dosage: self.medication_dosage.clone().unwrap_or_default(),
                frequency: self.medication_frequency.clone(),
            }],
            _ => Vec::new(),
        };

        HealthRecordInput {
            age: self.age,
            gender: self.gender.clone(),
            height_cm: self.height,
            weight_kg: self.weight,
            exercise: self.exercise.clone(),
            sleep: self.sleep.clone(),
            water: self.water.clone(),
            diet: self.diet.clone(),
            alcohol: self.alcohol.clone(),
            smoking: self.smoking.clone(),
            chronic_conditions: self.chronic_conditions.clone(),
            allergies: self.allergies.clone(),
            family_history: self.family_history.clone(),
            stress_level: Some(self.stress_level),
            mental_health: self.mental_health.clone(),
            medications,
            supplements: split_list(self.supplements.as_deref()),
            health_goals: split_list(self.health_goals.as_deref()),
        }
    }
}

pub async fn run(args: &SurveyArgs, ctx: &PageContext<'_>) -> Result<PageOutcome> {
    let record = HealthRecord::new(args.to_input())?;
    log_info!(
        "📊 Your BMI: {} ({}, healthy range: 18.5 - 24.9)",
        format_number(record.bmi()),
        record.bmi_category().as_str()
    );

    let document = SurveyDocument::from(&record);
    let json = document
        .to_json_pretty()
        .map_err(|e| ValidationError::Malformed(format!("cannot serialize survey: {}", e)))?;

    let mut outcome = PageOutcome::new(Page::Survey, Uuid::new_v4(), json);
    let artifact = ReportArtifact::json(REPORT_STEM, outcome.text.clone());
    ctx.export(&mut outcome, &artifact).await;
    Ok(outcome)
}
