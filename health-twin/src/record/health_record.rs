//! Validated health survey snapshot

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::choices::*;
use super::{format_number, ValidationError};
use crate::prompt::PromptFields;

/// Placeholder stored for an empty multi-select answer
pub const NONE_SENTINEL: &str = "None";

const AGE_RANGE: RangeInclusive<i64> = 10..=100;
const HEIGHT_RANGE_CM: RangeInclusive<f64> = 50.0..=250.0;
const WEIGHT_RANGE_KG: RangeInclusive<f64> = 10.0..=300.0;
const STRESS_RANGE: RangeInclusive<i64> = 1..=10;

/// Raw medication entry as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicationInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: Option<String>,
}

/// Raw field values from the survey form or an uploaded JSON file
///
/// Every field is optional here so that a missing answer becomes a
/// [`ValidationError::Missing`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRecordInput {
    pub age: Option<i64>,
    pub gender: Option<String>,
    #[serde(alias = "height")]
    pub height_cm: Option<f64>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    pub exercise: Option<String>,
    pub sleep: Option<String>,
    pub water: Option<String>,
    pub diet: Option<String>,
    pub alcohol: Option<String>,
    pub smoking: Option<String>,
    pub chronic_conditions: Vec<String>,
    pub allergies: Option<String>,
    pub family_history: Vec<String>,
    pub stress_level: Option<i64>,
    pub mental_health: Option<String>,
    pub medications: Vec<MedicationInput>,
    pub supplements: Vec<String>,
    pub health_goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: Option<MedicationFrequency>,
}

impl Medication {
    /// `Metformin 850mg (Twice a day)`
    pub fn describe(&self) -> String {
        let mut text = self.name.clone();
        if !self.dosage.is_empty() {
            text.push(' ');
            text.push_str(&self.dosage);
        }
        if let Some(frequency) = self.frequency {
            if frequency != MedicationFrequency::NoSchedule {
                text.push_str(&format!(" ({})", frequency));
            }
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Healthy
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Healthy => "Healthy",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

/// BMI rounded to two decimals, exact halves to even
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 100.0).round_ties_even() / 100.0
}

/// One user's validated survey snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecord {
    age: u8,
    gender: Gender,
    height_cm: f64,
    weight_kg: f64,
    exercise: ExerciseFrequency,
    sleep: SleepBucket,
    water: WaterBucket,
    diet: Diet,
    alcohol: Alcohol,
    smoking: Smoking,
    chronic_conditions: Vec<String>,
    allergies: Option<Allergies>,
    family_history: Vec<String>,
    stress_level: u8,
    mental_health: MentalHealth,
    medications: Vec<Medication>,
    supplements: Vec<String>,
    health_goals: Vec<String>,
}

impl HealthRecord {
    pub fn new(input: HealthRecordInput) -> Result<Self, ValidationError> {
        let age = check_int("age", input.age, AGE_RANGE)?;
        let height_cm = check_measure("height_cm", input.height_cm, HEIGHT_RANGE_CM)?;
        let weight_kg = check_measure("weight_kg", input.weight_kg, WEIGHT_RANGE_KG)?;
        let stress_level = check_int("stress_level", input.stress_level, STRESS_RANGE)?;

        let medications = input
            .medications
            .into_iter()
            .filter(|m| !m.name.trim().is_empty())
            .map(|m| {
                let frequency = match m.frequency.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(value) => Some(MedicationFrequency::parse(value)?),
                };
                Ok(Medication {
                    name: m.name.trim().to_string(),
                    dosage: m.dosage.trim().to_string(),
                    frequency,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let allergies = match input.allergies.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(Allergies::parse(value)?),
        };

        Ok(Self {
            age: age as u8,
            gender: required_choice(input.gender.as_deref())?,
            height_cm,
            weight_kg,
            exercise: required_choice(input.exercise.as_deref())?,
            sleep: required_choice(input.sleep.as_deref())?,
            water: required_choice(input.water.as_deref())?,
            diet: required_choice(input.diet.as_deref())?,
            alcohol: required_choice(input.alcohol.as_deref())?,
            smoking: required_choice(input.smoking.as_deref())?,
            chronic_conditions: normalize_set(input.chronic_conditions),
            allergies,
            family_history: normalize_set(input.family_history),
            stress_level: stress_level as u8,
            mental_health: required_choice(input.mental_health.as_deref())?,
            medications,
            supplements: normalize_list(input.supplements),
            health_goals: normalize_list(input.health_goals),
        })
    }

    /// Validate an uploaded survey document against the record schema
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(ValidationError::Malformed(
                "expected a JSON object with survey fields".to_string(),
            ));
        }
        let input: HealthRecordInput =
            serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
        Self::new(input)
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn bmi(&self) -> f64 {
        compute_bmi(self.height_cm, self.weight_kg)
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }

    pub fn exercise(&self) -> ExerciseFrequency {
        self.exercise
    }

    pub fn sleep(&self) -> SleepBucket {
        self.sleep
    }

    pub fn water(&self) -> WaterBucket {
        self.water
    }

    pub fn diet(&self) -> Diet {
        self.diet
    }

    pub fn alcohol(&self) -> Alcohol {
        self.alcohol
    }

    pub fn smoking(&self) -> Smoking {
        self.smoking
    }

    pub fn chronic_conditions(&self) -> &[String] {
        &self.chronic_conditions
    }

    pub fn allergies(&self) -> Option<Allergies> {
        self.allergies
    }

    pub fn family_history(&self) -> &[String] {
        &self.family_history
    }

    pub fn stress_level(&self) -> u8 {
        self.stress_level
    }

    pub fn mental_health(&self) -> MentalHealth {
        self.mental_health
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn supplements(&self) -> &[String] {
        &self.supplements
    }

    pub fn health_goals(&self) -> &[String] {
        &self.health_goals
    }

    /// Flat label → text view used by prompt templates
    pub fn to_prompt_fields(&self) -> PromptFields {
        let medications: Vec<String> = self.medications.iter().map(Medication::describe).collect();

        PromptFields::new()
            .with("age", self.age.to_string())
            .with("gender", self.gender.as_str())
            .with("height_cm", format_number(self.height_cm))
            .with("weight_kg", format_number(self.weight_kg))
            .with("bmi", format!("{:.2}", self.bmi()))
            .with("exercise", self.exercise.as_str())
            .with("sleep", self.sleep.as_str())
            .with("water", self.water.as_str())
            .with("diet", self.diet.as_str())
            .with("alcohol", self.alcohol.as_str())
            .with("smoking", self.smoking.as_str())
            .with("chronic_conditions", join_or_none(&self.chronic_conditions))
            .with(
                "allergies",
                self.allergies.map(|a| a.as_str()).unwrap_or("Not reported"),
            )
            .with("family_history", join_or_none(&self.family_history))
            .with("stress_level", self.stress_level.to_string())
            .with("mental_health", self.mental_health.as_str())
            .with("medications", join_or_none(&medications))
            .with("supplements", join_or_none(&self.supplements))
            .with("health_goals", join_or_none(&self.health_goals))
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        NONE_SENTINEL.to_string()
    } else {
        values.join(", ")
    }
}

fn check_int(
    field: &str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Result<i64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::Missing {
        field: field.to_string(),
    })?;
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        });
    }
    Ok(value)
}

fn check_measure(
    field: &str,
    value: Option<f64>,
    range: RangeInclusive<f64>,
) -> Result<f64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::Missing {
        field: field.to_string(),
    })?;
    // NaN fails `contains`
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(value)
}

/// Choice enums generated by `choice_enum!` all expose `FIELD` and `parse`.
trait SurveyChoice: Sized {
    const FIELD_NAME: &'static str;
    fn parse_label(value: &str) -> Result<Self, ValidationError>;
}

macro_rules! survey_choice {
    ($($ty:ty),+) => {
        $(
            impl SurveyChoice for $ty {
                const FIELD_NAME: &'static str = <$ty>::FIELD;
                fn parse_label(value: &str) -> Result<Self, ValidationError> {
                    <$ty>::parse(value)
                }
            }
        )+
    };
}

survey_choice!(
    Gender,
    ExerciseFrequency,
    SleepBucket,
    WaterBucket,
    Diet,
    Alcohol,
    Smoking,
    MentalHealth
);

fn required_choice<T: SurveyChoice>(value: Option<&str>) -> Result<T, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Err(ValidationError::Missing {
            field: T::FIELD_NAME.to_string(),
        }),
        Some(value) => T::parse_label(value),
    }
}

/// Trim, drop blanks and duplicates; an empty set becomes `["None"]`.
fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(value)) {
            continue;
        }
        seen.push(value.to_string());
    }

    // "None" next to real entries is noise from the multiselect widget
    if seen.iter().any(|s| !s.eq_ignore_ascii_case(NONE_SENTINEL)) {
        seen.retain(|s| !s.eq_ignore_ascii_case(NONE_SENTINEL));
    }

    if seen.is_empty() {
        vec![NONE_SENTINEL.to_string()]
    } else {
        seen
    }
}

fn normalize_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
