//! JSON document offered for download by the survey page
//!
//! The key layout is the one the analysis pages accept as an upload, so a
//! downloaded survey can be fed straight back into them.

use serde::{Serialize, Serializer};

use super::health_record::{HealthRecord, Medication};
use super::choices::*;

#[derive(Debug, Clone, Serialize)]
pub struct SurveyDocument {
    pub age: u8,
    pub gender: Gender,
    #[serde(serialize_with = "serialize_measure")]
    pub height: f64,
    #[serde(serialize_with = "serialize_measure")]
    pub weight: f64,
    pub bmi: f64,
    pub exercise: ExerciseFrequency,
    pub sleep: SleepBucket,
    pub water: WaterBucket,
    pub diet: Diet,
    pub alcohol: Alcohol,
    pub smoking: Smoking,
    pub chronic_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Allergies>,
    pub family_history: Vec<String>,
    pub stress_level: u8,
    pub mental_health: MentalHealth,
    pub medications: Vec<Medication>,
    pub supplements: Vec<String>,
    pub health_goals: Vec<String>,
}

impl From<&HealthRecord> for SurveyDocument {
    fn from(record: &HealthRecord) -> Self {
        Self {
            age: record.age(),
            gender: record.gender(),
            height: record.height_cm(),
            weight: record.weight_kg(),
            bmi: record.bmi(),
            exercise: record.exercise(),
            sleep: record.sleep(),
            water: record.water(),
            diet: record.diet(),
            alcohol: record.alcohol(),
            smoking: record.smoking(),
            chronic_conditions: record.chronic_conditions().to_vec(),
            allergies: record.allergies(),
            family_history: record.family_history().to_vec(),
            stress_level: record.stress_level(),
            mental_health: record.mental_health(),
            medications: record.medications().to_vec(),
            supplements: record.supplements().to_vec(),
            health_goals: record.health_goals().to_vec(),
        }
    }
}

impl SurveyDocument {
    /// Pretty JSON with four-space indentation
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Whole-number measurements are written as integers (`180`, not `180.0`)
fn serialize_measure<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
