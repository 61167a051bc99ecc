//! Health record data model
//!
//! A [`HealthRecord`] is built once per submission from raw form or JSON values
//! ([`HealthRecordInput`]) and never changes afterwards. Validation happens at
//! construction; the BMI is derived from height and weight on every access.

pub mod choices;
pub mod health_record;
pub mod survey;

use thiserror::Error;

pub use choices::{
    Alcohol, Allergies, Diet, ExerciseFrequency, Gender, MedicationFrequency, MentalHealth,
    SleepBucket, Smoking, WaterBucket,
};
pub use health_record::{
    compute_bmi, BmiCategory, HealthRecord, HealthRecordInput, Medication, MedicationInput,
    NONE_SENTINEL,
};
pub use survey::SurveyDocument;

/// Why a submission was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("`{field}` is required")]
    Missing { field: String },

    #[error("`{field}` must be one of [{}], got `{value}`", .allowed.join(", "))]
    InvalidChoice {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("malformed health data: {0}")]
    Malformed(String),
}

/// Formats a measurement without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(180.0), "180");
        assert_eq!(format_number(72.5), "72.5");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: "age".to_string(),
            value: 7.0,
            min: 10.0,
            max: 100.0,
        };
        assert_eq!(err.to_string(), "`age` must be between 10 and 100, got 7");
    }
}
