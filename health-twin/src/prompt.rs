//! Prompt rendering
//!
//! [`render`] turns a [`PromptTemplate`] and a [`RunContext`] into the task
//! description handed to an agent. Rendering is pure: the same template and
//! context always produce the same bytes.

use std::collections::BTreeMap;

use crate::error::{HealthTwinError, Result};
use crate::record::HealthRecord;

/// Flat mapping of field key → human-readable value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFields(BTreeMap<String, String>);

impl PromptFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a field a template cannot do without; blank values count as missing.
    pub fn require(&self, key: &str, template: &str) -> Result<&str> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(HealthTwinError::missing_field(key, template)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PromptFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// What a pipeline run was started with
#[derive(Debug, Clone, PartialEq)]
pub enum RunContext {
    /// A validated survey snapshot
    Record(HealthRecord),
    /// A single free-text utterance, exposed to templates as `query`
    Query(String),
    /// Several named free-text inputs
    Inputs(PromptFields),
}

impl RunContext {
    pub fn prompt_fields(&self) -> PromptFields {
        match self {
            Self::Record(record) => record.to_prompt_fields(),
            Self::Query(query) => PromptFields::new().with(QUERY_FIELD, query.as_str()),
            Self::Inputs(fields) => fields.clone(),
        }
    }
}

/// Key under which [`RunContext::Query`] exposes its text
pub const QUERY_FIELD: &str = "query";

/// One segment of an analysis line: `Label: {value}{suffix}`
struct Segment {
    label: &'static str,
    key: &'static str,
    suffix: &'static str,
}

const fn seg(label: &'static str, key: &'static str, suffix: &'static str) -> Segment {
    Segment { label, key, suffix }
}

/// Layout of the health data block; segments on one line are joined with ", ".
const ANALYSIS_LINES: &[&[Segment]] = &[
    &[seg("Age", "age", ""), seg("Gender", "gender", "")],
    &[
        seg("Height", "height_cm", " cm"),
        seg("Weight", "weight_kg", " kg"),
        seg("BMI", "bmi", ""),
    ],
    &[
        seg("Sleep", "sleep", " hours"),
        seg("Water Intake", "water", " per day"),
    ],
    &[seg("Exercise", "exercise", ""), seg("Diet", "diet", "")],
    &[seg("Alcohol", "alcohol", ""), seg("Smoking", "smoking", "")],
    &[seg("Chronic Conditions", "chronic_conditions", "")],
    &[seg("Allergies", "allergies", "")],
    &[seg("Family History", "family_history", "")],
    &[
        seg("Stress Level", "stress_level", "/10"),
        seg("Mental Health", "mental_health", ""),
    ],
    &[seg("Medications", "medications", "")],
    &[seg("Supplements", "supplements", "")],
    &[seg("Health Goals", "health_goals", "")],
];

/// Template kinds used by the pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Expands every health record field into a multi-line description
    Analysis {
        name: String,
        preamble: String,
        closing: String,
        bulleted: bool,
    },
    /// Wraps one named free-text input between a prefix and a suffix
    Freeform {
        name: String,
        prefix: String,
        input: String,
        suffix: String,
    },
}

impl PromptTemplate {
    pub fn analysis(
        name: impl Into<String>,
        preamble: impl Into<String>,
        closing: impl Into<String>,
    ) -> Self {
        Self::Analysis {
            name: name.into(),
            preamble: preamble.into(),
            closing: closing.into(),
            bulleted: false,
        }
    }

    /// Same as [`PromptTemplate::analysis`] with `- ` before every data line
    pub fn bulleted_analysis(
        name: impl Into<String>,
        preamble: impl Into<String>,
        closing: impl Into<String>,
    ) -> Self {
        Self::Analysis {
            name: name.into(),
            preamble: preamble.into(),
            closing: closing.into(),
            bulleted: true,
        }
    }

    /// Free-text template reading the `query` input
    pub fn freeform(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Freeform {
            name: name.into(),
            prefix: prefix.into(),
            input: QUERY_FIELD.to_string(),
            suffix: String::new(),
        }
    }

    pub fn freeform_input(
        name: impl Into<String>,
        prefix: impl Into<String>,
        input: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self::Freeform {
            name: name.into(),
            prefix: prefix.into(),
            input: input.into(),
            suffix: suffix.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Analysis { name, .. } | Self::Freeform { name, .. } => name,
        }
    }

    /// Field keys this template cannot render without
    pub fn required_fields(&self) -> Vec<&str> {
        match self {
            Self::Analysis { .. } => ANALYSIS_LINES
                .iter()
                .flat_map(|line| line.iter().map(|s| s.key))
                .collect(),
            Self::Freeform { input, .. } => vec![input.as_str()],
        }
    }

    pub fn render_fields(&self, fields: &PromptFields) -> Result<String> {
        match self {
            Self::Analysis {
                name,
                preamble,
                closing,
                bulleted,
            } => {
                let bullet = if *bulleted { "- " } else { "" };
                let mut lines = Vec::with_capacity(ANALYSIS_LINES.len() + 3);
                lines.push(preamble.trim().to_string());

                for line in ANALYSIS_LINES {
                    let parts = line
                        .iter()
                        .map(|s| {
                            fields
                                .require(s.key, name)
                                .map(|value| format!("{}: {}{}", s.label, value.trim(), s.suffix))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    lines.push(format!("{}{}", bullet, parts.join(", ")));
                }

                lines.push(String::new());
                lines.push(closing.trim().to_string());
                Ok(lines.join("\n"))
            }
            Self::Freeform {
                name,
                prefix,
                input,
                suffix,
            } => {
                let value = fields.require(input, name)?;
                Ok(format!("{}{}{}", prefix, value.trim(), suffix))
            }
        }
    }
}

/// Render `template` against the run's context
pub fn render(template: &PromptTemplate, context: &RunContext) -> Result<String> {
    template.render_fields(&context.prompt_fields())
}
