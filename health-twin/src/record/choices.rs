//! Single-choice answers offered by the health survey

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Declares a survey choice enum whose serialized form is the label shown to the user.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name of the survey field this choice answers
            pub const FIELD: &'static str = $field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.as_str()).collect()
            }

            /// Case-insensitive match against the displayed labels
            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                let wanted = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ValidationError::InvalidChoice {
                        field: $field.to_string(),
                        value: value.to_string(),
                        allowed: Self::labels().into_iter().map(String::from).collect(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

choice_enum! {
    Gender, field = "gender" {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

choice_enum! {
    ExerciseFrequency, field = "exercise" {
        Never => "Never",
        OnceOrTwiceWeekly => "1-2 times a week",
        ThreeToFiveWeekly => "3-5 times a week",
        Daily => "Daily",
    }
}

choice_enum! {
    /// Hours of sleep per night
    SleepBucket, field = "sleep" {
        UnderFive => "Less than 5",
        FiveToSeven => "5-7",
        SevenToNine => "7-9",
        OverNine => "More than 9",
    }
}

choice_enum! {
    /// Daily water intake in liters
    WaterBucket, field = "water" {
        UnderOneLiter => "Less than 1L",
        OneToTwoLiters => "1-2L",
        OverTwoLiters => "More than 2L",
    }
}

choice_enum! {
    Diet, field = "diet" {
        Balanced => "Balanced",
        MostlyJunk => "Mostly Junk",
        HighSugar => "High in Sugar",
        HighProcessed => "High in Processed Foods",
        Vegetarian => "Vegetarian",
        Vegan => "Vegan",
    }
}

choice_enum! {
    Alcohol, field = "alcohol" {
        No => "No",
        Occasionally => "Occasionally",
        Frequently => "Frequently",
    }
}

choice_enum! {
    Smoking, field = "smoking" {
        No => "No",
        Occasionally => "Occasionally",
        Yes => "Yes",
    }
}

choice_enum! {
    /// Answer to "Do you experience frequent anxiety or mood swings?"
    MentalHealth, field = "mental_health" {
        Yes => "Yes",
        No => "No",
        Occasionally => "Occasionally",
    }
}

choice_enum! {
    Allergies, field = "allergies" {
        Yes => "Yes",
        No => "No",
    }
}

choice_enum! {
    MedicationFrequency, field = "medications.frequency" {
        OnceDaily => "Once a day",
        TwiceDaily => "Twice a day",
        Weekly => "Weekly",
        NoSchedule => "None",
    }
}
