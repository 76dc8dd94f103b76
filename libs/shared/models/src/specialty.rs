use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of medical disciplines used to tag doctors and to classify
/// symptom recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    Cardiology,
    Dermatology,
    #[serde(rename = "General Practice")]
    GeneralPractice,
    Orthopedics,
    Pediatrics,
    Neurology,
    Gynecology,
    Ophthalmology,
}

impl Specialty {
    pub const ALL: [Specialty; 8] = [
        Specialty::Cardiology,
        Specialty::Dermatology,
        Specialty::GeneralPractice,
        Specialty::Orthopedics,
        Specialty::Pediatrics,
        Specialty::Neurology,
        Specialty::Gynecology,
        Specialty::Ophthalmology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Cardiology => "Cardiology",
            Specialty::Dermatology => "Dermatology",
            Specialty::GeneralPractice => "General Practice",
            Specialty::Orthopedics => "Orthopedics",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Neurology => "Neurology",
            Specialty::Gynecology => "Gynecology",
            Specialty::Ophthalmology => "Ophthalmology",
        }
    }

    /// Comma separated list of every specialty name, as offered to the model.
    pub fn catalogue() -> String {
        Self::ALL
            .iter()
            .map(Specialty::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown specialty: {0}")]
pub struct UnknownSpecialty(pub String);

impl FromStr for Specialty {
    type Err = UnknownSpecialty;

    // Accepts "General Practice", "general-practice", "GENERAL_PRACTICE" and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|specialty| specialty.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| UnknownSpecialty(s.to_string()))
    }
}
