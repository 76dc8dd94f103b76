use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_genai::GenAiError;
use shared_models::error::AppError;
use shared_models::{Coordinates, GroundingSource, Specialty};

/// Advisory urgency attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFacility {
    pub name: String,
    pub category: String,
    pub highlight: String,
    pub coords: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub recommended_specialty: Specialty,
    pub reasoning: String,
    pub urgency: Urgency,
    #[serde(default)]
    pub suggested_facilities: Vec<SuggestedFacility>,
    #[serde(default)]
    pub search_sources: Vec<GroundingSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub symptoms: String,
}

/// Inputs for travel guidance. Destination, date and time are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub destination: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub location: Option<Coordinates>,
}

impl NavigationRequest {
    pub fn validate(&self) -> Result<(), AssistantError> {
        let missing: Vec<&str> = [
            ("destination", &self.destination),
            ("date", &self.date),
            ("time", &self.time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AssistantError::InvalidInput(format!("missing {}", missing.join(", "))))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationAdvice {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generative AI returned an empty response")]
    EmptyResponse,

    #[error("Malformed recommendation payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Recommended specialty is not offered: {0}")]
    UnknownSpecialty(String),

    #[error("Generative AI request failed: {0}")]
    Upstream(#[from] GenAiError),
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::InvalidInput(_) => AppError::ValidationError(err.to_string()),
            AssistantError::Upstream(GenAiError::MissingApiKey) => AppError::Internal(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}
