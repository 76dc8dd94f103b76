use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;
use uuid::Uuid;

use assistant_cell::AssistantError;
use doctor_cell::DoctorError;
use shared_models::error::AppError;

pub const PLACEHOLDER_PATIENT_NAME: &str = "Malaysian Citizen";

const REFERENCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const REFERENCE_LENGTH: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    #[default]
    SymptomEntry,
    SpecialistSelection,
    Scheduling,
    Confirmation,
}

impl BookingStep {
    pub fn number(&self) -> u8 {
        match self {
            BookingStep::SymptomEntry => 1,
            BookingStep::SpecialistSelection => 2,
            BookingStep::Scheduling => 3,
            BookingStep::Confirmation => 4,
        }
    }

    /// Where "back" leads. Symptom entry is the start and a confirmed booking is final.
    pub fn previous(&self) -> Option<BookingStep> {
        match self {
            BookingStep::SpecialistSelection => Some(BookingStep::SymptomEntry),
            BookingStep::Scheduling => Some(BookingStep::SpecialistSelection),
            BookingStep::SymptomEntry | BookingStep::Confirmation => None,
        }
    }
}

/// A confirmed booking. Lives only as long as the session that created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub patient_name: String,
    pub symptoms: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub reminders_set: bool,
}

/// Short lowercase alphanumeric booking reference.
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    (0..REFERENCE_LENGTH)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct SymptomsRequest {
    pub symptoms: String,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub hospital: Option<String>,
    pub day: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoctorSelectionRequest {
    pub doctor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkerSelectionRequest {
    pub marker_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub date: String,
    pub time: String,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Booking session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Cannot {action} while on step {}", .step.number())]
    InvalidTransition { action: &'static str, step: BookingStep },

    #[error("A request for this step is already in progress")]
    RequestInFlight,

    #[error("The response arrived after the booking was reset or moved on")]
    StaleResponse,

    #[error("Missing {0}")]
    MissingSelection(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Assistant task did not complete: {0}")]
    Task(#[from] JoinError),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            BookingError::InvalidTransition { .. }
            | BookingError::RequestInFlight
            | BookingError::StaleResponse => AppError::Conflict(err.to_string()),
            BookingError::MissingSelection(_) | BookingError::Validation(_) => {
                AppError::ValidationError(err.to_string())
            }
            BookingError::Task(_) => AppError::Internal(err.to_string()),
            BookingError::Doctor(e) => AppError::from(e),
            BookingError::Assistant(e) => AppError::from(e),
        }
    }
}
