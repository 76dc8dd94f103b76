use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::{Coordinates, Specialty};

/// Slots offered on the scheduling step, in display order.
pub const TIME_SLOTS: [&str; 4] = ["09:00 AM", "10:30 AM", "02:00 PM", "04:00 PM"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: Specialty,
    pub hospital: String,
    pub location: String,
    pub coords: Option<Coordinates>,
    pub rating: f32, // 0.0 to 5.0
    pub availability: Vec<String>, // weekday names, e.g. "Monday"
    pub experience: u32,
    pub image: String,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub affiliations: Vec<String>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

impl Doctor {
    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.availability
            .iter()
            .filter_map(|d| d.parse::<Weekday>().ok())
            .any(|d| d == day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub name: String,
    pub comment: String,
    pub rating: u8,
    pub date: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DoctorError {
    #[error("Doctor not found: {0}")]
    NotFound(String),

    #[error("Unknown map marker: {0}")]
    UnknownMarker(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(_) | DoctorError::UnknownMarker(_) => AppError::NotFound(err.to_string()),
            DoctorError::InvalidFilter(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
