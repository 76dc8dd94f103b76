use chrono::Weekday;
use serde::{Deserialize, Serialize};

use shared_models::Specialty;

use crate::models::Doctor;

/// Client-side doctor filter. Unset fields place no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorFilter {
    pub specialty: Option<Specialty>,
    pub hospital: Option<String>,
    pub day: Option<Weekday>,
}

impl DoctorFilter {
    pub fn for_specialty(specialty: Specialty) -> Self {
        Self {
            specialty: Some(specialty),
            ..Self::default()
        }
    }

    pub fn with_hospital(mut self, hospital: Option<String>) -> Self {
        self.hospital = hospital.filter(|h| !h.trim().is_empty());
        self
    }

    pub fn with_day(mut self, day: Option<Weekday>) -> Self {
        self.day = day;
        self
    }

    /// General Practice doctors pass the specialty check whatever was recommended.
    pub fn matches(&self, doctor: &Doctor) -> bool {
        let specialty_ok = match self.specialty {
            Some(specialty) => {
                doctor.specialty == specialty || doctor.specialty == Specialty::GeneralPractice
            }
            None => true,
        };

        let hospital_ok = match self.hospital.as_deref().map(str::trim) {
            Some(hospital) if !hospital.is_empty() => doctor.hospital == hospital,
            _ => true,
        };

        let day_ok = self.day.map_or(true, |day| doctor.is_available_on(day));

        specialty_ok && hospital_ok && day_ok
    }

    pub fn apply(&self, doctors: &[Doctor]) -> Vec<Doctor> {
        doctors.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}
