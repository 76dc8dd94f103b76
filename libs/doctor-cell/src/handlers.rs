use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Weekday;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_models::Specialty;

use crate::models::{DoctorError, TIME_SLOTS};
use crate::services::{DoctorDirectory, DoctorFilter, MapView};

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub specialty: Option<String>,
    pub hospital: Option<String>,
    pub day: Option<String>,
}

impl DoctorSearchQuery {
    pub fn to_filter(&self) -> Result<DoctorFilter, DoctorError> {
        let specialty = self
            .specialty
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Specialty>)
            .transpose()
            .map_err(|e| DoctorError::InvalidFilter(e.to_string()))?;

        let day = self
            .day
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|d| {
                d.trim()
                    .parse::<Weekday>()
                    .map_err(|_| DoctorError::InvalidFilter(format!("unknown weekday: {}", d)))
            })
            .transpose()?;

        Ok(DoctorFilter {
            specialty,
            ..DoctorFilter::default()
        }
        .with_hospital(self.hospital.clone())
        .with_day(day))
    }
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query.to_filter()?;
    let doctors = directory.search(&filter);

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory.get(&doctor_id)?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn list_hospitals(
    State(directory): State<Arc<DoctorDirectory>>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "hospitals": directory.hospitals()
    })))
}

pub async fn list_time_slots() -> Json<Value> {
    Json(json!({ "slots": TIME_SLOTS }))
}

#[axum::debug_handler]
pub async fn doctor_map(
    State(directory): State<Arc<DoctorDirectory>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = query.to_filter()?;
    let map = MapView::new().with_doctors(&directory.search(&filter));

    Ok(Json(json!({
        "markers": map.markers(),
        "bounds": map.bounds()
    })))
}
