use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    DoctorSelectionRequest, FilterRequest, MarkerSelectionRequest, ScheduleRequest,
    SymptomsRequest,
};
use crate::services::{BookingFlow, BookingService};

fn session_json(session_id: Uuid, flow: &BookingFlow) -> Json<Value> {
    Json(json!({
        "session_id": session_id,
        "step_number": flow.step().number(),
        "session": flow,
    }))
}

#[axum::debug_handler]
pub async fn create_session(
    State(service): State<Arc<BookingService>>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (session_id, flow) = service.create_session().await;
    Ok((StatusCode::CREATED, session_json(session_id, &flow)))
}

#[axum::debug_handler]
pub async fn get_session(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let flow = service.get_session(session_id).await?;
    Ok(session_json(session_id, &flow))
}

#[axum::debug_handler]
pub async fn delete_session(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn submit_symptoms(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SymptomsRequest>,
) -> Result<Json<Value>, AppError> {
    let flow = service.submit_symptoms(session_id, &request.symptoms).await?;
    Ok(session_json(session_id, &flow))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctors = service.visible_doctors(session_id).await?;
    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len(),
    })))
}

#[axum::debug_handler]
pub async fn set_filters(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<Value>, AppError> {
    let doctors = service
        .set_filters(session_id, request.hospital, request.day)
        .await?;
    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len(),
    })))
}

#[axum::debug_handler]
pub async fn view_profile(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DoctorSelectionRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.view_profile(session_id, &request.doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn close_profile(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.close_profile(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn session_map(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let view = service.map_view(session_id).await?;
    Ok(Json(json!({
        "markers": view.markers(),
        "bounds": view.bounds(),
    })))
}

#[axum::debug_handler]
pub async fn select_marker(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<MarkerSelectionRequest>,
) -> Result<Json<Value>, AppError> {
    let (target, flow) = service.select_marker(session_id, &request.marker_id).await?;
    Ok(Json(json!({
        "target": target,
        "session": flow,
    })))
}

#[axum::debug_handler]
pub async fn select_doctor(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DoctorSelectionRequest>,
) -> Result<Json<Value>, AppError> {
    let flow = service.select_doctor(session_id, &request.doctor_id).await?;
    Ok(session_json(session_id, &flow))
}

#[axum::debug_handler]
pub async fn set_schedule(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let flow = service
        .set_schedule(session_id, &request.date, &request.time)
        .await?;
    Ok(session_json(session_id, &flow))
}

#[axum::debug_handler]
pub async fn confirm(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.confirm(session_id).await?;
    let flow = service.get_session(session_id).await?;

    Ok(Json(json!({
        "appointment": appointment,
        "navigation": flow.navigation(),
        "session": flow,
    })))
}

#[axum::debug_handler]
pub async fn back(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let flow = service.back(session_id).await?;
    Ok(session_json(session_id, &flow))
}

#[axum::debug_handler]
pub async fn reset(
    State(service): State<Arc<BookingService>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let flow = service.reset(session_id).await?;
    Ok(session_json(session_id, &flow))
}
