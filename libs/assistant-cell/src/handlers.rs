use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::error;

use shared_models::error::AppError;

use crate::models::{MatchRequest, NavigationRequest};
use crate::services::CareAssistant;

#[axum::debug_handler]
pub async fn match_symptoms(
    State(assistant): State<Arc<dyn CareAssistant>>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<Value>, AppError> {
    let symptoms = request.symptoms.trim();
    if symptoms.is_empty() {
        return Err(AppError::ValidationError("Symptoms are required".to_string()));
    }

    let result = assistant.match_symptoms(symptoms).await.map_err(|e| {
        error!("Matching failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(json!(result)))
}

#[axum::debug_handler]
pub async fn navigation_advice(
    State(assistant): State<Arc<dyn CareAssistant>>,
    Json(request): Json<NavigationRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;

    let advice = assistant.navigation_advice(&request).await.map_err(|e| {
        error!("Logistics generation failed: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(json!(advice)))
}
