use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::CareAssistant;

pub fn assistant_routes(assistant: Arc<dyn CareAssistant>) -> Router {
    Router::new()
        .route("/match", post(handlers::match_symptoms))
        .route("/navigation", post(handlers::navigation_advice))
        .with_state(assistant)
}
