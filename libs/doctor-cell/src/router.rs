use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::DoctorDirectory;

pub fn doctor_routes(directory: Arc<DoctorDirectory>) -> Router {
    Router::new()
        .route("/", get(handlers::search_doctors))
        .route("/hospitals", get(handlers::list_hospitals))
        .route("/slots", get(handlers::list_time_slots))
        .route("/map", get(handlers::doctor_map))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(directory)
}
