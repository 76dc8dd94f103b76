use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::services::BookingService;

pub fn booking_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", post(handlers::create_session))
        .route(
            "/{session_id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/{session_id}/match", post(handlers::submit_symptoms))
        .route("/{session_id}/doctors", get(handlers::list_doctors))
        .route("/{session_id}/filters", put(handlers::set_filters))
        .route(
            "/{session_id}/profile",
            post(handlers::view_profile).delete(handlers::close_profile),
        )
        .route("/{session_id}/map", get(handlers::session_map))
        .route("/{session_id}/map/select", post(handlers::select_marker))
        .route("/{session_id}/doctor", post(handlers::select_doctor))
        .route("/{session_id}/schedule", put(handlers::set_schedule))
        .route("/{session_id}/confirm", post(handlers::confirm))
        .route("/{session_id}/back", post(handlers::back))
        .route("/{session_id}/reset", post(handlers::reset))
        .with_state(service)
}
