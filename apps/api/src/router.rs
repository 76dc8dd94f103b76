use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};

use assistant_cell::router::assistant_routes;
use assistant_cell::{AssistantError, CareAssistant, GeminiCareAssistant};
use booking_cell::router::booking_routes;
use booking_cell::BookingService;
use doctor_cell::router::doctor_routes;
use doctor_cell::DoctorDirectory;
use shared_config::{AppConfig, PreferencesStore};

use crate::preferences::{preferences_routes, PreferencesState};

pub fn create_router(config: Arc<AppConfig>) -> Result<Router, AssistantError> {
    let assistant: Arc<dyn CareAssistant> = Arc::new(GeminiCareAssistant::new(&config)?);
    let directory = Arc::new(DoctorDirectory::seeded());
    let booking = Arc::new(BookingService::new(
        assistant.clone(),
        directory.clone(),
        config.user_location,
    ));
    BookingService::spawn_idle_sweeper(
        booking.clone(),
        Duration::from_secs(config.session_idle_secs),
    );
    let preferences = Arc::new(PreferencesState::new(PreferencesStore::new(
        config.preferences_path.clone(),
    )));

    Ok(Router::new()
        .route("/", get(|| async { "MyKlinik API is running!" }))
        .nest("/doctors", doctor_routes(directory))
        .nest("/assistant", assistant_routes(assistant))
        .nest("/booking/sessions", booking_routes(booking))
        .nest("/preferences", preferences_routes(preferences)))
}
