use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{error, info};

use shared_config::{Language, PreferencesStore, Theme, UserPreferences};
use shared_models::error::AppError;

/// Persisted theme and language, cached after the first read.
pub struct PreferencesState {
    store: PreferencesStore,
    current: RwLock<UserPreferences>,
}

impl PreferencesState {
    pub fn new(store: PreferencesStore) -> Self {
        let current = store.load();
        Self {
            store,
            current: RwLock::new(current),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
}

#[axum::debug_handler]
pub async fn get_preferences(
    State(state): State<Arc<PreferencesState>>,
) -> Result<Json<Value>, AppError> {
    let current = *state.current.read().await;
    Ok(Json(json!(current)))
}

#[axum::debug_handler]
pub async fn update_preferences(
    State(state): State<Arc<PreferencesState>>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<Value>, AppError> {
    // Held across the save so the file and the cache stay in step.
    let mut current = state.current.write().await;

    let mut next = *current;
    if let Some(theme) = update.theme {
        next.theme = theme;
    }
    if let Some(language) = update.language {
        next.language = language;
    }

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.save(&next))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| {
            error!("Saving preferences to {} failed: {}", state.store.path().display(), e);
            AppError::Internal(e.to_string())
        })?;

    info!("Preferences updated: theme={:?}, language={:?}", next.theme, next.language);
    *current = next;
    Ok(Json(json!(next)))
}

pub fn preferences_routes(state: Arc<PreferencesState>) -> Router {
    Router::new()
        .route("/", get(get_preferences).put(update_preferences))
        .with_state(state)
}
