use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use shared_models::Coordinates;

pub mod preferences;

pub use preferences::{Language, PreferencesError, PreferencesStore, Theme, UserPreferences};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
    pub search_grounding: bool,
    pub user_location: Option<Coordinates>,
    pub preferences_path: PathBuf,
    pub session_idle_secs: u64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .unwrap_or_else(|_| {
                    warn!("GEMINI_API_KEY not set, using empty value");
                    String::new()
                }),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(30),
            search_grounding: env::var("GEMINI_SEARCH_GROUNDING")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            user_location: parse_location(
                env::var("USER_LATITUDE").ok().as_deref(),
                env::var("USER_LONGITUDE").ok().as_deref(),
            ),
            preferences_path: env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("myklinik-preferences.json")),
            session_idle_secs: env::var("BOOKING_SESSION_IDLE_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1800),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - AI matching and navigation are unavailable");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.gemini_api_key.is_empty() && !self.gemini_base_url.is_empty()
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}

/// Resolves the one-shot geolocation reading. Anything short of a complete,
/// in-range pair leaves the location unset.
pub fn parse_location(lat: Option<&str>, lng: Option<&str>) -> Option<Coordinates> {
    let (lat, lng) = match (lat, lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        (None, None) => return None,
        _ => {
            warn!("Only one of USER_LATITUDE/USER_LONGITUDE set, ignoring location");
            return None;
        }
    };

    let coords = match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
        (Ok(lat), Ok(lng)) => Coordinates::new(lat, lng),
        _ => {
            warn!("Unparsable user location ({}, {}), ignoring", lat, lng);
            return None;
        }
    };

    if !coords.is_valid() {
        warn!("User location out of range ({}, {}), ignoring", coords.lat, coords.lng);
        return None;
    }

    info!("Using user location ({}, {})", coords.lat, coords.lng);
    Some(coords)
}
