use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::{Coordinates, GroundingSource, Specialty};

pub struct TestConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub search_grounding: bool,
    pub user_location: Option<Coordinates>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            base_url: "http://localhost:9".to_string(),
            model: "test-model".to_string(),
            search_grounding: true,
            user_location: None,
        }
    }
}

impl TestConfig {
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn located_at(mut self, lat: f64, lng: f64) -> Self {
        self.user_location = Some(Coordinates::new(lat, lng));
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            gemini_api_key: self.api_key.clone(),
            gemini_base_url: self.base_url.clone(),
            gemini_model: self.model.clone(),
            gemini_timeout_secs: 5,
            search_grounding: self.search_grounding,
            user_location: self.user_location,
            preferences_path: PathBuf::from("test-preferences.json"),
            session_idle_secs: 60,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned `generateContent` bodies.
pub struct MockGeminiResponses;

impl MockGeminiResponses {
    pub fn text_response(text: &str) -> Value {
        Self::grounded_text_response(text, &[])
    }

    pub fn grounded_text_response(text: &str, sources: &[GroundingSource]) -> Value {
        let chunks: Vec<Value> = sources
            .iter()
            .map(|s| json!({"web": {"title": s.title, "uri": s.uri}}))
            .collect();

        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP",
                "groundingMetadata": {"groundingChunks": chunks}
            }]
        })
    }

    /// A response whose text is the JSON encoding of `payload`.
    pub fn json_response(payload: &Value) -> Value {
        Self::text_response(&payload.to_string())
    }

    pub fn empty_response() -> Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": []},
                "finishReason": "SAFETY"
            }]
        })
    }

    pub fn match_payload(specialty: Specialty, urgency: &str) -> Value {
        json!({
            "recommendedSpecialty": specialty.as_str(),
            "reasoning": format!("Symptoms are consistent with a {} referral.", specialty),
            "urgency": urgency,
            "suggestedFacilities": [
                {
                    "name": "Institut Jantung Negara",
                    "type": "Specialist Heart Centre",
                    "highlight": "National referral centre for cardiac care",
                    "coords": {"lat": 3.1707, "lng": 101.7068}
                },
                {
                    "name": "Hospital Kuala Lumpur",
                    "type": "Public Hospital",
                    "highlight": "24-hour emergency department"
                }
            ]
        })
    }
}
