// libs/assistant-cell/src/services/matching.rs
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_genai::{GeminiClient, GenerateContentRequest, GenerateContentResponse};
use shared_models::{Coordinates, Specialty};

use crate::models::{AssistantError, MatchResult, SuggestedFacility, Urgency};

const DEFAULT_SOURCE_TITLE: &str = "Medical Reference";

/// Turns a free-text symptom description into a typed specialty recommendation.
pub struct SymptomMatchingService {
    client: GeminiClient,
    search_grounding: bool,
}

impl SymptomMatchingService {
    pub fn new(config: &AppConfig) -> Result<Self, AssistantError> {
        Ok(Self::with_client(GeminiClient::new(config)?, config.search_grounding))
    }

    pub fn with_client(client: GeminiClient, search_grounding: bool) -> Self {
        Self { client, search_grounding }
    }

    pub async fn match_symptoms(&self, symptoms: &str) -> Result<MatchResult, AssistantError> {
        let symptoms = symptoms.trim();
        if symptoms.is_empty() {
            return Err(AssistantError::InvalidInput("symptom description is empty".to_string()));
        }

        debug!("Requesting specialty match for {} chars of symptoms", symptoms.len());

        let mut request = GenerateContentRequest::from_prompt(build_match_prompt(symptoms))
            .with_json_schema(match_response_schema());
        if self.search_grounding {
            request = request.with_search_grounding();
        }

        let response = self.client.generate_content(&request).await?;
        let result = parse_match_response(&response)?;

        info!(
            "Matched symptoms to {} (urgency {}, {} facilities, {} sources)",
            result.recommended_specialty,
            result.urgency.as_str(),
            result.suggested_facilities.len(),
            result.search_sources.len()
        );

        Ok(result)
    }
}

pub fn build_match_prompt(symptoms: &str) -> String {
    format!(
        "A patient describes these symptoms: \"{symptoms}\".\n\
         1. Choose the single most appropriate medical specialty from this list: {specialties}.\n\
         2. Search for top-rated hospitals or specialist clinics in Malaysia (for example Kuala Lumpur, Selangor or Penang) known for treating these issues.\n\
         3. Give a short reasoning and an urgency level (Low, Medium, High).\n\n\
         Include a 'suggestedFacilities' array with the top 3 real-world Malaysian facilities you found, \
         and for each facility give its approximate latitude and longitude where you can.",
        symptoms = symptoms,
        specialties = Specialty::catalogue(),
    )
}

pub fn match_response_schema() -> Value {
    let specialties: Vec<&str> = Specialty::ALL.iter().map(Specialty::as_str).collect();
    let urgencies: Vec<&str> = Urgency::ALL.iter().map(Urgency::as_str).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "recommendedSpecialty": { "type": "STRING", "enum": specialties },
            "reasoning": { "type": "STRING" },
            "urgency": { "type": "STRING", "enum": urgencies },
            "suggestedFacilities": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "type": { "type": "STRING" },
                        "highlight": { "type": "STRING" },
                        "coords": {
                            "type": "OBJECT",
                            "properties": {
                                "lat": { "type": "NUMBER" },
                                "lng": { "type": "NUMBER" }
                            },
                            "required": ["lat", "lng"]
                        }
                    },
                    "required": ["name", "type", "highlight"]
                }
            }
        },
        "required": ["recommendedSpecialty", "reasoning", "urgency", "suggestedFacilities"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchPayload {
    recommended_specialty: String,
    reasoning: String,
    urgency: Urgency,
    #[serde(default)]
    suggested_facilities: Vec<FacilityPayload>,
}

#[derive(Debug, Deserialize)]
struct FacilityPayload {
    name: String,
    #[serde(rename = "type", default)]
    category: String,
    #[serde(default)]
    highlight: String,
    #[serde(default)]
    coords: Option<Coordinates>,
}

/// Missing or unparsable payloads are errors; nothing is defaulted into a result.
pub fn parse_match_response(response: &GenerateContentResponse) -> Result<MatchResult, AssistantError> {
    let text = response.text().ok_or(AssistantError::EmptyResponse)?;
    let payload: MatchPayload = serde_json::from_str(strip_code_fence(&text))?;

    let recommended_specialty = payload
        .recommended_specialty
        .parse::<Specialty>()
        .map_err(|e| {
            warn!("Model recommended a specialty outside the offered set: {}", e.0);
            AssistantError::UnknownSpecialty(e.0)
        })?;

    let suggested_facilities = payload
        .suggested_facilities
        .into_iter()
        .map(|f| SuggestedFacility {
            name: f.name,
            category: f.category,
            highlight: f.highlight,
            coords: f.coords.filter(Coordinates::is_valid),
        })
        .collect();

    Ok(MatchResult {
        recommended_specialty,
        reasoning: payload.reasoning,
        urgency: payload.urgency,
        suggested_facilities,
        search_sources: response.grounding_sources(DEFAULT_SOURCE_TITLE),
    })
}

// Grounded JSON answers occasionally arrive wrapped in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
