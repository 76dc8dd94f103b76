// libs/assistant-cell/src/services/navigation.rs
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_genai::{GeminiClient, GenerateContentRequest};

use crate::models::{AssistantError, NavigationAdvice, NavigationRequest};

const DEFAULT_SOURCE_TITLE: &str = "Source";
const FALLBACK_ORIGIN: &str = "within the Klang Valley/relevant area";

/// Free-form travel guidance for reaching an appointment, grounded by web search.
pub struct NavigationService {
    client: GeminiClient,
}

impl NavigationService {
    pub fn new(config: &AppConfig) -> Result<Self, AssistantError> {
        Ok(Self::with_client(GeminiClient::new(config)?))
    }

    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }

    pub async fn navigation_advice(
        &self,
        request: &NavigationRequest,
    ) -> Result<NavigationAdvice, AssistantError> {
        request.validate()?;
        debug!(
            "Requesting navigation advice to {} on {} at {}",
            request.destination, request.date, request.time
        );

        let prompt = GenerateContentRequest::from_prompt(build_navigation_prompt(request))
            .with_search_grounding();

        let response = self.client.generate_content(&prompt).await?;
        let text = response.text().ok_or(AssistantError::EmptyResponse)?;
        let sources = response.grounding_sources(DEFAULT_SOURCE_TITLE);

        info!(
            "Navigation advice for {} ready ({} chars, {} sources)",
            request.destination,
            text.len(),
            sources.len()
        );

        Ok(NavigationAdvice { text, sources })
    }
}

pub fn build_navigation_prompt(request: &NavigationRequest) -> String {
    let origin = match request.location {
        Some(loc) => format!("from coordinates ({}, {})", loc.lat, loc.lng),
        None => FALLBACK_ORIGIN.to_string(),
    };

    format!(
        "The user has an appointment at \"{destination}\" on \"{date}\" at \"{time}\", travelling {origin}.\n\
         Search for planned road closures, major construction or expected traffic conditions \
         (public holidays, festive seasons) in this part of Malaysia specifically for {date}.\n\
         Then give transport advice for that day:\n\
         1. A realistic travel time estimate for {date} at {time}.\n\
         2. Any road alerts found for that date.\n\
         3. Parking tips or public transport (LRT/MRT) alternatives for this location.",
        destination = request.destination.trim(),
        date = request.date.trim(),
        time = request.time.trim(),
        origin = origin,
    )
}
