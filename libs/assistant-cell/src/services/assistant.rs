use async_trait::async_trait;

use shared_config::AppConfig;

use crate::models::{AssistantError, MatchResult, NavigationAdvice, NavigationRequest};
use crate::services::{NavigationService, SymptomMatchingService};

/// The two generative-AI calls the booking flow depends on.
#[async_trait]
pub trait CareAssistant: Send + Sync {
    async fn match_symptoms(&self, symptoms: &str) -> Result<MatchResult, AssistantError>;

    async fn navigation_advice(
        &self,
        request: &NavigationRequest,
    ) -> Result<NavigationAdvice, AssistantError>;
}

pub struct GeminiCareAssistant {
    matching: SymptomMatchingService,
    navigation: NavigationService,
}

impl GeminiCareAssistant {
    pub fn new(config: &AppConfig) -> Result<Self, AssistantError> {
        Ok(Self {
            matching: SymptomMatchingService::new(config)?,
            navigation: NavigationService::new(config)?,
        })
    }
}

#[async_trait]
impl CareAssistant for GeminiCareAssistant {
    async fn match_symptoms(&self, symptoms: &str) -> Result<MatchResult, AssistantError> {
        self.matching.match_symptoms(symptoms).await
    }

    async fn navigation_advice(
        &self,
        request: &NavigationRequest,
    ) -> Result<NavigationAdvice, AssistantError> {
        self.navigation.navigation_advice(request).await
    }
}
