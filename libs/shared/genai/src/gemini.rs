use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, StatusCode,
};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::types::{GenerateContentRequest, GenerateContentResponse};

#[derive(Error, Debug)]
pub enum GenAiError {
    #[error("Generative AI API key is not configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authentication error ({status}): {body}")]
    Unauthorized { status: StatusCode, body: String },

    #[error("API error ({status}): {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Thin client for the `generateContent` endpoint. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, GenAiError> {
        if config.gemini_api_key.is_empty() {
            return Err(GenAiError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .user_agent("myklinik-api")
            .build()?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn get_headers(&self) -> Result<HeaderMap, GenAiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key).map_err(|_| GenAiError::MissingApiKey)?;

        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(
            "Making request to {} (prompt {} chars, {} tools)",
            url,
            request.prompt().map(str::len).unwrap_or(0),
            request.tools.len()
        );

        let response = self
            .client
            .post(&url)
            .headers(self.get_headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!("Generative AI error ({}): {}", status, body);

            return Err(match status.as_u16() {
                401 | 403 => GenAiError::Unauthorized { status, body },
                _ => GenAiError::Upstream { status, body },
            });
        }

        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice::<GenerateContentResponse>(&bytes)?;
        debug!("Received {} candidate(s)", parsed.candidates.len());

        Ok(parsed)
    }
}
