//! Gemini client (Google Generative Language API, non-streaming).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{Assistant, AssistantError};
use crate::config::AssistantConfig;

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    /// Build from the assistant section; `None` when the credential is missing.
    pub fn from_config(cfg: &AssistantConfig) -> Option<Self> {
        let api_key = cfg.api_key()?;
        Some(Self {
            api_key,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Forward a request body as-is and return the parsed response.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AssistantError> {
        let url = self.config.endpoint();
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .headers(build_headers(&self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| AssistantError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn reply(&self, text: &str) -> Result<String, AssistantError> {
        let response = self
            .generate(&GenerateContentRequest::user_text(text))
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| AssistantError::Malformed("response has no candidate text".to_string()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers
}
