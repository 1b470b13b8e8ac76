//! Remote interview assistant
//!
//! A turn sends the raw user text to a generative-language endpoint and gets
//! back one reply. Failures are typed here; the session decides how to
//! recover from them.

mod gemini;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{GenerateContentRequest, GenerateContentResponse};

use crate::config::AssistantConfig;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistantError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("assistant returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed assistant response: {0}")]
    Malformed(String),

    #[error("assistant credential is not configured")]
    Unconfigured,
}

/// Chat completion capability used by interview sessions
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, text: &str) -> Result<String, AssistantError>;

    /// Get assistant name for logging
    fn name(&self) -> &str;
}

/// Stand-in used when no credential is available. Every turn falls back.
pub struct UnconfiguredAssistant;

#[async_trait]
impl Assistant for UnconfiguredAssistant {
    async fn reply(&self, _text: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Unconfigured)
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

/// Pick the Gemini client when a credential is present, otherwise the stand-in.
pub fn from_config(cfg: &AssistantConfig) -> Arc<dyn Assistant> {
    match GeminiConfig::from_config(cfg) {
        Some(gemini) => Arc::new(GeminiClient::new(gemini)),
        None => {
            warn!(
                "{} is not set; assistant replies will fall back",
                cfg.api_key_env
            );
            Arc::new(UnconfiguredAssistant)
        }
    }
}
