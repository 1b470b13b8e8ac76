use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::media::MediaSource;

/// Environment prefix for overrides, e.g. `COMMUNISYNC__SERVICE__HTTP__PORT=9000`
const ENV_PREFIX: &str = "COMMUNISYNC";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub assistant: AssistantConfig,
    pub session: SessionSettings,
    pub media: MediaConfig,
    pub landing: LandingConfig,
    pub recording: RecordingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl AssistantConfig {
    /// Read the credential from the environment; `None` when unset or blank.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Inclusive lower bound of the canned performance score
    pub performance_min: u8,
    /// Exclusive upper bound of the canned performance score
    pub performance_max: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub source: MediaSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LandingConfig {
    pub rotation_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// Span of captured media grouped into one chunk
    pub chunk_duration_ms: u64,
    /// Where the terminal interview writes saved recordings
    pub output_dir: String,
}

impl RecordingConfig {
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_millis(self.chunk_duration_ms)
    }
}

impl Config {
    /// Load configuration from built-in defaults, an optional file, then the environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        let cfg: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = config::Config::builder()
            .set_default("service.name", "communisync")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8080)?
            .set_default(
                "assistant.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("assistant.model", "gemini-1.5-flash")?
            .set_default("assistant.api_key_env", "GEMINI_API_KEY")?
            .set_default("session.performance_min", 70)?
            .set_default("session.performance_max", 100)?
            .set_default("media.source", "virtual")?
            .set_default("landing.rotation_interval_ms", 2000)?
            .set_default("recording.chunk_duration_ms", 1000)?
            .set_default("recording.output_dir", "recordings")?;
        Ok(builder)
    }

    fn validate(&self) -> Result<()> {
        let min = self.session.performance_min;
        let max = self.session.performance_max;
        if min >= max || max > 100 {
            anyhow::bail!(
                "session.performance_min ({}) must be below session.performance_max ({}) and max at most 100",
                min,
                max
            );
        }
        if self.landing.rotation_interval_ms == 0 {
            anyhow::bail!("landing.rotation_interval_ms must be positive");
        }
        if self.recording.chunk_duration_ms == 0 {
            anyhow::bail!("recording.chunk_duration_ms must be positive");
        }
        Ok(())
    }
}
