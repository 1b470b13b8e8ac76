use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::assistant::{self, Assistant, GeminiClient, GeminiConfig};
use crate::config::Config;
use crate::landing::KeywordRotator;
use crate::media::{MediaBackend, MediaBackendFactory, RecorderConfig};
use crate::scoring::CannedScorer;
use crate::session::{InterviewSession, InterviewStats};

/// Statistics carried from the interview route to the feedback route
#[derive(Clone, Default)]
pub struct FeedbackHandoff {
    latest: Arc<RwLock<Option<InterviewStats>>>,
}

impl FeedbackHandoff {
    pub fn store(&self, stats: &InterviewStats) {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *latest = Some(stats.clone());
    }

    pub fn latest(&self) -> Option<InterviewStats> {
        self.latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single interview session view
    pub interview: Arc<InterviewSession>,

    /// Stats of the most recently ended session
    pub handoff: FeedbackHandoff,

    /// Server-side Gemini client for the assistant proxy; `None` without a credential
    pub proxy: Option<Arc<GeminiClient>>,

    pub rotator: Arc<KeywordRotator>,
}

impl AppState {
    pub fn new(media_backend: Arc<dyn MediaBackend>, assistant: Arc<dyn Assistant>) -> Self {
        Self::build(
            media_backend,
            assistant,
            CannedScorer::default(),
            KeywordRotator::new(Duration::from_secs(2)),
            RecorderConfig::default(),
        )
    }

    pub fn from_config(cfg: &Config) -> Self {
        let media_backend: Arc<dyn MediaBackend> =
            Arc::from(MediaBackendFactory::create(cfg.media.source));
        let scorer =
            CannedScorer::new(cfg.session.performance_min..cfg.session.performance_max);
        let rotator =
            KeywordRotator::new(Duration::from_millis(cfg.landing.rotation_interval_ms));

        let state = Self::build(
            media_backend,
            assistant::from_config(&cfg.assistant),
            scorer,
            rotator,
            RecorderConfig::new(cfg.recording.chunk_duration()),
        );

        match GeminiConfig::from_config(&cfg.assistant) {
            Some(gemini) => state.with_proxy(Arc::new(GeminiClient::new(gemini))),
            None => state,
        }
    }

    fn build(
        media_backend: Arc<dyn MediaBackend>,
        assistant: Arc<dyn Assistant>,
        scorer: CannedScorer,
        rotator: KeywordRotator,
        recorder: RecorderConfig,
    ) -> Self {
        let handoff = FeedbackHandoff::default();
        let sink = handoff.clone();

        let interview = InterviewSession::new(media_backend, assistant)
            .with_scorer(Arc::new(scorer))
            .with_recorder_config(recorder)
            .on_complete(Arc::new(move |stats: &InterviewStats| sink.store(stats)));

        Self {
            interview: Arc::new(interview),
            handoff,
            proxy: None,
            rotator: Arc::new(rotator),
        }
    }

    pub fn with_proxy(mut self, client: Arc<GeminiClient>) -> Self {
        self.proxy = Some(client);
        self
    }
}
