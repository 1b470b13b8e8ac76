use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::clock::SessionClock;
use super::config::{SessionConfig, ValidationError};
use super::stats::{InterviewStats, SessionPhase, SessionSnapshot};
use super::transcript::{ChatMessage, Transcript};
use super::turns::{TurnHandle, TurnWorker};
use crate::assistant::Assistant;
use crate::media::{
    ChunkMetadata, MediaBackend, MediaConstraints, MediaError, MediaHandle, MediaRecorder,
    MediaState, RecorderConfig, Recording, RecordingError, TrackKind,
};
use crate::scoring::{CannedScorer, Scorer};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session setup: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not access camera or microphone: {0}")]
    DeviceAccess(MediaError),

    #[error("the session has no {0} track")]
    TrackUnavailable(TrackKind),

    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error("an interview session is already active")]
    AlreadyActive,

    #[error("no interview session is active")]
    NotActive,
}

/// Receives the statistics record when a session ends
pub type CompletionCallback = Arc<dyn Fn(&InterviewStats) + Send + Sync>;

/// Resources that exist only while a session is active
struct ActiveSession {
    id: Uuid,
    config: SessionConfig,
    started_at: DateTime<Utc>,
    media: MediaHandle,
    recorder: MediaRecorder,
    clock: SessionClock,
    turns: TurnWorker,
}

/// Interview session state machine: setup → active → setup.
///
/// At most one session is active at a time. Dropping the `InterviewSession`
/// cancels the clock and in-flight turns and releases the capture stream.
pub struct InterviewSession {
    media_backend: Arc<dyn MediaBackend>,
    assistant: Arc<dyn Assistant>,
    scorer: Arc<dyn Scorer>,
    on_complete: Option<CompletionCallback>,
    recorder_config: RecorderConfig,

    /// Last recording saved during the current (or most recently ended) session
    saved_recording: Mutex<Option<Arc<Recording>>>,

    /// Conversation of the current (or most recently ended) session
    transcript: Arc<Mutex<Transcript>>,

    /// `Some` while a session is active
    active: Mutex<Option<ActiveSession>>,
}

impl InterviewSession {
    pub fn new(media_backend: Arc<dyn MediaBackend>, assistant: Arc<dyn Assistant>) -> Self {
        Self {
            media_backend,
            assistant,
            scorer: Arc::new(CannedScorer::default()),
            on_complete: None,
            recorder_config: RecorderConfig::default(),
            saved_recording: Mutex::new(None),
            transcript: Arc::new(Mutex::new(Transcript::default())),
            active: Mutex::new(None),
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_recorder_config(mut self, config: RecorderConfig) -> Self {
        self.recorder_config = config;
        self
    }

    /// Register a callback invoked with the stats of every ended session
    pub fn on_complete(mut self, callback: CompletionCallback) -> Self {
        self.on_complete = Some(callback);
        self
    }

    /// Validate the setup, acquire media and begin a new session
    pub async fn start(&self, config: SessionConfig) -> Result<SessionSnapshot, SessionError> {
        config.validate()?;

        let mut active = self.active.lock().await;
        if active.is_some() {
            warn!("Interview session already active");
            return Err(SessionError::AlreadyActive);
        }

        info!(
            "Starting interview session: {} / {} ({})",
            config.role, config.topic, config.difficulty
        );

        let stream = self
            .media_backend
            .acquire(MediaConstraints::default())
            .await
            .map_err(|e| {
                error!("Media acquisition via {} failed: {}", self.media_backend.name(), e);
                SessionError::DeviceAccess(e)
            })?;

        let mut media = MediaHandle::new();
        media.attach(stream);

        let generation = {
            let mut transcript = self.transcript.lock().await;
            let generation = transcript.reset();
            transcript
                .messages
                .push(ChatMessage::assistant(config.greeting()));
            generation
        };

        *self.saved_recording.lock().await = None;

        let mut clock = SessionClock::new();
        clock.start();

        let turns = TurnWorker::spawn(
            generation,
            Arc::clone(&self.assistant),
            Arc::clone(&self.transcript),
        );

        let session = ActiveSession {
            id: Uuid::new_v4(),
            config,
            started_at: Utc::now(),
            media,
            recorder: MediaRecorder::new(self.recorder_config.clone()),
            clock,
            turns,
        };

        info!("Interview session {} started", session.id);
        *active = Some(session);

        Ok(self.snapshot_locked(active.as_ref()).await)
    }

    /// Record a user message and ask the assistant for a reply.
    ///
    /// Blank input is ignored. Assistant failures never surface here; they
    /// turn into a fallback reply in the transcript.
    pub async fn send_message(&self, text: &str) -> Result<Option<TurnHandle>, SessionError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let mut active = self.active.lock().await;
        let session = active.as_mut().ok_or(SessionError::NotActive)?;

        self.transcript
            .lock()
            .await
            .messages
            .push(ChatMessage::user(text));

        Ok(Some(session.turns.submit(text.to_string())))
    }

    pub async fn toggle_video(&self) -> Result<MediaState, SessionError> {
        self.toggle(TrackKind::Video).await
    }

    pub async fn toggle_audio(&self) -> Result<MediaState, SessionError> {
        self.toggle(TrackKind::Audio).await
    }

    async fn toggle(&self, kind: TrackKind) -> Result<MediaState, SessionError> {
        let mut active = self.active.lock().await;
        let session = active.as_mut().ok_or(SessionError::NotActive)?;
        session.media.toggle(kind).map_err(|e| match e {
            MediaError::NoStream => SessionError::NotActive,
            MediaError::MissingTrack(missing) => SessionError::TrackUnavailable(missing),
            other => SessionError::DeviceAccess(other),
        })?;
        Ok(session.media.state())
    }

    /// Begin recording the live stream, discarding any unsaved capture
    pub async fn start_recording(&self) -> Result<(), SessionError> {
        let mut active = self.active.lock().await;
        let session = active.as_mut().ok_or(SessionError::NotActive)?;
        let feed = session
            .media
            .subscribe()
            .map_err(|_| SessionError::NotActive)?;
        session.recorder.start(feed)?;
        Ok(())
    }

    pub async fn stop_recording(&self) -> Result<Vec<ChunkMetadata>, SessionError> {
        let mut active = self.active.lock().await;
        let session = active.as_mut().ok_or(SessionError::NotActive)?;
        Ok(session.recorder.stop().await?)
    }

    /// Join the stopped recording's chunks into an artifact and keep it
    pub async fn save_recording(&self) -> Result<Arc<Recording>, SessionError> {
        let active = self.active.lock().await;
        let session = active.as_ref().ok_or(SessionError::NotActive)?;
        let recording = Arc::new(session.recorder.save()?);

        info!(
            "Recording {} saved: {} chunk(s), {} bytes",
            recording.id,
            recording.chunks.len(),
            recording.size_bytes
        );
        *self.saved_recording.lock().await = Some(Arc::clone(&recording));
        Ok(recording)
    }

    pub async fn saved_recording(&self) -> Option<Arc<Recording>> {
        self.saved_recording.lock().await.clone()
    }

    pub async fn is_recording(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|s| s.recorder.is_recording())
    }

    /// End the active session and synthesize its statistics.
    ///
    /// Returns `None` when no session is active; calling it again after a
    /// session ended changes nothing.
    pub async fn end(&self) -> Option<InterviewStats> {
        let mut active = self.active.lock().await;
        let mut session = active.take()?;

        let duration = session.clock.stop();

        let (transcript, questions_answered) = {
            let mut transcript = self.transcript.lock().await;
            transcript.close();
            (transcript.messages.clone(), transcript.user_turns())
        };

        let pending = session.turns.in_flight();
        if pending > 0 {
            info!("Cancelling {} in-flight turn(s)", pending);
        }
        if session.recorder.is_recording() {
            // Unsaved captures are discarded with the session
            if let Ok(chunks) = session.recorder.stop().await {
                info!("Recording stopped at session end ({} chunk(s))", chunks.len());
            }
        }
        session.media.release();

        let assessment = self.scorer.assess(&session.config, &transcript);
        let stats = InterviewStats {
            duration,
            questions_answered,
            performance: assessment.performance,
            feedback: assessment.feedback,
        };

        info!(
            "Interview session {} ended after {}s ({} answers, performance {})",
            session.id, stats.duration, stats.questions_answered, stats.performance
        );
        drop(session);
        drop(active);

        if let Some(callback) = &self.on_complete {
            callback(&stats);
        }

        Some(stats)
    }

    pub async fn is_active(&self) -> bool {
        self.active.lock().await.is_some()
    }

    pub async fn elapsed_secs(&self) -> u64 {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|s| s.clock.elapsed_secs())
            .unwrap_or(0)
    }

    pub async fn media_state(&self) -> MediaState {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|s| s.media.state())
            .unwrap_or_default()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.messages.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let active = self.active.lock().await;
        self.snapshot_locked(active.as_ref()).await
    }

    async fn snapshot_locked(&self, active: Option<&ActiveSession>) -> SessionSnapshot {
        let messages = self.messages().await;

        match active {
            Some(session) => SessionSnapshot {
                phase: SessionPhase::Active,
                session_id: Some(session.id),
                config: Some(session.config.clone()),
                started_at: Some(session.started_at),
                elapsed_secs: session.clock.elapsed_secs(),
                messages,
                media: session.media.state(),
                pending_turns: session.turns.in_flight(),
                recording: session.recorder.is_recording(),
            },
            None => SessionSnapshot {
                phase: SessionPhase::Setup,
                session_id: None,
                config: None,
                started_at: None,
                elapsed_secs: 0,
                messages,
                media: MediaState::default(),
                pending_turns: 0,
                recording: false,
            },
        }
    }
}
