pub mod assistant;
pub mod config;
pub mod feedback;
pub mod http;
pub mod landing;
pub mod media;
pub mod scoring;
pub mod session;

pub use assistant::{Assistant, AssistantError, GeminiClient, GeminiConfig, UnconfiguredAssistant};
pub use config::Config;
pub use feedback::{FeedbackDisplayStats, FeedbackReport};
pub use http::{create_router, AppState};
pub use landing::{KeywordRotator, LandingContent};
pub use media::{
    ChunkMetadata, MediaBackend, MediaBackendFactory, MediaError, MediaHandle, MediaRecorder,
    MediaSource, MediaState, RecorderConfig, Recording, RecordingError, TrackKind,
    VirtualMediaBackend,
};
pub use scoring::{Assessment, CannedScorer, Feedback, Scorer};
pub use session::{
    ChatMessage, ChatRole, Difficulty, InterviewSession, InterviewStats, SessionConfig,
    SessionError, SessionSnapshot, TurnHandle, TurnOutcome,
};
