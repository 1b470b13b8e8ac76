use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::SessionConfig;
use super::transcript::ChatMessage;
use crate::media::MediaState;
use crate::scoring::Feedback;

/// Summary produced once when a session ends and handed to the feedback view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStats {
    /// Seconds on the session clock at termination
    pub duration: u64,

    /// Number of user-authored chat messages
    pub questions_answered: usize,

    /// Score in 0..=100
    pub performance: u8,

    pub feedback: Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Collecting setup parameters; nothing is running
    Setup,
    Active,
}

/// Point-in-time view of an interview session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session_id: Option<Uuid>,
    pub config: Option<SessionConfig>,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_secs: u64,
    pub messages: Vec<ChatMessage>,
    pub media: MediaState,
    /// Turns waiting for an assistant reply
    pub pending_turns: usize,
    pub recording: bool,
}
