//! Interview session management
//!
//! This module provides the `InterviewSession` state machine that manages:
//! - Setup validation and the assistant greeting
//! - The capture stream for the lifetime of a session
//! - The per-second session clock
//! - Chat turns against the remote assistant
//! - Statistics synthesis at termination

mod clock;
mod config;
mod session;
mod stats;
mod transcript;
mod turns;

pub use clock::SessionClock;
pub use config::{Difficulty, SessionConfig, ValidationError};
pub use session::{CompletionCallback, InterviewSession, SessionError};
pub use stats::{InterviewStats, SessionPhase, SessionSnapshot};
pub use transcript::{ChatMessage, ChatRole, FALLBACK_REPLY};
pub use turns::{TurnHandle, TurnOutcome};
