//! HTTP API for the coaching front end
//!
//! This module exposes the four client routes as a JSON API:
//! - GET / - Landing content
//! - GET|POST /login - Login form and stub
//! - GET /interview, POST /interview/{start,messages,media/video,media/audio,end} - Session
//! - GET|POST /feedback - Feedback report
//! - POST /api/assistant - Server-side assistant proxy
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, FeedbackHandoff};
