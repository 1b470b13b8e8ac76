use super::state::AppState;
use crate::assistant::GenerateContentRequest;
use crate::feedback::FeedbackReport;
use crate::landing::LandingContent;
use crate::media::ChunkMetadata;
use crate::session::{InterviewStats, SessionConfig, SessionError, SessionSnapshot};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub redirect: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginForm {
    pub title: &'static str,
    pub action: &'static str,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// Sequence number of the queued turn; absent for blank input
    pub turn: Option<u64>,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub stats: InterviewStats,
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub chunks: Vec<ChunkMetadata>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn session_error(e: SessionError) -> Response {
    let status = match &e {
        SessionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::DeviceAccess(_) => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::AlreadyActive
        | SessionError::NotActive
        | SessionError::TrackUnavailable(_)
        | SessionError::Recording(_) => StatusCode::CONFLICT,
    };
    error_response(status, e)
}

// ============================================================================
// Landing & login
// ============================================================================

/// GET /
/// Landing page content with the current rotating keyword
pub async fn landing(State(state): State<AppState>) -> impl IntoResponse {
    Json(LandingContent::build(&state.rotator))
}

/// GET /login
/// Login form description
pub async fn login_form() -> impl IntoResponse {
    Json(LoginForm {
        title: "Log in",
        action: "/login",
        fields: vec![
            FormField {
                name: "email",
                kind: "email",
                label: "Email",
            },
            FormField {
                name: "password",
                kind: "password",
                label: "Password",
            },
        ],
    })
}

/// POST /login
/// Login stub: no credentials are checked
pub async fn login(Json(req): Json<LoginRequest>) -> impl IntoResponse {
    if req.email.trim().is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "email is required");
    }

    info!("Login stub accepted {}", req.email.trim());

    (
        StatusCode::OK,
        Json(LoginResponse {
            redirect: "/interview".to_string(),
            message: "Welcome to CommuniSync".to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Interview
// ============================================================================

/// GET /interview
/// Current session snapshot
pub async fn interview_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.interview.snapshot().await)
}

/// POST /interview/start
/// Validate setup and start a session
pub async fn start_interview(
    State(state): State<AppState>,
    Json(config): Json<SessionConfig>,
) -> impl IntoResponse {
    match state.interview.start(config).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => {
            warn!("Failed to start interview: {}", e);
            session_error(e)
        }
    }
}

/// POST /interview/messages
/// Record a user message and queue the assistant turn
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    match state.interview.send_message(&req.text).await {
        Ok(handle) => {
            let turn = handle.map(|h| h.turn());
            let session = state.interview.snapshot().await;
            (StatusCode::ACCEPTED, Json(SendMessageResponse { turn, session })).into_response()
        }
        Err(e) => session_error(e),
    }
}

/// POST /interview/media/video
pub async fn toggle_video(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.toggle_video().await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /interview/media/audio
pub async fn toggle_audio(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.toggle_audio().await {
        Ok(media) => (StatusCode::OK, Json(media)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /interview/recording/start
/// Begin recording the live stream
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.start_recording().await {
        Ok(()) => (StatusCode::OK, Json(state.interview.snapshot().await)).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /interview/recording/stop
/// Stop recording and list the captured chunks
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.stop_recording().await {
        Ok(chunks) => (StatusCode::OK, Json(StopRecordingResponse { chunks })).into_response(),
        Err(e) => session_error(e),
    }
}

/// POST /interview/recording/save
/// Join the captured chunks into a downloadable recording
pub async fn save_recording(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.save_recording().await {
        Ok(recording) => (StatusCode::CREATED, Json(recording.as_ref().clone())).into_response(),
        Err(e) => session_error(e),
    }
}

/// GET /interview/recording
/// Bytes of the last saved recording
pub async fn download_recording(State(state): State<AppState>) -> impl IntoResponse {
    let Some(recording) = state.interview.saved_recording().await else {
        return error_response(StatusCode::NOT_FOUND, "no recording has been saved");
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, recording.mime_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", recording.file_name()),
            ),
        ],
        recording.data().to_vec(),
    )
        .into_response()
}

/// POST /interview/end
/// End the session and hand its stats to the feedback view
pub async fn end_interview(State(state): State<AppState>) -> impl IntoResponse {
    match state.interview.end().await {
        Some(stats) => (
            StatusCode::OK,
            Json(EndSessionResponse {
                stats,
                redirect: "/feedback".to_string(),
            }),
        )
            .into_response(),
        None => session_error(SessionError::NotActive),
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// GET /feedback
/// Report for the last ended session, or the default record
pub async fn feedback(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.handoff.latest();
    Json(FeedbackReport::render(stats.as_ref()))
}

/// POST /feedback
/// Report for a supplied statistics record
pub async fn render_feedback(Json(stats): Json<InterviewStats>) -> impl IntoResponse {
    Json(FeedbackReport::render(Some(&stats)))
}

// ============================================================================
// Assistant proxy
// ============================================================================

/// POST /api/assistant
/// Forward a generateContent request using the server-held credential
pub async fn assistant_proxy(
    State(state): State<AppState>,
    Json(req): Json<GenerateContentRequest>,
) -> impl IntoResponse {
    let Some(client) = state.proxy.as_ref() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "assistant credential is not configured",
        );
    };

    match client.generate(&req).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Assistant proxy request failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e)
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
