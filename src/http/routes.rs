use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Landing & login stub
        .route("/", get(handlers::landing))
        .route("/login", get(handlers::login_form).post(handlers::login))
        // Interview session
        .route("/interview", get(handlers::interview_status))
        .route("/interview/start", post(handlers::start_interview))
        .route("/interview/messages", post(handlers::send_message))
        .route("/interview/media/video", post(handlers::toggle_video))
        .route("/interview/media/audio", post(handlers::toggle_audio))
        .route("/interview/recording", get(handlers::download_recording))
        .route("/interview/recording/start", post(handlers::start_recording))
        .route("/interview/recording/stop", post(handlers::stop_recording))
        .route("/interview/recording/save", post(handlers::save_recording))
        .route("/interview/end", post(handlers::end_interview))
        // Feedback
        .route(
            "/feedback",
            get(handlers::feedback).post(handlers::render_feedback),
        )
        // Assistant proxy
        .route("/api/assistant", post(handlers::assistant_proxy))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
