use axum::routing::{get, patch, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::routes::{dashboard, flows, profile, tasks};
use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        // AI flow actions
        .route("/api/flows/summarize", post(flows::summarize))
        .route("/api/flows/quiz", post(flows::generate_quiz))
        .route("/api/flows/videos", post(flows::suggest_videos))
        .route("/api/flows/speech", post(flows::text_to_speech))
        .route(
            "/api/flows/speech-with-timings",
            post(flows::speech_with_timings),
        )
        .route("/api/flows/feedback", post(flows::weekly_feedback))
        .route("/api/quiz/grade", post(flows::grade))
        // Task CRUD
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            patch(tasks::update).delete(tasks::remove),
        )
        .route("/api/tasks/:id/toggle", post(tasks::toggle))
        // Profile and aggregates
        .route("/api/profile", get(profile::get).put(profile::put))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/feedback/weekly", get(dashboard::weekly_feedback))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting HTTP server on {}", addr);

    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start HTTP server: {}", e))
}

/// Health check handler
async fn health() -> &'static str {
    "StudyMate is running"
}
