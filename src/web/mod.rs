//! Web UI and HTTP API for Innsikt.
//!
//! Serves the single-page UI plus a small JSON API. Analysis runs are
//! single-flight: the server accepts one at a time and answers 409 while one
//! is already in progress.

mod page;

use crate::error::{InnsiktError, Result};
use crate::orchestrator::Orchestrator;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// State shared by every handler: the orchestrator plus the single-flight
/// guard.
pub struct AppState {
    orchestrator: Orchestrator,
    /// Held for the duration of one analysis run.
    busy: Mutex<()>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            busy: Mutex::new(()),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .layer(cors)
        .with_state(state)
}

/// Serve the app on the given address until shutdown.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AnalyzeRequest {
    /// YouTube URL of the podcast episode.
    url: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    success: bool,
    insights: String,
    recommendations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AnalyzeResponse {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            insights: String::new(),
            recommendations: String::new(),
            error: Some(error),
        }
    }
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    // One run at a time. The guard stays held across the whole analysis.
    let _guard = match state.busy.try_lock() {
        Ok(guard) => guard,
        Err(_) => {
            return (
                StatusCode::CONFLICT,
                Json(AnalyzeResponse::failure(
                    "An analysis is already running. Try again once it finishes.".to_string(),
                )),
            )
                .into_response();
        }
    };

    match state.orchestrator.analyze(&req.url).await {
        Ok(analysis) => Json(AnalyzeResponse {
            success: true,
            insights: analysis.insights,
            recommendations: analysis.recommendations,
            error: None,
        })
        .into_response(),
        Err(e) => {
            let status = match &e {
                InnsiktError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(AnalyzeResponse::failure(e.to_string()))).into_response()
        }
    }
}
