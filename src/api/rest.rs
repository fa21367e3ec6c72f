//! Axum REST API handlers
//!
//! | Method | Path       | Body                         |
//! |--------|------------|------------------------------|
//! | GET    | `/health`  |                              |
//! | POST   | `/group`   | `{"photos": [..], "threshold"?}` |
//! | POST   | `/analyze` | `{"photo": ".."}`            |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{FamilyGrouperError, InputError};
use crate::service::{AnalyzeResponse, GroupingResponse, GroupingService, HealthResponse};

use super::dto::*;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the REST API router
pub fn create_rest_router(service: Arc<GroupingService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/group", post(group_handler))
        .route("/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the REST API until Ctrl-C
pub async fn serve(service: Arc<GroupingService>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_rest_router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}

/// Health check handler
async fn health_handler(State(service): State<Arc<GroupingService>>) -> Json<HealthResponse> {
    Json(service.health())
}

/// Group photos handler
async fn group_handler(
    State(service): State<Arc<GroupingService>>,
    payload: Result<Json<GroupRequest>, JsonRejection>,
) -> Result<Json<GroupingResponse>, ApiError> {
    let request = request_body(payload)?;

    // Grouping blocks on the analyzer for every comparison
    let outcome = tokio::task::spawn_blocking(move || {
        service.group_with_threshold(&request.photos, request.threshold)
    })
    .await
    .map_err(|e| internal_error(e.to_string()))?;

    outcome.map(Json).map_err(api_error)
}

/// Analyze single photo handler
async fn analyze_handler(
    State(service): State<Arc<GroupingService>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request = request_body(payload)?;
    let Some(photo) = request.photo else {
        return Err(api_error(InputError::MissingPhoto.into()));
    };

    let outcome = tokio::task::spawn_blocking(move || service.analyze(&photo))
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    outcome.map(Json).map_err(api_error)
}

/// Unwrap a JSON body, answering malformed ones with 400 and an error body
fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let message = rejection.body_text();
        warn!("Rejected request body: {}", message);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
    })
}

fn api_error(error: FamilyGrouperError) -> ApiError {
    let status = match &error {
        FamilyGrouperError::Input(InputError::PhotoNotFound { .. }) => StatusCode::NOT_FOUND,
        FamilyGrouperError::Input(_) | FamilyGrouperError::Config(_) => StatusCode::BAD_REQUEST,
        _ => {
            error!("Error processing request: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = match &error {
        FamilyGrouperError::Input(e) => e.to_string(),
        FamilyGrouperError::Config(e) => e.to_string(),
        other => other.to_string(),
    };

    (status, Json(ErrorResponse::new(message)))
}

fn internal_error(message: String) -> ApiError {
    error!("Grouping task failed: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
}
