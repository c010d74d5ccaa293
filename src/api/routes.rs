//! HTTP routes for the travel agent API.

use super::types::{ApprovalRequest, DeleteTripResponse, HealthResponse, StartTripRequest};
use crate::agent::{RunSnapshot, TravelAgent, WorkflowError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

/// Shared server state.
pub struct AppState {
    pub agent: TravelAgent,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/trips", post(start_trip))
        .route("/api/trips/:thread_id", get(get_trip).delete(delete_trip))
        .route("/api/trips/:thread_id/approval", post(approve_trip))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Start a new planning thread, or retry one that failed mid-run.
async fn start_trip(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartTripRequest>,
) -> Result<Json<RunSnapshot>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "query is required".to_string()));
    }
    let thread_id = req
        .thread_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(%thread_id, query_len = query.len(), "trip requested");
    let snapshot = state
        .agent
        .start(&thread_id, &query)
        .await
        .map_err(workflow_error_response)?;
    Ok(Json(snapshot))
}

/// Approve a plan and deliver it by email.
async fn approve_trip(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<ApprovalRequest>,
) -> Result<Json<RunSnapshot>, (StatusCode, String)> {
    tracing::info!(%thread_id, to = %req.to_email, "approval received");
    let snapshot = state
        .agent
        .resume(
            &thread_id,
            &req.from_email,
            &req.to_email,
            &req.email_subject,
        )
        .await
        .map_err(workflow_error_response)?;
    Ok(Json(snapshot))
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> Result<Json<RunSnapshot>, (StatusCode, String)> {
    let snapshot = state
        .agent
        .inspect(&thread_id)
        .await
        .map_err(workflow_error_response)?;
    Ok(Json(snapshot))
}

async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> Result<Json<DeleteTripResponse>, (StatusCode, String)> {
    let deleted = state
        .agent
        .delete_thread(&thread_id)
        .await
        .map_err(workflow_error_response)?;
    tracing::info!(%thread_id, deleted, "trip deleted");
    Ok(Json(DeleteTripResponse { deleted }))
}

fn workflow_error_response(error: WorkflowError) -> (StatusCode, String) {
    let status = match &error {
        WorkflowError::UnknownThread(_) => StatusCode::NOT_FOUND,
        WorkflowError::NotAwaitingApproval { .. } => StatusCode::CONFLICT,
        WorkflowError::MissingDeliveryParams => StatusCode::BAD_REQUEST,
        WorkflowError::Model(_) => StatusCode::SERVICE_UNAVAILABLE,
        WorkflowError::DecisionLimitReached { .. } => StatusCode::BAD_GATEWAY,
        WorkflowError::Checkpoint(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}
