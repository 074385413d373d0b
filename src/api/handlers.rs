// src/api/handlers.rs

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

use super::store::Submission;
use super::{AppState, ParseResponse, build_response};

pub const USAGE: &str = "POST to this endpoint with JSON body {nodes: [], edges: []} to receive {num_nodes, num_edges, is_dag}.";

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub detail: &'static str,
    pub last_submission: Submission,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the HTTP layer. Validation itself cannot fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `GET /`
pub async fn ping() -> Json<Value> {
    Json(json!({ "Ping": "Pong" }))
}

/// `GET /pipelines/parse`: usage text plus the last accepted submission.
pub async fn parse_info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        detail: USAGE,
        last_submission: state.store.snapshot(),
    })
}

/// `POST /pipelines/parse`: remember the payload and validate it.
///
/// The body is read raw so a missing or wrong `Content-Type` is accepted.
pub async fn parse_pipeline(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ParseResponse>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting submission with invalid JSON body");
        ApiError::from(e)
    })?;

    state.store.record(Submission::from_payload(&payload));

    let response = build_response(&state.validator, state.include_diagnostics, &payload);
    info!(
        num_nodes = response.result.num_nodes,
        num_edges = response.result.num_edges,
        is_dag = response.result.is_dag,
        "pipeline submission validated"
    );

    Ok(Json(response))
}
