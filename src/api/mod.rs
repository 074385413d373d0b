// src/api/mod.rs

//! HTTP transport around the validator.
//!
//! - [`store`] holds the last accepted submission.
//! - [`handlers`] implements the three routes.
//! - [`server`] binds the listener and runs until shutdown.
//!
//! [`router`] is kept free of sockets so it can be driven directly in tests.

pub mod handlers;
pub mod server;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{ConfigFile, CorsOrigins};
use crate::dag::{Diagnostics, GraphValidator, ValidationResult};

pub use server::{serve, serve_with_shutdown, shutdown_signal};
pub use store::{Submission, SubmissionStore};

pub const PARSE_PATH: &str = "/pipelines/parse";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<SubmissionStore>,
    pub validator: GraphValidator,
    pub include_diagnostics: bool,
}

impl AppState {
    pub fn new(store: Arc<SubmissionStore>, config: &ConfigFile) -> Self {
        Self {
            store,
            validator: GraphValidator::new(config.validation.id_policy),
            include_diagnostics: config.validation.include_diagnostics,
        }
    }
}

/// Body of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub result: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

pub fn build_response(
    validator: &GraphValidator,
    include_diagnostics: bool,
    payload: &Value,
) -> ParseResponse {
    if include_diagnostics {
        let report = validator.report_payload(payload);
        ParseResponse {
            result: report.result,
            diagnostics: Some(report.diagnostics),
        }
    } else {
        ParseResponse {
            result: validator.validate_payload(payload),
            diagnostics: None,
        }
    }
}

/// Build the application router for `config`, sharing `store`.
pub fn router(config: &ConfigFile, store: Arc<SubmissionStore>) -> Router {
    let state = AppState::new(store, config);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(handlers::ping))
        .route(
            PARSE_PATH,
            get(handlers::parse_info).post(handlers::parse_pipeline),
        )
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(cors_layer(&config.server.cors))
        .layer(trace_layer)
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    match origins {
        CorsOrigins::Any => layer.allow_origin(AllowOrigin::any()),
        // Credentials are only allowed with an explicit origin list.
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect();
            layer
                .allow_origin(AllowOrigin::list(values))
                .allow_credentials(true)
        }
    }
}
