//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::errors::DeployError;
use crate::models::request::DeployRequest;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "pagedrop".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

/// Deploy response
#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub status: String,
    pub message: String,
    pub repo_url: String,
    pub pages_url: String,
    /// Whether the evaluator acknowledged the result
    pub notified: bool,
    pub skipped_attachments: Vec<String>,
}

fn status_for(err: &DeployError) -> StatusCode {
    match err {
        DeployError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build, publish, then report to the evaluator
pub async fn request_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<DeployRequest>,
) -> Response {
    if request.secret != state.secret.expose_secret() {
        warn!("Rejected request for task {:?}: invalid secret", request.task);
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid secret" })),
        )
            .into_response();
    }

    let report = match state.deployer.deploy(&request).await {
        Ok(report) => report,
        Err(e) => {
            error!("Deploy failed for task {:?}: {}", request.task, e);
            return (
                status_for(&e),
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
                .into_response();
        }
    };

    // Exhaustion is already logged by the notifier
    let notified = state
        .notifier
        .notify(&request, &report.result)
        .await
        .is_ok();

    Json(DeployResponse {
        status: "ok".to_string(),
        message: "App built and evaluation ping sent.".to_string(),
        repo_url: report.result.repo_url,
        pages_url: report.result.pages_url,
        notified,
        skipped_attachments: report.skipped_attachments,
    })
    .into_response()
}
