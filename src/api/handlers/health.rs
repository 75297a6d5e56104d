use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

use super::request_id;
use crate::api::{state::AppState, types::*};

/// GET /
pub async fn root_handler() -> Json<RootResponse> {
    let request_id = request_id();
    info!(%request_id, "Root endpoint accessed");

    Json(RootResponse {
        message: "Real Estate Appraisal API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// GET /health -- readiness probe, 503 until the model triple is loaded
pub async fn health_handler(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthResponse>, ApiError> {
    let request_id = request_id();
    info!(%request_id, "Health check requested");

    let readiness = state.service.readiness();
    let Some(model_info) = readiness.model_info else {
        error!(%request_id, "Health check failed: Model not loaded");
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Model not loaded",
            readiness.load_error,
        ));
    };

    info!(%request_id, "Health check successful");
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: readiness.model_loaded,
        model_info,
        uptime_seconds: state.uptime_seconds(),
    }))
}
