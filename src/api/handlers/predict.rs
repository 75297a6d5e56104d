use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use super::request_id;
use crate::api::{state::AppState, types::*};
use crate::domain::{BatchPredictResponse, PredictionRequest, PredictionResult};
use crate::error::KanteiError;

fn reject_body(request_id: &str, rejection: JsonRejection) -> ApiError {
    warn!(%request_id, "Malformed request body: {}", rejection.body_text());
    api_error(
        StatusCode::BAD_REQUEST,
        "Invalid input",
        Some(rejection.body_text()),
    )
}

fn log_failure(request_id: &str, e: &KanteiError) {
    match e {
        KanteiError::InvalidInput(msg) => warn!(%request_id, "Invalid input data: {}", msg),
        other => error!(%request_id, "Prediction failed: {}", other),
    }
}

/// POST /predict
pub async fn predict_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Json<PredictionResult>, ApiError> {
    let request_id = request_id();
    info!(%request_id, "Prediction request started");

    let Json(body) = body.map_err(|r| reject_body(&request_id, r))?;

    let result = PredictionRequest::from_json(&body)
        .and_then(|req| {
            info!(%request_id, ward = %req.ward, "Processing prediction");
            state.service.predict(&req)
        })
        .map_err(|e| {
            log_failure(&request_id, &e);
            to_api_error(e)
        })?;

    info!(
        %request_id,
        "Prediction successful: {:.1}万円", result.predicted_price
    );
    Ok(Json(result))
}

/// POST /predict/batch
pub async fn predict_batch_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Json<BatchPredictResponse>, ApiError> {
    let request_id = request_id();
    info!(%request_id, "Batch prediction request started");

    let Json(body) = body.map_err(|r| reject_body(&request_id, r))?;
    let Value::Array(items) = body else {
        warn!(%request_id, "Batch body is not an array");
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid input",
            Some("request body must be a JSON array".to_string()),
        ));
    };

    let out = state
        .service
        .predict_batch(&items, state.batch_max_size)
        .map_err(|e| {
            log_failure(&request_id, &e);
            to_api_error(e)
        })?;

    info!(
        %request_id,
        total = out.total_processed,
        successful = out.successful,
        failed = out.failed,
        "Batch prediction finished"
    );
    Ok(Json(out))
}
