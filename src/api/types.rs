use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::KanteiError;
use crate::predictor::ModelInfo;

// ============================================================================
// Service Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_info: ModelInfo,
    pub uptime_seconds: i64,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: &str, detail: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            detail,
        }),
    )
}

/// Map a service error onto the HTTP contract. Internal failures are not
/// echoed to the caller.
pub fn to_api_error(e: KanteiError) -> ApiError {
    match e {
        KanteiError::InvalidInput(msg) => {
            api_error(StatusCode::BAD_REQUEST, "Invalid input", Some(msg))
        }
        KanteiError::NotReady => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Model not available",
            Some("Model not loaded properly".to_string()),
        ),
        KanteiError::PredictionFailure(msg) => api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Prediction service error",
            Some(msg),
        ),
        _ => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            Some("An unexpected error occurred".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_taxonomy_to_status_codes() {
        let cases = [
            (KanteiError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (KanteiError::NotReady, StatusCode::SERVICE_UNAVAILABLE),
            (
                KanteiError::PredictionFailure("nan".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                KanteiError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(to_api_error(err).0, expected);
        }
    }

    #[test]
    fn internal_details_are_hidden() {
        let (_, Json(body)) = to_api_error(KanteiError::Io(std::io::Error::other("secret path")));
        assert!(!body.detail.unwrap().contains("secret"));
    }
}
