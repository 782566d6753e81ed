//! Error taxonomy for the HTTP boundary

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by the generation endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller's request is malformed or missing required content
    #[error("{0}")]
    Validation(String),

    /// The upstream completion call failed
    #[error("{0}")]
    Provider(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
