//! Gateway error taxonomy and HTTP mapping.
//!
//! # Responsibilities
//! - Normalize local validation failures and backend failures into one shape
//! - Map each failure kind to a fixed (HTTP status, stable code) pair
//! - Emit exactly one JSON error body per failed invocation
//!
//! # Design Decisions
//! - The status/code table is closed; kinds without a specific entry fall
//!   back to 500 `internal_error` rather than leaking detail
//! - Parameter and body errors never reach the backend invoker
//! - Nothing here is fatal to the process; every failure becomes a response

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::backend::BackendError;

/// Normalized failure of one gateway invocation, independent of whether it
/// originated locally or from the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A query or path parameter was missing or malformed.
    #[error("{message}")]
    InvalidParameter {
        code: &'static str,
        message: String,
    },

    /// The request body was not decodable JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The body decoded but broke one or more domain rules.
    #[error("request validation failed")]
    ValidationFailed(Vec<String>),

    /// The backend call itself failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ApiError {
    /// Parameter failure with a stable machine-readable code.
    pub fn invalid_parameter(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            code,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidParameter { code, .. } => code,
            Self::MalformedBody(_) => "malformed_body",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Backend(BackendError::Unavailable(_)) => "backend_unavailable",
            Self::Backend(BackendError::Timeout) => "backend_timeout",
            Self::Backend(BackendError::Remote { .. }) => "backend_error",
            // No specific mapping registered: designed generic fallback.
            Self::Backend(BackendError::Decode(_)) => "internal_error",
        }
    }

    /// Fixed HTTP status for this failure, from the closed mapping table.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. } | Self::MalformedBody(_) | Self::ValidationFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Backend(BackendError::Unavailable(_) | BackendError::Remote { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Backend(BackendError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Backend(BackendError::Decode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let violations = match &self {
            ApiError::ValidationFailed(violations) => Some(violations.clone()),
            _ => None,
        };
        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
            violations,
        };
        (self.status(), Json(body)).into_response()
    }
}
