//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::planner::PlannerError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Request is well-formed but the catalog/request combination cannot be
    /// processed (e.g. cyclic dependency declarations)
    Unprocessable(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("UNPROCESSABLE", msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::CyclicDependency(_) => AppError::Unprocessable(err.to_string()),
            PlannerError::Solver(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization_skips_missing_details() {
        let err = ApiError::new("BAD_REQUEST", "nope");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("details"));

        let err = err.with_details("more context");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("more context"));
    }

    #[test]
    fn test_planner_error_mapping() {
        let err: AppError = PlannerError::CyclicDependency("p1".to_string()).into();
        assert!(matches!(err, AppError::Unprocessable(_)));

        let err: AppError = PlannerError::Solver("backend died".to_string()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
