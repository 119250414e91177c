//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::OeeError;

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
    /// Internal server error
    Internal(String),
    /// Query error from the aggregation services
    Query(OeeError),
    /// Repository error outside a query (units, health)
    Repository(RepositoryError),
}

impl AppError {
    /// Status code and body for this error.
    pub fn to_parts(&self) -> (StatusCode, ApiError) {
        match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg.clone()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::Query(e @ OeeError::InvalidRange { .. }) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_RANGE", e.to_string()),
            ),
            AppError::Query(OeeError::DataSourceUnavailable(e)) | AppError::Repository(e) => {
                repository_parts(e)
            }
        }
    }

    /// Body only, for WebSocket error frames.
    pub fn to_api_error(&self) -> ApiError {
        self.to_parts().1
    }
}

fn repository_parts(err: &RepositoryError) -> (StatusCode, ApiError) {
    match err {
        RepositoryError::ConfigurationError { .. }
        | RepositoryError::ValidationError { .. }
        | RepositoryError::InternalError { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", err.to_string()),
        ),
        _ => {
            let error = ApiError::new("DATA_SOURCE_UNAVAILABLE", err.to_string());
            let error = if err.is_retryable() {
                error.with_details("retryable")
            } else {
                error
            };
            (StatusCode::SERVICE_UNAVAILABLE, error)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.to_parts();
        if status.is_server_error() {
            tracing::warn!("{} {}: {}", status, error.code, error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<OeeError> for AppError {
    fn from(err: OeeError) -> Self {
        AppError::Query(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
