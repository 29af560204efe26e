//! Common error types for the movie services.
//!
//! Every service maps failures onto [`AppError`] at the boundary where they
//! occur and serializes them to clients as an [`ErrorResponse`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message carried by every "no such movie" answer.
pub const NOT_FOUND_MESSAGE: &str = "Movie Not Found";

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of an outbound hop to the record service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Upstream timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Upstream returned {code}: {message}")]
    Status { code: String, message: String },
}

impl AppError {
    /// The movie could not be found.
    pub fn not_found() -> Self {
        Self::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation(_) => 400,
            AppError::Upstream(UpstreamError::Timeout(_)) => 504,
            AppError::Upstream(_) => 502,
            AppError::Internal(_) => 500,
        }
    }

    /// Log the error at a level matching its severity.
    pub fn report(&self) {
        match self {
            AppError::NotFound(_) | AppError::Validation(_) => {
                tracing::info!(error = %self, "Request rejected");
            }
            AppError::Upstream(_) => tracing::warn!(error = %self, "Upstream call failed"),
            AppError::Internal(_) => tracing::error!(error = %self, "Internal error"),
        }
    }
}

/// Error body returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Provenance of the response, when a gateway produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            source: None,
            detail: None,
        }
    }

    /// Tag the response with the gateway that produced it.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add details to the error response.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::NotFound(message) => Self::new(message.clone()),
            AppError::Validation(message) => Self::new("Invalid request").with_detail(message.clone()),
            AppError::Upstream(UpstreamError::Timeout(_)) => {
                Self::new("Upstream timeout").with_detail(err.to_string())
            }
            AppError::Upstream(_) => Self::new("Upstream unavailable").with_detail(err.to_string()),
            AppError::Internal(_) => Self::new("Internal error"),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error message followed by its whole source chain, `": "`-separated.
pub fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
