use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error = ErrorResponse {
            error: self.to_string(),
        };

        match self {
            ApiError::InvalidInput(_) => HttpResponse::BadRequest().json(error),
            _ => HttpResponse::InternalServerError().json(error),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigurationError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Failures of a single concierge query.
///
/// These never reach the HTTP consumer; they are logged and collapsed to
/// "no result" by `ConciergeService::get_book_recommendations`.
#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream model error: {0}")]
    Upstream(String),

    #[error("Upstream model returned no text")]
    EmptyResponse,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Model response has invalid shape: {0}")]
    InvalidShape(String),
}

/// Payload-free tag of a [`ConciergeError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConfigurationError,
    UpstreamError,
    EmptyResponseError,
    MalformedResponseError,
    InvalidShapeError,
}

impl ConciergeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConciergeError::Configuration(_) => FailureKind::ConfigurationError,
            ConciergeError::Upstream(_) => FailureKind::UpstreamError,
            ConciergeError::EmptyResponse => FailureKind::EmptyResponseError,
            ConciergeError::MalformedResponse(_) => FailureKind::MalformedResponseError,
            ConciergeError::InvalidShape(_) => FailureKind::InvalidShapeError,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::ConfigurationError => "ConfigurationError",
            FailureKind::UpstreamError => "UpstreamError",
            FailureKind::EmptyResponseError => "EmptyResponseError",
            FailureKind::MalformedResponseError => "MalformedResponseError",
            FailureKind::InvalidShapeError => "InvalidShapeError",
        };
        f.write_str(name)
    }
}
