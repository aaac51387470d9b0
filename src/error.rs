use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures while training, saving or loading the risk model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found at {0}")]
    MissingArtifact(String),

    #[error("invalid model meta: {0}")]
    Meta(String),

    #[error("feature order mismatch: expected {expected:?}, got {got:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("model produced a non-finite probability: {0}")]
    NonFinite(f64),

    #[error("empty training set")]
    EmptyDataset,

    #[error("synthetic distribution: {0}")]
    Synthetic(#[from] rand_distr::NormalError),

    #[error("torch error: {0}")]
    Torch(#[from] tch::TchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}={value}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidTelemetry(#[from] JsonRejection),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ModelError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // 422 for shape/type errors, 400 for broken JSON, 415 for content type
            ApiError::InvalidTelemetry(rejection) => rejection.status(),
            ApiError::Scoring(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
