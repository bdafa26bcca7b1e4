use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the registry, clause book and composer
#[derive(Debug, Error)]
pub enum ContractError {
    /// A template with this key already exists
    #[error("template '{0}' already exists")]
    DuplicateTemplate(String),

    /// Lookup miss on a template, field, clause or contract
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    /// A template definition breaks one of the field invariants
    #[error("invalid template field '{field}': {reason}")]
    InvalidTemplate { field: String, reason: String },

    /// A submission failed shape or type checks
    #[error("invalid submission field '{field}': {reason}")]
    InvalidSubmission { field: String, reason: String },

    /// The renderer failed to produce a document
    #[error("document composition failed: {0}")]
    CompositionFailed(String),

    /// Underlying store failure; details are logged, not returned
    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

pub type ContractResult<T> = Result<T, ContractError>;

impl ContractError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn invalid_template(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_submission(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSubmission {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateTemplate(_) => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidTemplate { .. } | Self::InvalidSubmission { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::CompositionFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

impl IntoResponse for ContractError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Store(e) => {
                log::error!("Store failure: {:#}", e);
                "Internal server error".to_string()
            }
            Self::CompositionFailed(_) => "Failed to generate contract document".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(&message))).into_response()
    }
}
