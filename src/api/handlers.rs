use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ContractError, ContractResult};
use crate::logic::{
    ClauseBook, ContractRegistry, DocumentComposer, DocumentRenderer, TemplateRegistry,
};
use crate::store::traits::Store;

/// Shared handler state: the store handle and the document renderer
pub struct AppState<S> {
    pub store: Arc<S>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: Arc<S>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    pub fn templates(&self) -> TemplateRegistry<S> {
        TemplateRegistry::new(self.store.clone())
    }

    pub fn clauses(&self) -> ClauseBook<S> {
        ClauseBook::new(self.store.clone())
    }

    pub fn contracts(&self) -> ContractRegistry<S> {
        ContractRegistry::new(self.store.clone())
    }

    pub fn composer(&self) -> DocumentComposer<S> {
        DocumentComposer::new(self.store.clone(), self.renderer.clone())
    }
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Unwrap a template body, reporting unreadable JSON as `InvalidTemplate`
pub fn template_body<T>(payload: Result<Json<T>, JsonRejection>) -> ContractResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ContractError::invalid_template("body", rejection.body_text()))
}

/// Unwrap a contract, clause or submission body, reporting unreadable JSON
/// as `InvalidSubmission`
pub fn submission_body<T>(payload: Result<Json<T>, JsonRejection>) -> ContractResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ContractError::invalid_submission("body", rejection.body_text()))
}
