//! Shared state and health probe.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::CredentialService;

/// Shared application state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
}

impl AppState {
    pub fn new(credentials: CredentialService) -> Self {
        Self { credentials }
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "credgate" })),
    )
}
