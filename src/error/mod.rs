//! Application error types for robust error handling.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Credentials taken")]
    CredentialsTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Stored password hash is unreadable")]
    CorruptHash,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CredentialsTaken | AppError::InvalidCredentials => StatusCode::FORBIDDEN,
            AppError::TokenExpired | AppError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            AppError::Config(_)
            | AppError::Storage(_)
            | AppError::CorruptHash
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Server-side faults collapse to a generic text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::CredentialsTaken => "Credentials taken".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::TokenExpired => "Token expired".to_string(),
            AppError::TokenInvalid(_) => "Invalid token".to_string(),
            AppError::Config(_)
            | AppError::Storage(_)
            | AppError::CorruptHash
            | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        let msg = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected Content-Type: application/json"
            }
            _ => "Request body must be a JSON object with string fields email and password",
        };
        AppError::Validation(msg.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
