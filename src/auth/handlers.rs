//! Auth HTTP handlers: signup, signin.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{AccessToken, Credential};

/// POST /auth/signup
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credential>, JsonRejection>,
) -> Result<(StatusCode, Json<AccessToken>), AppError> {
    let Json(body) = body?;
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let token = state.credentials().register(body).await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /auth/signin
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credential>, JsonRejection>,
) -> Result<Json<AccessToken>, AppError> {
    let Json(body) = body?;
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    let token = state.credentials().login(body).await?;
    Ok(Json(token))
}
