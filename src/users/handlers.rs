//! User HTTP handlers.

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::AuthUser;
use crate::models::IdentityInfo;

/// GET /users/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<IdentityInfo>, AppError> {
    let id = claims.subject()?;
    let identity = state
        .credentials()
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::TokenInvalid("identity no longer exists".to_string()))?;
    Ok(Json(IdentityInfo::from(&identity)))
}
