//! Auth extractor: identity claims from a Bearer JWT.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tracing::debug;

use crate::auth::Claims;
use crate::error::AppError;
use crate::handlers::http::AppState;

/// Extractor: verified token claims of the calling identity.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    debug!(error = %e, "rejected request: missing bearer token");
                    AppError::TokenInvalid("Missing or invalid Authorization header".to_string())
                })?;
        let claims = state.credentials().tokens().verify(bearer.token())?;
        Ok(AuthUser(claims))
    }
}
