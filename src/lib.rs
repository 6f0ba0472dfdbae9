//! Credential issuance service built with Rust.
//!
//! Registers email/password identities, authenticates returning users with
//! Argon2id-verified secrets, and mints 15-minute HS256 access tokens.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod users;

pub use auth::{CredentialService, PasswordHasher, TokenIssuer};
pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};
use handlers::http;

/// Build the API router (auth, users, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/signup", post(auth::register))
        .route("/signin", post(auth::login));

    let user_routes = axum::Router::new().route("/me", get(users::me));

    axum::Router::new()
        .route("/health", get(http::health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .with_state(state)
}
