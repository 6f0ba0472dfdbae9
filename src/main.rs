//! Entry point: load config, wire dependencies, and run the server.

use credgate::config::Config;
use credgate::db::{self, IdentityStore, MemoryIdentityStore, PgIdentityStore};
use credgate::{create_app, AppState, CredentialService, PasswordHasher, TokenIssuer};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn IdentityStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgIdentityStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; identities are kept in memory only");
            Arc::new(MemoryIdentityStore::new())
        }
    };

    let hasher = PasswordHasher::new(config.hash)?;
    let tokens = TokenIssuer::new(&config.jwt_secret)?;
    let credentials = CredentialService::new(store, hasher, tokens)?;

    let app = create_app(AppState::new(credentials)).layer(TraceLayer::new_for_http());

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
