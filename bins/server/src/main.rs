//! Punt API Server
//!
//! Main entry point for the Punt backend service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use punt_api::{AppState, create_router};
use punt_core::settlement::{SettlementEngine, SettlementPolicy};
use punt_db::connect_with_retry;
use punt_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "punt=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database, retrying while it comes up
    let db = connect_with_retry(
        &config.database.url,
        config.database.connect_attempts,
        Duration::from_secs(config.database.connect_retry_secs),
    )
    .await?;

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_hours: config.jwt.token_expires_hours,
    });

    // Settlement engine carries the funds policy from configuration
    let settlement_engine = SettlementEngine::new(SettlementPolicy::from(&config.settlement));
    info!(
        allow_negative_balance = config.settlement.allow_negative_balance,
        "Settlement policy configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        settlement_engine,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
