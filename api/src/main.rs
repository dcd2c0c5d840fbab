use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentcp_api::{
    config::Config, create_router, database, initialize_payment_gateways,
    notify::NotificationHub, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentcp_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Connect to database and run migrations
    let db = database::connect(&config.database_url).await?;
    database::migrate(&db).await?;

    // Make sure the cash-proof upload directory exists
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Initialize payment gateways
    let gateways = initialize_payment_gateways(&config)?;

    let state = AppState {
        db,
        config: config.clone(),
        gateways: Arc::new(gateways),
        hub: Arc::new(NotificationHub::new()),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("RentCP API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
