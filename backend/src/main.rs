//! Pest.i Monitoring Server
//!
//! Dashboard backend for agricultural pest monitoring: observation history,
//! KPIs, forecasts and notifications.

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pest_monitor::{create_app, services::DataProvider, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pest_monitor=debug,pest_monitor_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Pest.i Monitoring Server");
    tracing::info!("Environment: {}", config.environment);
    if let Some(seed) = config.data.seed {
        tracing::info!("Mock data seed: {}", seed);
    }

    // Observations are generated here, when notifications are seeded
    let data = Arc::new(DataProvider::new(config.data.seed));
    let state = AppState::new(data, config.clone());

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
