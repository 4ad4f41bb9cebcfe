//! Arbor tree-asset registry - backend server

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tree_risk_backend::{
    create_app,
    services::{assets::demo_trees, AssetService, WeatherService},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "arbor_server=debug,tree_risk_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Arbor Tree Registry Server");
    tracing::info!("Environment: {}", config.environment);

    let weather = WeatherService::from_config(&config.weather)?;
    tracing::info!(
        "Live wind from {} at ({}, {}), timeout {}s",
        config.weather.api_endpoint,
        config.weather.latitude,
        config.weather.longitude,
        config.weather.timeout_secs
    );

    let assets = if config.assets.seed_demo_data {
        let trees = demo_trees();
        tracing::info!("Seeded {} demo trees", trees.len());
        AssetService::with_trees(trees)
    } else {
        AssetService::new()
    };

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        weather,
        assets,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
