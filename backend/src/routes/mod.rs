//! Route definitions for the Arbor tree-asset registry

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/assets", asset_routes())
        .nest("/weather", weather_routes())
}

/// Tree asset routes
fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_assets).post(handlers::create_asset))
        .route("/:asset_id", get(handlers::get_asset))
}

/// Weather control routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_weather).post(handlers::set_simulated_weather),
        )
        .route("/reset", post(handlers::reset_weather))
}
