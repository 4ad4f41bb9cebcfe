//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use shared::WeatherMode;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub weather_mode: WeatherMode,
    pub tree_count: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_mode: state.weather.mode(),
        tree_count: state.assets.list().len(),
    })
}
