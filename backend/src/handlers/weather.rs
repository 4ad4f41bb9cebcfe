//! HTTP handlers for weather control endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use shared::{SimulatedWeather, WeatherMode, WeatherSnapshot};

use crate::AppState;

/// Response to a mode switch
#[derive(Debug, Serialize)]
pub struct WeatherModeResponse {
    pub success: bool,
    pub mode: WeatherMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SimulatedWeather>,
}

/// Get the wind state risk calculations are currently using
pub async fn get_weather(State(state): State<AppState>) -> Json<WeatherSnapshot> {
    Json(state.weather.current_snapshot().await)
}

/// Override live weather with a simulated wind
pub async fn set_simulated_weather(
    State(state): State<AppState>,
    Json(input): Json<SimulatedWeather>,
) -> Json<WeatherModeResponse> {
    let data = state
        .weather
        .set_override(input.wind_speed_mph, input.condition);

    Json(WeatherModeResponse {
        success: true,
        mode: WeatherMode::Simulated,
        data: Some(data),
    })
}

/// Drop any override and return to the live feed
pub async fn reset_weather(State(state): State<AppState>) -> Json<WeatherModeResponse> {
    state.weather.reset_to_live();

    Json(WeatherModeResponse {
        success: true,
        mode: WeatherMode::Live,
        data: None,
    })
}
