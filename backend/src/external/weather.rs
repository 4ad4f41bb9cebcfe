//! Weather API client for fetching live wind conditions
//!
//! Integrates with the Open-Meteo forecast API (no API key required)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use shared::{describe_weather_code, normalize_bearing, WeatherCondition, WeatherSnapshot};

use crate::error::{AppError, AppResult};

const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,wind_direction_10m,weathercode";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Current wind conditions at a point
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWind {
    pub wind_speed_mph: f64,
    pub wind_direction_degrees: Option<u16>,
    pub weather_code: Option<i32>,
    pub temperature_celsius: Option<f64>,
}

impl CurrentWind {
    /// Snapshot as reported for live mode
    pub fn into_snapshot(self) -> WeatherSnapshot {
        WeatherSnapshot {
            wind_speed_mph: self.wind_speed_mph,
            wind_direction_degrees: self.wind_direction_degrees,
            condition: WeatherCondition::Live,
            is_simulation: false,
            weather_code: self.weather_code,
            weather_description: self
                .weather_code
                .map(|code| describe_weather_code(code).to_string()),
            temperature_celsius: self.temperature_celsius,
        }
    }
}

/// Open-Meteo API response for current conditions
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    current: OpenMeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature_2m: Option<f64>,
    wind_speed_10m: f64,
    wind_direction_10m: Option<f64>,
    #[serde(alias = "weather_code")]
    weathercode: Option<i32>,
}

impl WeatherClient {
    /// Create a new WeatherClient for the given API base URL.
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Weather HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current wind conditions by GPS coordinates, in mph
    pub async fn get_current_wind(&self, latitude: f64, longitude: f64) -> AppResult<CurrentWind> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current={}&wind_speed_unit=mph",
            self.base_url, latitude, longitude, CURRENT_FIELDS
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!("{} - {}", status, body)));
        }

        let data: OpenMeteoResponse = response
            .json()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("unreadable response: {}", e)))?;

        Ok(convert_current(data.current))
    }
}

fn convert_current(current: OpenMeteoCurrent) -> CurrentWind {
    CurrentWind {
        wind_speed_mph: current.wind_speed_10m,
        wind_direction_degrees: current.wind_direction_10m.and_then(normalize_bearing),
        weather_code: current.weathercode,
        temperature_celsius: current.temperature_2m,
    }
}
