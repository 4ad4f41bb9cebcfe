//! Weather data models

use serde::{Deserialize, Serialize};

/// Wind speed reported when the live provider cannot be reached
pub const FALLBACK_WIND_SPEED_MPH: f64 = 12.0;

/// Label attached to the wind state used for risk calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherCondition {
    Calm,
    Gale,
    Storm,
    Live,
    LiveFallback,
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherCondition::Calm => write!(f, "CALM"),
            WeatherCondition::Gale => write!(f, "GALE"),
            WeatherCondition::Storm => write!(f, "STORM"),
            WeatherCondition::Live => write!(f, "LIVE"),
            WeatherCondition::LiveFallback => write!(f, "LIVE_FALLBACK"),
        }
    }
}

/// Where the active wind state comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeatherMode {
    #[default]
    Live,
    Simulated,
}

/// Operator-set wind state that supersedes live telemetry until reset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedWeather {
    #[serde(alias = "windSpeed")]
    pub wind_speed_mph: f64,
    pub condition: WeatherCondition,
}

/// The wind state risk calculations should use right now
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub wind_speed_mph: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_degrees: Option<u16>,
    pub condition: WeatherCondition,
    pub is_simulation: bool,
    /// WMO weather interpretation code, live readings only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f64>,
}

impl WeatherSnapshot {
    pub fn simulated(weather: SimulatedWeather) -> Self {
        Self {
            wind_speed_mph: weather.wind_speed_mph,
            wind_direction_degrees: None,
            condition: weather.condition,
            is_simulation: true,
            weather_code: None,
            weather_description: None,
            temperature_celsius: None,
        }
    }

    /// Fixed snapshot used when the live provider fails
    pub fn live_fallback() -> Self {
        Self {
            wind_speed_mph: FALLBACK_WIND_SPEED_MPH,
            wind_direction_degrees: None,
            condition: WeatherCondition::LiveFallback,
            is_simulation: false,
            weather_code: None,
            weather_description: None,
            temperature_celsius: None,
        }
    }

    pub fn mode(&self) -> WeatherMode {
        if self.is_simulation {
            WeatherMode::Simulated
        } else {
            WeatherMode::Live
        }
    }
}

/// Normalise a bearing into whole degrees 0-359
pub fn normalize_bearing(degrees: f64) -> Option<u16> {
    if !degrees.is_finite() {
        return None;
    }
    Some(degrees.round().rem_euclid(360.0) as u16)
}

/// Short label for a WMO weather interpretation code
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        i32::MIN..=1 => "Clear Sky",
        2..=3 => "Partly Cloudy",
        4..=48 => "Foggy",
        49..=67 => "Rain",
        68..=77 => "Snow",
        78..=82 => "Heavy Rain",
        83..=99 => "Thunderstorm",
        _ => "Fair",
    }
}
