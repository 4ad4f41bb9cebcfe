//! Weather state for risk calculations
//!
//! Holds the single answer to "what wind should risk scores use right now":
//! either the live reading from the wind provider or an operator override.
//! The override persists until explicitly reset; it is never written to
//! durable storage.

use std::sync::{Arc, PoisonError, RwLock};

use shared::{GpsCoordinates, SimulatedWeather, WeatherCondition, WeatherMode, WeatherSnapshot};

use crate::config::WeatherConfig;
use crate::error::AppResult;
use crate::external::weather::WeatherClient;

/// Source currently feeding risk calculations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActiveWeather {
    #[default]
    Live,
    Simulated(SimulatedWeather),
}

impl ActiveWeather {
    pub fn mode(&self) -> WeatherMode {
        match self {
            ActiveWeather::Live => WeatherMode::Live,
            ActiveWeather::Simulated(_) => WeatherMode::Simulated,
        }
    }
}

/// Process-wide weather mode, shared by every request handler.
///
/// Writes replace the whole value under a short write lock, so readers see
/// either the old or the new state. Last write wins.
#[derive(Debug, Default)]
pub struct WeatherState {
    active: RwLock<ActiveWeather>,
}

impl WeatherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveWeather {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mode(&self) -> WeatherMode {
        self.active().mode()
    }

    /// Switch to simulation with the given wind. Takes effect immediately for all readers.
    pub fn set_override(&self, wind_speed_mph: f64, condition: WeatherCondition) -> SimulatedWeather {
        let simulated = SimulatedWeather {
            wind_speed_mph,
            condition,
        };
        *self.active.write().unwrap_or_else(PoisonError::into_inner) =
            ActiveWeather::Simulated(simulated);
        simulated
    }

    /// Return to live telemetry, discarding any override
    pub fn reset_to_live(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = ActiveWeather::Live;
    }
}

/// Where a snapshot came from
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReading {
    Simulated(WeatherSnapshot),
    Live(WeatherSnapshot),
    /// Live fetch failed; carries the fixed fallback snapshot
    Fallback(WeatherSnapshot),
}

impl WeatherReading {
    pub fn snapshot(&self) -> &WeatherSnapshot {
        match self {
            WeatherReading::Simulated(s) | WeatherReading::Live(s) | WeatherReading::Fallback(s) => s,
        }
    }

    pub fn into_snapshot(self) -> WeatherSnapshot {
        match self {
            WeatherReading::Simulated(s) | WeatherReading::Live(s) | WeatherReading::Fallback(s) => s,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, WeatherReading::Fallback(_))
    }
}

/// Weather service: owns the shared state and the live wind client
#[derive(Clone)]
pub struct WeatherService {
    state: Arc<WeatherState>,
    client: WeatherClient,
    location: GpsCoordinates,
}

impl WeatherService {
    /// Create a new WeatherService in live mode
    pub fn new(client: WeatherClient, location: GpsCoordinates) -> Self {
        Self {
            state: Arc::new(WeatherState::new()),
            client,
            location,
        }
    }

    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
        let client = WeatherClient::new(&config.api_endpoint, config.timeout())?;
        Ok(Self::new(
            client,
            GpsCoordinates::new(config.latitude, config.longitude),
        ))
    }

    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    pub fn mode(&self) -> WeatherMode {
        self.state.mode()
    }

    /// Read the active weather, recording where it came from
    pub async fn read(&self) -> WeatherReading {
        // Copy out before awaiting so no lock is held across the fetch
        let active = self.state.active();
        match active {
            ActiveWeather::Simulated(simulated) => {
                WeatherReading::Simulated(WeatherSnapshot::simulated(simulated))
            }
            ActiveWeather::Live => self.fetch_live().await,
        }
    }

    /// Wind state for risk calculations. Never fails: provider errors yield the fallback.
    pub async fn current_snapshot(&self) -> WeatherSnapshot {
        self.read().await.into_snapshot()
    }

    async fn fetch_live(&self) -> WeatherReading {
        match self
            .client
            .get_current_wind(self.location.latitude, self.location.longitude)
            .await
        {
            Ok(wind) => {
                tracing::debug!(
                    wind_speed_mph = wind.wind_speed_mph,
                    "Live wind reading received"
                );
                WeatherReading::Live(wind.into_snapshot())
            }
            Err(e) => {
                tracing::warn!("Live weather unavailable, using fallback: {}", e);
                WeatherReading::Fallback(WeatherSnapshot::live_fallback())
            }
        }
    }

    pub fn set_override(&self, wind_speed_mph: f64, condition: WeatherCondition) -> SimulatedWeather {
        let simulated = self.state.set_override(wind_speed_mph, condition);
        tracing::info!(
            wind_speed_mph,
            condition = %condition,
            "Weather simulation override set"
        );
        simulated
    }

    pub fn reset_to_live(&self) {
        self.state.reset_to_live();
        tracing::info!("Weather reset to live feed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_service() -> WeatherService {
        // Port 9 (discard) on loopback refuses connections on test hosts
        let client = WeatherClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        WeatherService::new(client, GpsCoordinates::new(53.19, -2.89))
    }

    #[test]
    fn test_state_starts_live() {
        let state = WeatherState::new();
        assert_eq!(state.active(), ActiveWeather::Live);
        assert_eq!(state.mode(), WeatherMode::Live);
    }

    #[test]
    fn test_override_then_reset() {
        let state = WeatherState::new();
        state.set_override(45.0, WeatherCondition::Gale);
        assert_eq!(
            state.active(),
            ActiveWeather::Simulated(SimulatedWeather {
                wind_speed_mph: 45.0,
                condition: WeatherCondition::Gale,
            })
        );

        state.reset_to_live();
        assert_eq!(state.active(), ActiveWeather::Live);
    }

    #[test]
    fn test_last_override_wins() {
        let state = WeatherState::new();
        state.set_override(5.0, WeatherCondition::Calm);
        state.set_override(80.0, WeatherCondition::Storm);

        match state.active() {
            ActiveWeather::Simulated(sim) => {
                assert_eq!(sim.wind_speed_mph, 80.0);
                assert_eq!(sim.condition, WeatherCondition::Storm);
            }
            other => panic!("expected simulation, got {:?}", other),
        }
    }

    #[test]
    fn test_override_accepts_any_values() {
        let state = WeatherState::new();
        state.set_override(-3.0, WeatherCondition::LiveFallback);
        assert_eq!(state.mode(), WeatherMode::Simulated);
    }

    #[tokio::test]
    async fn test_simulated_read_skips_network() {
        let service = unreachable_service();
        service.set_override(45.0, WeatherCondition::Gale);

        let reading = service.read().await;
        assert!(matches!(reading, WeatherReading::Simulated(_)));

        let snapshot = reading.into_snapshot();
        assert!(snapshot.is_simulation);
        assert_eq!(snapshot.wind_speed_mph, 45.0);
        assert_eq!(snapshot.condition, WeatherCondition::Gale);
    }

    #[tokio::test]
    async fn test_simulated_reads_are_idempotent() {
        let service = unreachable_service();
        service.set_override(80.0, WeatherCondition::Storm);

        let first = service.current_snapshot().await;
        let second = service.current_snapshot().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unreachable_provider_falls_back() {
        let service = unreachable_service();

        let reading = service.read().await;
        assert!(reading.is_fallback());
        assert_eq!(reading.snapshot(), &WeatherSnapshot::live_fallback());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let service = unreachable_service();
        let handle = service.clone();

        handle.set_override(45.0, WeatherCondition::Gale);
        assert_eq!(service.mode(), WeatherMode::Simulated);

        service.reset_to_live();
        let snapshot = handle.current_snapshot().await;
        assert!(!snapshot.is_simulation);
        assert_eq!(snapshot.condition, WeatherCondition::LiveFallback);
    }
}
