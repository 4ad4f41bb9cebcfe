//! Business logic services for the Arbor tree-asset registry

pub mod assets;
pub mod weather;

pub use assets::AssetService;
pub use weather::{WeatherReading, WeatherService, WeatherState};
