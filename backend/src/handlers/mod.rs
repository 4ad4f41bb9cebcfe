//! HTTP handlers for the Arbor tree-asset registry

pub mod assets;
pub mod health;
pub mod weather;

pub use assets::*;
pub use health::*;
pub use weather::*;
