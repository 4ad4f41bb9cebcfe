//! Shared types and models for the Arbor tree-asset registry
//!
//! This crate contains types shared between the backend, the browser client
//! (via WASM), and other components of the system. The risk evaluator lives
//! here so that every consumer computes identical scores.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
