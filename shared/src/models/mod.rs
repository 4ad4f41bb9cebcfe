//! Domain models for the Arbor tree-asset registry

mod risk;
mod tree;
mod weather;

pub use risk::*;
pub use tree::*;
pub use weather::*;
