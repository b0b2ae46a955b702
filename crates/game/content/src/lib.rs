//! Data-driven scenarios for the route optimizer.
//!
//! This crate reads the files a routing run starts from:
//! - World scenarios (floors, levels, roads, kiosks, koopas and the player) in RON
//! - Game configuration (NPC generator seed) in TOML
//!
//! Loaders validate the data through the `mim-core` constructors, so a
//! malformed scenario is rejected before any search starts.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, WorldLoader};
