//! Content loaders for reading scenario files.
//!
//! `world.ron` describes the game state to route from and `game.toml` the
//! tunable [`GameConfig`](mim_core::GameConfig).

pub mod config;
pub mod world;

pub use config::ConfigLoader;
pub use world::WorldLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
