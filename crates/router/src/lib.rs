//! Time-optimal route search over the `mim-core` simulation model.
//!
//! The crate is organized by responsibility:
//! - [`generator`] enumerates the feasible actions of a state
//! - [`heuristic`] estimates the time a route still needs
//! - [`optimizer`] runs the two-tier best-first search and reports
//!   [`SearchStats`] alongside the routes it finds
//! - [`config`] selects strategies and search limits
pub mod config;
pub mod error;
pub mod generator;
pub mod heuristic;
pub mod optimizer;

pub use config::{GeneratorKind, HeuristicKind, OptimizerConfig};
pub use error::{Result, RouterError};
pub use generator::{ActionGenerator, DefaultActionGenerator, NaturalOrderActionGenerator};
pub use heuristic::{Heuristic, SlightlyBetterHeuristic, UnderestimatingHeuristic};
pub use optimizer::{RouteOptimizer, SearchOutcome, SearchStats};
