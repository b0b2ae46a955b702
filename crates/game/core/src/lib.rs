//! Deterministic simulation model for routing "Mario is Missing".
//!
//! `mim-core` defines the world model (floors, levels, roads, koopas, kiosks,
//! the player and the NPC slot generator), the seven actions that change it,
//! and [`Route`], the branchable action trail the optimizer searches over.
//! Nothing here performs I/O; loaders build a [`GameState`] and the router
//! drives it through [`Action`]s.
pub mod action;
pub mod config;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod route;
pub mod state;

pub use action::{
    AcquireMount, Action, ActionError, ActionTransition, CollectArtifact,
    CollectMultipleArtifacts, MAX_TARGETS, ReturnArtifact, StompMultipleTargets, StompTarget,
    TakeTransition,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use geometry::{GeometryError, Interval, NEVER, Position, Ticks};
pub use rng::SlotRng;
pub use route::{HistoryEntry, Route};
pub use state::{
    ArtifactId, CompletionCode, Floor, FloorId, FloorLayout, GameState, Kiosk, Koopa, KoopaId,
    KoopaStatus, Level, LevelId, LevelKey, LevelLayout, Player, Road, RoadId, StateError,
    Transition, TransitionKind, TransitionRef,
};
