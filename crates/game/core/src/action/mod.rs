//! Actions: the only way a route changes the world.
//!
//! Every action is a small value type implementing [`ActionTransition`]. The
//! closed [`Action`] enum gathers them so generators and routes can store any
//! of them without boxing.
//!
//! # Module Structure
//!
//! - `mount`: acquiring the mount
//! - `transition`: pipes, crossings, entrances and exits
//! - `stomp`: single and double stomps
//! - `intercept`: hit-point solver used by double stomps
//! - `collect`: picking up artifacts from stomped koopas
//! - `kiosk`: returning artifacts

mod collect;
mod error;
pub mod intercept;
mod kiosk;
mod mount;
mod stomp;
mod transition;

use core::fmt;

pub use collect::{CollectArtifact, CollectMultipleArtifacts};
pub use error::ActionError;
pub use kiosk::ReturnArtifact;
pub use mount::AcquireMount;
pub use stomp::{StompMultipleTargets, StompTarget};
pub use transition::TakeTransition;

use crate::config::GameConfig;
use crate::geometry::Ticks;
use crate::state::{GameState, Koopa, KoopaId, Level};

/// Most targets a multi-target action can name: one per artifact holder.
pub const MAX_TARGETS: usize = GameConfig::NUM_ARTIFACTS;

/// Defines how a concrete action inspects and mutates game state.
///
/// `elapsed` is the route's total time before the action; it only matters for
/// actions that interact with the stomp lockout.
pub trait ActionTransition: fmt::Display {
    /// Whether the action can be taken from `state` at all.
    ///
    /// Infeasibility is an expected outcome, not an error.
    fn is_feasible(&self, state: &GameState) -> bool;

    /// Ticks the action would take from `state`, without mutating it.
    fn time_cost(&self, state: &GameState, elapsed: Ticks) -> Result<Ticks, ActionError>;

    /// Applies the action and returns the ticks it took.
    ///
    /// Callers must check [`is_feasible`](Self::is_feasible) first.
    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError>;

    /// Detailed description given the state before the action and the ticks
    /// it took.
    fn describe(&self, before: &GameState, time: Ticks) -> String;
}

/// Every action a route can contain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    AcquireMount(AcquireMount),
    TakeTransition(TakeTransition),
    StompTarget(StompTarget),
    StompMultipleTargets(StompMultipleTargets),
    CollectArtifact(CollectArtifact),
    CollectMultipleArtifacts(CollectMultipleArtifacts),
    ReturnArtifact(ReturnArtifact),
}

macro_rules! dispatch {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Action::AcquireMount($inner) => $body,
            Action::TakeTransition($inner) => $body,
            Action::StompTarget($inner) => $body,
            Action::StompMultipleTargets($inner) => $body,
            Action::CollectArtifact($inner) => $body,
            Action::CollectMultipleArtifacts($inner) => $body,
            Action::ReturnArtifact($inner) => $body,
        }
    };
}

impl Action {
    /// Returns the snake_case name of the action kind.
    ///
    /// Used for logging and statistics keys.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::AcquireMount(_) => "acquire_mount",
            Action::TakeTransition(_) => "take_transition",
            Action::StompTarget(_) => "stomp_target",
            Action::StompMultipleTargets(_) => "stomp_multiple_targets",
            Action::CollectArtifact(_) => "collect_artifact",
            Action::CollectMultipleArtifacts(_) => "collect_multiple_artifacts",
            Action::ReturnArtifact(_) => "return_artifact",
        }
    }

    /// True for a transition taken from the castle road.
    pub fn is_castle_transition(&self) -> bool {
        matches!(self, Action::TakeTransition(t) if t.is_from_castle())
    }
}

impl ActionTransition for Action {
    fn is_feasible(&self, state: &GameState) -> bool {
        dispatch!(self, action => action.is_feasible(state))
    }

    fn time_cost(&self, state: &GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        dispatch!(self, action => action.time_cost(state, elapsed))
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        dispatch!(self, action => action.apply(state, elapsed))
    }

    fn describe(&self, before: &GameState, time: Ticks) -> String {
        dispatch!(self, action => action.describe(before, time))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, action => fmt::Display::fmt(action, f))
    }
}

impl From<AcquireMount> for Action {
    fn from(action: AcquireMount) -> Self {
        Self::AcquireMount(action)
    }
}

impl From<TakeTransition> for Action {
    fn from(action: TakeTransition) -> Self {
        Self::TakeTransition(action)
    }
}

impl From<StompTarget> for Action {
    fn from(action: StompTarget) -> Self {
        Self::StompTarget(action)
    }
}

impl From<StompMultipleTargets> for Action {
    fn from(action: StompMultipleTargets) -> Self {
        Self::StompMultipleTargets(action)
    }
}

impl From<CollectArtifact> for Action {
    fn from(action: CollectArtifact) -> Self {
        Self::CollectArtifact(action)
    }
}

impl From<CollectMultipleArtifacts> for Action {
    fn from(action: CollectMultipleArtifacts) -> Self {
        Self::CollectMultipleArtifacts(action)
    }
}

impl From<ReturnArtifact> for Action {
    fn from(action: ReturnArtifact) -> Self {
        Self::ReturnArtifact(action)
    }
}

/// Formats koopa ids as `[18, 19]`.
pub(crate) struct TargetList<'a>(pub &'a [KoopaId]);

impl fmt::Display for TargetList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{id}")?;
        }
        f.write_str("]")
    }
}

pub(crate) fn current_level(state: &GameState) -> Result<&Level, ActionError> {
    state.current_level().ok_or(ActionError::NotInLevel)
}

pub(crate) fn current_koopa(state: &GameState, id: KoopaId) -> Result<&Koopa, ActionError> {
    current_level(state)?
        .koopa(id)
        .ok_or(ActionError::MissingKoopa(id))
}
