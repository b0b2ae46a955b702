//! Action costing and application errors.
//!
//! Infeasible actions are filtered out before they reach these paths, so every
//! variant here means the simulation model and the action disagree.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ArtifactId, FloorId, KoopaId, RoadId, StateError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("koopa {0} does not exist in the current level")]
    MissingKoopa(KoopaId),

    #[error("kiosk for artifact {0} does not exist in the current level")]
    MissingKiosk(ArtifactId),

    #[error("transition {index} of road {road} does not exist")]
    MissingTransition { road: RoadId, index: usize },

    #[error("floor {0} does not exist")]
    MissingFloor(FloorId),

    #[error("the player is not inside a level")]
    NotInLevel,

    #[error("koopa {0} does not hold an artifact")]
    NoArtifact(KoopaId),

    #[error("target hitboxes do not overlap")]
    DisjointHitboxes,

    #[error("koopa {0} can never be reached")]
    TargetUnreachable(KoopaId),

    #[error("expected {expected} targets, got {found}")]
    WrongTargetCount { expected: usize, found: usize },

    #[error("no intercept found for koopas {first} and {second} after every bounce escalation")]
    InterceptUnresolved { first: KoopaId, second: KoopaId },

    #[error("transition {index} of road {road} cannot be reached from the player position")]
    TransitionOutOfReach { road: RoadId, index: usize },

    #[error(transparent)]
    State(#[from] StateError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(inner) => inner.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingKoopa(_) => "ACTION_MISSING_KOOPA",
            Self::MissingKiosk(_) => "ACTION_MISSING_KIOSK",
            Self::MissingTransition { .. } => "ACTION_MISSING_TRANSITION",
            Self::MissingFloor(_) => "ACTION_MISSING_FLOOR",
            Self::NotInLevel => "ACTION_NOT_IN_LEVEL",
            Self::NoArtifact(_) => "ACTION_NO_ARTIFACT",
            Self::DisjointHitboxes => "ACTION_DISJOINT_HITBOXES",
            Self::TargetUnreachable(_) => "ACTION_TARGET_UNREACHABLE",
            Self::WrongTargetCount { .. } => "ACTION_WRONG_TARGET_COUNT",
            Self::InterceptUnresolved { .. } => "ACTION_INTERCEPT_UNRESOLVED",
            Self::TransitionOutOfReach { .. } => "ACTION_TRANSITION_OUT_OF_REACH",
            Self::State(inner) => inner.error_code(),
        }
    }
}
