//! Errors surfaced by the route optimizer.
//!
//! Running out of candidates is never an error; the optimizer reports fewer
//! routes instead. These variants mean the simulation model rejected an
//! action the generator proposed, which is a bug.
use mim_core::{Action, ActionError, ErrorSeverity, GameError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("failed to apply {action}")]
    Apply {
        action: Action,
        #[source]
        source: ActionError,
    },

    #[error("route entered a level but the player is still in the castle")]
    LevelNotEntered,
}

impl RouterError {
    pub fn apply(action: &Action, source: ActionError) -> Self {
        Self::Apply {
            action: action.clone(),
            source,
        }
    }
}

impl GameError for RouterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Apply { source, .. } => source.severity(),
            Self::LevelNotEntered => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Apply { .. } => "ROUTER_APPLY_FAILED",
            Self::LevelNotEntered => "ROUTER_LEVEL_NOT_ENTERED",
        }
    }
}
