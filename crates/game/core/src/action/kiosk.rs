use core::fmt;

use crate::action::{ActionError, ActionTransition, current_level};
use crate::config::GameConfig;
use crate::geometry::{Position, Ticks};
use crate::state::{ArtifactId, GameState, Kiosk, KoopaStatus, Level};

/// Runs to a kiosk and hands in the matching artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReturnArtifact {
    pub artifact: ArtifactId,
}

impl ReturnArtifact {
    pub const fn new(artifact: ArtifactId) -> Self {
        Self { artifact }
    }

    fn kiosk<'a>(&self, state: &'a GameState) -> Result<&'a Kiosk, ActionError> {
        current_level(state)?
            .kiosk(self.artifact)
            .ok_or(ActionError::MissingKiosk(self.artifact))
    }

    fn target(&self, state: &GameState) -> Result<Position, ActionError> {
        self.kiosk(state)?
            .active_position_nearest_to(&state.player().position())
            .ok_or(ActionError::MissingKiosk(self.artifact))
    }

    /// Penalty for swapping to this artifact before answering.
    fn switch_time(&self, state: &GameState) -> Ticks {
        if state.player().current_artifact() == self.artifact {
            0
        } else {
            GameConfig::ARTIFACT_SWITCH_TIME
        }
    }

    /// Lowest carried artifact whose kiosk is still open, or artifact 0.
    fn first_held_artifact(level: &Level) -> ArtifactId {
        level
            .artifact_holders()
            .filter(|koopa| koopa.status() == KoopaStatus::Carried)
            .filter_map(|koopa| koopa.artifact())
            .filter(|artifact| !level.is_artifact_returned(*artifact))
            .min()
            .unwrap_or_default()
    }
}

impl ActionTransition for ReturnArtifact {
    fn is_feasible(&self, state: &GameState) -> bool {
        let Ok(level) = current_level(state) else {
            return false;
        };
        let Some(kiosk) = level.kiosk(self.artifact) else {
            return false;
        };
        kiosk.base_position().shares_road_with(&state.player().position())
            && !kiosk.is_completed()
            && level.is_artifact_collected(self.artifact)
    }

    fn time_cost(&self, state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let player = state.player();
        let run_time = player.time_to_reach(&self.target(state)?);
        Ok(run_time + GameConfig::answer_time(player.floor()) + self.switch_time(state))
    }

    fn apply(&self, state: &mut GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let target = self.target(state)?;
        let run_time = state.player().time_to_reach(&target);
        let toward_left = target.x < state.player().position().x;
        state.run_player(toward_left, run_time);

        let level = state.current_level_mut().ok_or(ActionError::NotInLevel)?;
        level.set_kiosk_completed(self.artifact, true)?;
        let next_held = Self::first_held_artifact(level);
        let switch_time = self.switch_time(state);
        state.set_current_artifact(next_held);

        let npc_time = run_time + GameConfig::answer_time(state.player().floor());
        state.advance_npcs(npc_time);
        Ok(npc_time + switch_time)
    }

    fn describe(&self, before: &GameState, _time: Ticks) -> String {
        let Ok(kiosk) = self.kiosk(before) else {
            return self.to_string();
        };
        let held = before.player().current_artifact();
        format!(
            "Return artifact {} (previously holding {}{}); kiosk at {}",
            self.artifact,
            held,
            if held == self.artifact { "" } else { "!!!!!" },
            kiosk.base_position()
        )
    }
}

impl fmt::Display for ReturnArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Return artifact {}", self.artifact)
    }
}
