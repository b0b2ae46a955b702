use core::fmt;

use arrayvec::ArrayVec;

use crate::action::{ActionError, ActionTransition, MAX_TARGETS, TargetList, current_koopa};
use crate::geometry::{Interval, NEVER, Ticks, ticks_to_cover};
use crate::state::{ArtifactId, GameState, Koopa, KoopaId, KoopaStatus};

fn is_collectable(koopa: &Koopa, state: &GameState) -> bool {
    koopa.has_artifact()
        && koopa.status() == KoopaStatus::Stomped
        && koopa.position().shares_road_with(&state.player().position())
}

/// Runs to a stomped koopa and picks up its artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollectArtifact {
    pub koopa: KoopaId,
}

impl CollectArtifact {
    pub const fn new(koopa: KoopaId) -> Self {
        Self { koopa }
    }
}

impl ActionTransition for CollectArtifact {
    fn is_feasible(&self, state: &GameState) -> bool {
        current_koopa(state, self.koopa).is_ok_and(|koopa| is_collectable(koopa, state))
    }

    fn time_cost(&self, state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let player = state.player();
        let time = current_koopa(state, self.koopa)?
            .time_to_hitbox_entry(&player.position(), player.run_speed());
        if time == NEVER {
            return Err(ActionError::TargetUnreachable(self.koopa));
        }
        Ok(time)
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let time = self.time_cost(state, elapsed)?;
        let koopa = *current_koopa(state, self.koopa)?;
        let artifact = koopa.artifact().ok_or(ActionError::NoArtifact(self.koopa))?;

        let toward_left = koopa.position().x < state.player().position().x;
        state.run_player(toward_left, time);
        state
            .current_level_mut()
            .ok_or(ActionError::NotInLevel)?
            .set_koopa_status(self.koopa, KoopaStatus::Carried)?;
        state.set_current_artifact(artifact);
        state.advance_npcs(time);
        Ok(time)
    }

    fn describe(&self, before: &GameState, time: Ticks) -> String {
        let Ok(mut koopa) = current_koopa(before, self.koopa).copied() else {
            return self.to_string();
        };
        koopa.advance(time);
        format!("Pick up artifact from Koopa {} at {}", self.koopa, koopa.position())
    }
}

impl fmt::Display for CollectArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pick up artifact from Koopa {}", self.koopa)
    }
}

/// Picks up several artifacts from a spot inside every koopa's hitbox.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectMultipleArtifacts {
    pub koopas: ArrayVec<KoopaId, MAX_TARGETS>,
}

impl CollectMultipleArtifacts {
    pub fn new(koopas: ArrayVec<KoopaId, MAX_TARGETS>) -> Self {
        Self { koopas }
    }

    fn targets(&self, state: &GameState) -> Result<ArrayVec<Koopa, MAX_TARGETS>, ActionError> {
        self.koopas
            .iter()
            .map(|id| current_koopa(state, *id).copied())
            .collect()
    }

    /// Region where every target's hitbox overlaps.
    fn shared_hitbox(targets: &[Koopa]) -> Option<Interval> {
        let (first, rest) = targets.split_first()?;
        rest.iter()
            .try_fold(first.hitbox(), |shared, koopa| shared.intersection(&koopa.hitbox()))
    }

    fn shared_hitbox_of(&self, state: &GameState) -> Result<Interval, ActionError> {
        let targets = self.targets(state)?;
        Self::shared_hitbox(&targets).ok_or(ActionError::DisjointHitboxes)
    }
}

impl ActionTransition for CollectMultipleArtifacts {
    fn is_feasible(&self, state: &GameState) -> bool {
        self.targets(state).is_ok_and(|targets| {
            targets.iter().all(|koopa| is_collectable(koopa, state))
                && Self::shared_hitbox(&targets).is_some()
        })
    }

    fn time_cost(&self, state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let hitbox = self.shared_hitbox_of(state)?;
        let player = state.player();
        let x = player.position().x;
        if hitbox.includes(x) {
            return Ok(0);
        }
        let entry = if x > hitbox.max() { hitbox.max() } else { hitbox.min() };
        Ok(ticks_to_cover(
            (i64::from(x) - i64::from(entry)).abs(),
            i64::from(player.run_speed()),
        ))
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let time = self.time_cost(state, elapsed)?;
        let hitbox = self.shared_hitbox_of(state)?;

        let toward_left = hitbox.max() < state.player().position().x;
        state.run_player(toward_left, time);

        let level = state.current_level_mut().ok_or(ActionError::NotInLevel)?;
        let mut held = ArtifactId(0);
        for id in &self.koopas {
            level.set_koopa_status(*id, KoopaStatus::Carried)?;
            if let Some(artifact) = level.koopa(*id).and_then(Koopa::artifact) {
                held = held.max(artifact);
            }
        }
        state.set_current_artifact(held);
        state.advance_npcs(time);
        Ok(time)
    }

    fn describe(&self, before: &GameState, time: Ticks) -> String {
        let Ok(targets) = self.targets(before) else {
            return self.to_string();
        };
        let spots: Vec<String> = targets
            .into_iter()
            .map(|mut koopa| {
                koopa.advance(time);
                let artifact = koopa.artifact().map_or(String::from("?"), |a| a.to_string());
                format!("{artifact} at {}", koopa.position())
            })
            .collect();
        format!("Pick up artifacts from ({})", spots.join(" & "))
    }
}

impl fmt::Display for CollectMultipleArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pick up artifact from Koopas {}", TargetList(&self.koopas))
    }
}
