use core::fmt;

use arrayvec::ArrayVec;

use crate::action::intercept::{self, HitPoint};
use crate::action::{ActionError, ActionTransition, MAX_TARGETS, TargetList, current_koopa};
use crate::config::GameConfig;
use crate::geometry::{NEVER, Position, Ticks};
use crate::state::{GameState, Koopa, KoopaId, KoopaStatus};

fn heading(left: bool) -> &'static str {
    if left { "left" } else { "right" }
}

fn gait(running: bool) -> &'static str {
    if running { "running" } else { "walking" }
}

/// Bounce speed after landing a stomp.
fn bounce_speed(state: &GameState, running: bool) -> i32 {
    let player = state.player();
    if running {
        player.run_speed()
    } else {
        player.walk_speed()
    }
}

/// Runs into one koopa, stomps it and bounces off toward `land_left`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StompTarget {
    pub koopa: KoopaId,
    pub running: bool,
    pub land_left: bool,
}

impl StompTarget {
    pub const fn new(koopa: KoopaId, running: bool, land_left: bool) -> Self {
        Self {
            koopa,
            running,
            land_left,
        }
    }

    fn run_time(&self, state: &GameState, koopa: &Koopa) -> Result<Ticks, ActionError> {
        let player = state.player();
        let time = koopa.time_to_hitbox_entry(&player.position(), player.run_speed());
        if time == NEVER {
            return Err(ActionError::TargetUnreachable(self.koopa));
        }
        Ok(time)
    }
}

impl ActionTransition for StompTarget {
    fn is_feasible(&self, state: &GameState) -> bool {
        current_koopa(state, self.koopa).is_ok_and(|koopa| {
            koopa.position().shares_road_with(&state.player().position()) && koopa.is_active()
        })
    }

    fn time_cost(&self, state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let koopa = current_koopa(state, self.koopa)?;
        Ok(self.run_time(state, koopa)? + GameConfig::POST_STOMP_TIME)
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let koopa = *current_koopa(state, self.koopa)?;
        let run_time = self.run_time(state, &koopa)?;

        let toward_left = koopa.position().x < state.player().position().x;
        state.run_player(toward_left, run_time);
        state.advance_npcs(run_time);

        state.move_player(
            bounce_speed(state, self.running),
            self.land_left,
            GameConfig::POST_STOMP_TIME,
        );
        // Stop the koopa before the post-stomp NPC time elapses.
        state
            .current_level_mut()
            .ok_or(ActionError::NotInLevel)?
            .set_koopa_status(self.koopa, KoopaStatus::Stomped)?;
        state.advance_npcs(GameConfig::POST_STOMP_TIME);

        state.extend_transition_delay(elapsed + run_time + koopa.animation_time());
        Ok(run_time + GameConfig::POST_STOMP_TIME)
    }

    fn describe(&self, before: &GameState, _time: Ticks) -> String {
        let Ok(mut koopa) = current_koopa(before, self.koopa).copied() else {
            return self.to_string();
        };
        let Ok(run_time) = self.run_time(before, &koopa) else {
            return self.to_string();
        };
        koopa.advance(run_time);
        format!(
            "Stomp {} at {} while {} and facing {}",
            self.koopa,
            koopa.position(),
            gait(self.running),
            heading(self.land_left)
        )
    }
}

impl fmt::Display for StompTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stomp {} while {} and facing {}",
            self.koopa,
            gait(self.running),
            heading(self.land_left)
        )
    }
}

/// Lands on two koopas at once where their hitboxes overlap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StompMultipleTargets {
    pub koopas: ArrayVec<KoopaId, MAX_TARGETS>,
    pub running: bool,
    pub land_left: bool,
}

impl StompMultipleTargets {
    /// Only pairs can be stomped together.
    pub const TARGET_COUNT: usize = 2;

    pub fn new(koopas: ArrayVec<KoopaId, MAX_TARGETS>, running: bool, land_left: bool) -> Self {
        Self {
            koopas,
            running,
            land_left,
        }
    }

    fn pair(&self, state: &GameState) -> Result<(Koopa, Koopa), ActionError> {
        match self.koopas.as_slice() {
            [first, second] => Ok((
                *current_koopa(state, *first)?,
                *current_koopa(state, *second)?,
            )),
            ids => Err(ActionError::WrongTargetCount {
                expected: Self::TARGET_COUNT,
                found: ids.len(),
            }),
        }
    }

    fn hit_point(
        &self,
        state: &GameState,
        first: &Koopa,
        second: &Koopa,
    ) -> Result<HitPoint, ActionError> {
        let player = state.player();
        intercept::resolve(first, second, player.position().x, player.run_speed()).ok_or(
            ActionError::InterceptUnresolved {
                first: first.id(),
                second: second.id(),
            },
        )
    }
}

impl ActionTransition for StompMultipleTargets {
    fn is_feasible(&self, state: &GameState) -> bool {
        let pos = state.player().position();
        self.pair(state).is_ok_and(|(first, second)| {
            [first, second]
                .iter()
                .all(|k| k.position().shares_road_with(&pos) && k.is_active())
        })
    }

    fn time_cost(&self, state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        let (first, second) = self.pair(state)?;
        Ok(self.hit_point(state, &first, &second)?.t + GameConfig::POST_STOMP_TIME)
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let (first, second) = self.pair(state)?;
        let hit = self.hit_point(state, &first, &second)?;

        let road = state.player().position().road;
        state.set_player_position(Position::new(self.land_left, road, hit.x));
        state.advance_npcs(hit.t);
        state.move_player(
            bounce_speed(state, self.running),
            self.land_left,
            GameConfig::POST_STOMP_TIME,
        );

        let level = state.current_level_mut().ok_or(ActionError::NotInLevel)?;
        level.set_koopa_status(first.id(), KoopaStatus::Stomped)?;
        level.set_koopa_status(second.id(), KoopaStatus::Stomped)?;
        state.advance_npcs(GameConfig::POST_STOMP_TIME);

        // Lockouts do not stack; the longer animation wins.
        let animation = first.animation_time().max(second.animation_time());
        state.extend_transition_delay(elapsed + animation);
        Ok(hit.t + GameConfig::POST_STOMP_TIME)
    }

    fn describe(&self, before: &GameState, _time: Ticks) -> String {
        let Ok((mut first, mut second)) = self.pair(before) else {
            return self.to_string();
        };
        let Ok(hit) = self.hit_point(before, &first, &second) else {
            return self.to_string();
        };
        first.advance(hit.t);
        second.advance(hit.t);
        format!(
            "Stomp ({} at {} & {} at {}) while {} and facing {}",
            first.id(),
            first.position(),
            second.id(),
            second.position(),
            gait(self.running),
            heading(self.land_left)
        )
    }
}

impl fmt::Display for StompMultipleTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stomp {} while {} and facing {}",
            TargetList(&self.koopas),
            gait(self.running),
            heading(self.land_left)
        )
    }
}
