use core::fmt;

use crate::action::{ActionError, ActionTransition};
use crate::geometry::Ticks;
use crate::state::{GameState, RoadId, Transition, TransitionKind};

/// Runs to a transition on the current road and takes it.
///
/// On the castle road `road` is [`RoadId::CASTLE`] and indexes the floor's
/// castle road transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TakeTransition {
    pub road: RoadId,
    pub index: usize,
}

impl TakeTransition {
    pub const fn new(road: RoadId, index: usize) -> Self {
        Self { road, index }
    }

    /// Resolves the transition against the player's current level or hub.
    pub fn transition<'a>(&self, state: &'a GameState) -> Option<&'a Transition> {
        let road = match state.current_level() {
            Some(level) => level.road(self.road)?,
            None => state.current_floor()?.castle_road(),
        };
        road.transition(self.index)
    }

    /// True when the transition starts on the castle road.
    pub const fn is_from_castle(&self) -> bool {
        self.road.is_castle()
    }

    fn require<'a>(&self, state: &'a GameState) -> Result<&'a Transition, ActionError> {
        self.transition(state).ok_or(ActionError::MissingTransition {
            road: self.road,
            index: self.index,
        })
    }

    fn out_of_reach(&self) -> ActionError {
        ActionError::TransitionOutOfReach {
            road: self.road,
            index: self.index,
        }
    }

    /// Ticks to run into the transition's active zone.
    pub fn time_to_reach(&self, state: &GameState) -> Result<Ticks, ActionError> {
        let player = state.player();
        let target = self
            .require(state)?
            .active_position_nearest_to(&player.position())
            .ok_or_else(|| self.out_of_reach())?;
        Ok(player.time_to_reach(&target))
    }

    /// Time spent before the transition starts: the run, or the rest of the
    /// stomp lockout if that is longer.
    fn pre_transition_time(&self, state: &GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let lockout = state.player().transition_delay_end() - elapsed;
        Ok(self.time_to_reach(state)?.max(lockout))
    }
}

impl ActionTransition for TakeTransition {
    fn is_feasible(&self, state: &GameState) -> bool {
        let Some(transition) = self.transition(state) else {
            return false;
        };
        let player = state.player();
        let pos = player.position();
        if transition.src().road != pos.road {
            return false;
        }

        match transition.kind() {
            // Leaving without the mount only works from the arrival spot.
            TransitionKind::Exit => player.has_mount() || transition.is_active_at(&pos),
            TransitionKind::Entrance { level, .. } => match state.current_floor() {
                Some(floor) if level.is_floor_exit() => floor.is_completed(),
                Some(floor) => floor.level(level).is_some_and(|l| !l.is_completed()),
                None => false,
            },
            TransitionKind::Pipe | TransitionKind::Crossing { .. } => true,
        }
    }

    fn time_cost(&self, state: &GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let total = self.require(state)?.total_time();
        Ok(self.pre_transition_time(state, elapsed)? + total)
    }

    fn apply(&self, state: &mut GameState, elapsed: Ticks) -> Result<Ticks, ActionError> {
        let transition = *self.require(state)?;
        let reach = self.time_to_reach(state)?;
        let pre = self.pre_transition_time(state, elapsed)?;
        let toward_left = transition.src().is_left_of(&state.player().position());

        match transition.kind() {
            TransitionKind::Entrance { level, .. } if level.is_floor_exit() => {
                let next = state.player().floor().next();
                let start = state
                    .floor(next)
                    .ok_or(ActionError::MissingFloor(next))?
                    .start_position();
                state.set_player_floor(next);
                state.set_player_level(None);
                state.set_player_position(start);
            }
            TransitionKind::Entrance { level, .. } => {
                let after_run = state.run_player(toward_left, reach);
                let arrival = transition.take(&after_run).ok_or_else(|| self.out_of_reach())?;
                state.set_player_level(Some(level));
                state.respawn_current_level()?;
                // The walk to the door does not count toward NPC time.
                state.advance_npcs(transition.npc_time());
                state.set_player_position(arrival);
            }
            TransitionKind::Exit => {
                let after_run = state.run_player(toward_left, reach);
                let arrival = transition.take(&after_run).ok_or_else(|| self.out_of_reach())?;
                let level = state.current_level_mut().ok_or(ActionError::NotInLevel)?;
                let completed = level.all_artifacts_returned();
                level.set_completed(completed);
                state.set_player_level(None);
                state.set_mount(false);
                state.set_player_position(arrival);
            }
            TransitionKind::Pipe | TransitionKind::Crossing { .. } => {
                let after_run = state.run_player(toward_left, reach);
                let arrival = transition.take(&after_run).ok_or_else(|| self.out_of_reach())?;
                state.advance_npcs(pre + transition.npc_time());
                state.set_player_position(arrival);
            }
        }
        Ok(pre + transition.total_time())
    }

    fn describe(&self, before: &GameState, time: Ticks) -> String {
        let (Some(transition), Ok(reach)) = (self.transition(before), self.time_to_reach(before))
        else {
            return self.to_string();
        };
        let extra = time - (transition.total_time() + reach);
        if extra > 0 {
            format!("Wait {extra} and take {transition}")
        } else {
            format!("Take {transition}")
        }
    }
}

impl fmt::Display for TakeTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Take transition {} in road {}", self.index, self.road)
    }
}
