use core::fmt;

use crate::action::{ActionError, ActionTransition};
use crate::config::GameConfig;
use crate::geometry::Ticks;
use crate::state::{GameState, Road};

/// Picks up the mount, which speeds up both walking and running.
///
/// NPCs are frozen while it happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AcquireMount;

impl ActionTransition for AcquireMount {
    fn is_feasible(&self, state: &GameState) -> bool {
        !state.player().has_mount() && state.current_road().is_some_and(Road::is_mount_available)
    }

    fn time_cost(&self, _state: &GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        Ok(GameConfig::MOUNT_TIME)
    }

    fn apply(&self, state: &mut GameState, _elapsed: Ticks) -> Result<Ticks, ActionError> {
        state.set_mount(true);
        Ok(GameConfig::MOUNT_TIME)
    }

    fn describe(&self, before: &GameState, _time: Ticks) -> String {
        format!("Get Yoshi at {}", before.player().position())
    }
}

impl fmt::Display for AcquireMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Get Yoshi")
    }
}
