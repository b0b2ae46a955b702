//! World model: floors, levels, roads and the player.
//!
//! Immutable geometry (roads, transitions, NPC slots) lives in `Arc`-shared
//! layouts, so cloning a [`GameState`] copies only the koopas, kiosks,
//! completion codes, player and RNG. Entities refer to each other by id; there
//! are no back references to rewrite after a clone.
mod completion;
mod error;
mod floor;
mod ids;
mod kiosk;
mod koopa;
mod level;
mod player;
mod road;
mod transition;

pub use completion::CompletionCode;
pub use error::StateError;
pub use floor::{Floor, FloorLayout};
pub use ids::{ArtifactId, FloorId, KoopaId, LevelId, LevelKey, RoadId};
pub use kiosk::Kiosk;
pub use koopa::{KOOPA_HITBOX, KOOPA_LEFT_MARGIN, Koopa, KoopaStatus};
pub use level::{Level, LevelLayout, MAX_LEVEL_ROADS};
pub use player::Player;
pub use road::{Road, TransitionRef};
pub use transition::{Transition, TransitionKind};

use crate::config::GameConfig;
use crate::geometry::{Position, Ticks};
use crate::rng::SlotRng;

/// Complete mutable snapshot of a game in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Ascending by floor id.
    floors: Vec<Floor>,
    player: Player,
    rng: SlotRng,
}

impl GameState {
    /// Assembles a world and synchronizes the player's level flags.
    ///
    /// The player must stand on an existing floor, and inside an existing
    /// level when bound to one.
    pub fn new(floors: Vec<Floor>, player: Player, rng: SlotRng) -> Result<Self, StateError> {
        let mut floors = floors;
        floors.sort_by_key(Floor::id);
        if let Some(pair) = floors.windows(2).find(|pair| pair[0].id() == pair[1].id()) {
            return Err(StateError::DuplicateFloor(pair[0].id()));
        }

        let mut state = Self {
            floors,
            player,
            rng,
        };
        let floor = state
            .floor(state.player.floor())
            .ok_or(StateError::UnknownFloor(state.player.floor()))?;
        if let Some(level) = state.player.level() {
            let key = LevelKey::new(floor.id(), level);
            if floor.level(level).is_none() {
                return Err(StateError::UnknownLevel(key));
            }
            let player = state.player.clone();
            state.set_player_position(player.position());
            state.set_mount(player.has_mount());
            state.set_current_artifact(player.current_artifact());
        }
        Ok(state)
    }

    /// Builds a world with the RNG seeded from `config`.
    pub fn with_config(
        floors: Vec<Floor>,
        player: Player,
        config: &GameConfig,
    ) -> Result<Self, StateError> {
        Self::new(floors, player, SlotRng::with_seed(config.rng_low, config.rng_high))
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id() == id)
    }

    pub fn level(&self, key: LevelKey) -> Option<&Level> {
        self.floor(key.floor).and_then(|f| f.level(key.level))
    }

    pub const fn player(&self) -> &Player {
        &self.player
    }

    pub const fn rng(&self) -> &SlotRng {
        &self.rng
    }

    pub fn current_floor(&self) -> Option<&Floor> {
        self.floor(self.player.floor())
    }

    /// Level the player is in; `None` on the castle road.
    pub fn current_level(&self) -> Option<&Level> {
        let level = self.player.level()?;
        self.current_floor()?.level(level)
    }

    pub fn current_level_key(&self) -> Option<LevelKey> {
        self.player
            .level()
            .map(|level| LevelKey::new(self.player.floor(), level))
    }

    /// Road the player stands on: a level road, or the floor's castle road.
    pub fn current_road(&self) -> Option<&Road> {
        match self.current_level() {
            Some(level) => level.road(self.player.position().road),
            None if self.player.is_in_castle() => {
                self.current_floor().map(Floor::castle_road)
            }
            None => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.floors.iter().all(Floor::is_completed)
    }

    /// Keys of every completed level, in floor then insertion order.
    pub fn completed_levels(&self) -> impl Iterator<Item = LevelKey> + '_ {
        self.floors.iter().flat_map(|floor| {
            floor
                .levels()
                .iter()
                .filter(|level| level.is_completed())
                .map(move |level| LevelKey::new(floor.id(), level.id()))
        })
    }

    pub fn levels_completed(&self) -> usize {
        self.completed_levels().count()
    }

    /// Structural equality of everything that can change during play.
    pub fn same_state(&self, other: &Self) -> bool {
        self.rng == other.rng
            && self.player.same_state(&other.player)
            && self.floors.len() == other.floors.len()
            && self
                .floors
                .iter()
                .zip(&other.floors)
                .all(|(a, b)| a.id() == b.id() && a.same_state(b))
    }

    pub(crate) fn floor_mut(&mut self, id: FloorId) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.id() == id)
    }

    pub(crate) fn current_level_mut(&mut self) -> Option<&mut Level> {
        let level = self.player.level()?;
        self.floor_mut(self.player.floor())?.level_mut(level)
    }

    /// Moves the player for `time` ticks at `speed` without changing facing.
    ///
    /// Inside a level the player is kept a fixed margin away from both road
    /// ends.
    pub(crate) fn move_player(&mut self, speed: i32, left: bool, time: Ticks) -> Position {
        let velocity = i64::from(speed) * if left { -1 } else { 1 };
        let mut pos = self.player.position();
        let x = i64::from(pos.x).saturating_add(velocity.saturating_mul(time));
        pos.x = i32::try_from(x).unwrap_or(if x < 0 { i32::MIN } else { i32::MAX });

        if !self.player.is_in_castle()
            && let Some(road) = self.current_road()
        {
            let margin = GameConfig::PLAYER_EDGE_MARGIN;
            let right_bound = road.length() - margin;
            if pos.x < margin {
                pos.x = margin;
            } else if pos.x > right_bound {
                pos.x = right_bound;
            }
        }
        self.player.set_position(pos);
        pos
    }

    pub(crate) fn run_player(&mut self, left: bool, time: Ticks) -> Position {
        self.move_player(self.player.run_speed(), left, time)
    }

    /// Places the player and records the road in the level's completion code.
    pub(crate) fn set_player_position(&mut self, pos: Position) {
        self.player.set_position(pos);
        if !pos.road.is_castle()
            && let Some(level) = self.current_level_mut()
        {
            level.code_mut().set_player_road(pos.road);
        }
    }

    pub(crate) fn set_player_level(&mut self, level: Option<LevelId>) {
        self.player.set_level(level);
    }

    pub(crate) fn set_player_floor(&mut self, floor: FloorId) {
        self.player.set_floor(floor);
    }

    pub(crate) fn set_mount(&mut self, mount: bool) {
        self.player.set_mount(mount);
        if let Some(level) = self.current_level_mut() {
            level.code_mut().set_mount(mount);
        }
    }

    pub(crate) fn set_current_artifact(&mut self, artifact: ArtifactId) {
        self.player.set_current_artifact(artifact);
        if let Some(level) = self.current_level_mut() {
            level.code_mut().set_held_artifact(artifact);
        }
    }

    pub(crate) fn extend_transition_delay(&mut self, end: Ticks) {
        self.player.extend_transition_delay(end);
    }

    /// Respawns the current level, consuming draws from the shared RNG.
    pub(crate) fn respawn_current_level(&mut self) -> Result<(), StateError> {
        let floor_id = self.player.floor();
        let level_id = self.player.level().ok_or(StateError::NotInLevel)?;
        let Self { floors, rng, .. } = self;
        let level = floors
            .iter_mut()
            .find(|f| f.id() == floor_id)
            .and_then(|f| f.level_mut(level_id))
            .ok_or(StateError::UnknownLevel(LevelKey::new(floor_id, level_id)))?;
        level.respawn(rng)
    }

    /// Advances every koopa in the current level. No-op on the castle road.
    pub(crate) fn advance_npcs(&mut self, time: Ticks) {
        if let Some(level) = self.current_level_mut() {
            level.advance_npcs(time);
        }
    }
}
