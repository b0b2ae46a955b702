use core::fmt;

use crate::config::GameConfig;
use crate::geometry::{Position, Ticks, ticks_to_cover};
use crate::state::{ArtifactId, FloorId, LevelId};

/// The player character.
///
/// Field updates that feed a level's completion code go through
/// [`GameState`](crate::state::GameState) so the code never goes stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    floor: FloorId,
    pos: Position,
    /// `None` while on the castle road.
    level: Option<LevelId>,
    mount: bool,
    current_artifact: ArtifactId,
    /// Earliest time a transition may start after a stomp.
    transition_delay_end: Ticks,
}

impl Player {
    /// A player standing on the castle road of `floor`.
    pub fn new(floor: FloorId, pos: Position) -> Self {
        Self {
            floor,
            pos,
            level: None,
            mount: false,
            current_artifact: ArtifactId(0),
            transition_delay_end: 0,
        }
    }

    #[must_use]
    pub fn in_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_mount(mut self, mount: bool) -> Self {
        self.mount = mount;
        self
    }

    #[must_use]
    pub fn holding(mut self, artifact: ArtifactId) -> Self {
        self.current_artifact = artifact;
        self
    }

    #[must_use]
    pub fn with_transition_delay_end(mut self, end: Ticks) -> Self {
        self.transition_delay_end = end;
        self
    }

    pub const fn floor(&self) -> FloorId {
        self.floor
    }

    pub const fn position(&self) -> Position {
        self.pos
    }

    pub const fn level(&self) -> Option<LevelId> {
        self.level
    }

    pub const fn is_in_castle(&self) -> bool {
        self.level.is_none()
    }

    pub const fn has_mount(&self) -> bool {
        self.mount
    }

    pub const fn current_artifact(&self) -> ArtifactId {
        self.current_artifact
    }

    pub const fn transition_delay_end(&self) -> Ticks {
        self.transition_delay_end
    }

    pub const fn walk_speed(&self) -> i32 {
        GameConfig::WALK_SPEED + self.mount_bonus()
    }

    pub const fn run_speed(&self) -> i32 {
        let base = if self.is_in_castle() {
            GameConfig::CASTLE_RUN_SPEED
        } else {
            GameConfig::LEVEL_RUN_SPEED
        };
        base + self.mount_bonus()
    }

    /// Ticks to run from the current x to `dest`'s x.
    pub fn time_to_reach(&self, dest: &Position) -> Ticks {
        ticks_to_cover(self.pos.x_distance(dest), i64::from(self.run_speed()))
    }

    /// Floor, level, position and mount agree.
    pub fn same_state(&self, other: &Self) -> bool {
        self.floor == other.floor
            && self.level == other.level
            && self.pos == other.pos
            && self.mount == other.mount
    }

    const fn mount_bonus(&self) -> i32 {
        if self.mount {
            GameConfig::MOUNT_SPEED_BONUS
        } else {
            0
        }
    }

    pub(crate) fn set_floor(&mut self, floor: FloorId) {
        self.floor = floor;
    }

    pub(crate) fn set_position(&mut self, pos: Position) {
        self.pos = pos;
    }

    pub(crate) fn set_level(&mut self, level: Option<LevelId>) {
        self.level = level;
    }

    pub(crate) fn set_mount(&mut self, mount: bool) {
        self.mount = mount;
    }

    pub(crate) fn set_current_artifact(&mut self, artifact: ArtifactId) {
        self.current_artifact = artifact;
    }

    /// Extends the transition lockout; never shortens it.
    pub(crate) fn extend_transition_delay(&mut self, end: Ticks) {
        self.transition_delay_end = self.transition_delay_end.max(end);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            None => write!(f, "Player in castle {}", self.floor)?,
            Some(level) => write!(f, "Player in {}-{}", self.floor, level)?,
        }
        write!(f, " @ {} holding {}", self.pos, self.current_artifact)?;
        if self.mount {
            write!(f, " w/Yoshi")?;
        }
        Ok(())
    }
}
