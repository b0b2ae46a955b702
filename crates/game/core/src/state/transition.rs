//! Typed links between roads.

use core::fmt;

use crate::config::GameConfig;
use crate::geometry::{Interval, Position, Ticks};
use crate::state::LevelId;

/// Entry zone of pipes, entrances and exits, relative to the source x.
const DOOR_ENTRY_RANGE: Interval = Interval::fixed(-3, 3);
/// Entry zone of a crossing on the left side of the street.
const LEFT_CROSSING_ENTRY_RANGE: Interval = Interval::fixed(0, 14);
/// Entry zone of a crossing on the right side of the street.
const RIGHT_CROSSING_ENTRY_RANGE: Interval = Interval::fixed(-14, 0);

/// The four kinds of transition and their kind-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionKind {
    /// Pipe between two roads of the same level. Preserves facing.
    Pipe,
    /// Street crossing. Arrival facing is forced to match `left`.
    Crossing { left: bool, up: bool },
    /// Door from the castle road into a level, or to the next floor when
    /// `level` is [`LevelId::FLOOR_EXIT`]. Arrival always faces right.
    Entrance { level: LevelId, load_time: Ticks },
    /// Level exit leading back to the castle road. Preserves facing.
    Exit,
}

/// A link from a position on one road to a position on another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    src: Position,
    dest: Position,
    kind: TransitionKind,
    active_range: Interval,
}

impl Transition {
    pub fn new(src: Position, dest: Position, kind: TransitionKind) -> Self {
        let entry_range = match kind {
            TransitionKind::Crossing { left: true, .. } => LEFT_CROSSING_ENTRY_RANGE,
            TransitionKind::Crossing { left: false, .. } => RIGHT_CROSSING_ENTRY_RANGE,
            TransitionKind::Pipe | TransitionKind::Entrance { .. } | TransitionKind::Exit => {
                DOOR_ENTRY_RANGE
            }
        };
        Self {
            src,
            dest,
            kind,
            active_range: entry_range.with_offset(src.x),
        }
    }

    pub fn pipe(src: Position, dest: Position) -> Self {
        Self::new(src, dest, TransitionKind::Pipe)
    }

    pub fn crossing(src: Position, dest: Position, left: bool, up: bool) -> Self {
        Self::new(src, dest, TransitionKind::Crossing { left, up })
    }

    pub fn entrance(src: Position, dest: Position, level: LevelId, load_time: Ticks) -> Self {
        Self::new(src, dest, TransitionKind::Entrance { level, load_time })
    }

    /// Exit whose destination is a position on the castle road.
    pub fn exit(src: Position, castle_pos: Position) -> Self {
        Self::new(src, castle_pos, TransitionKind::Exit)
    }

    pub const fn src(&self) -> Position {
        self.src
    }

    pub const fn dest(&self) -> Position {
        self.dest
    }

    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Absolute x range on the source road where the transition can be taken.
    pub const fn active_range(&self) -> Interval {
        self.active_range
    }

    /// Level entered by this transition, if it is a level entrance.
    pub fn entered_level(&self) -> Option<LevelId> {
        match self.kind {
            TransitionKind::Entrance { level, .. } if !level.is_floor_exit() => Some(level),
            _ => None,
        }
    }

    pub fn is_floor_exit(&self) -> bool {
        matches!(self.kind, TransitionKind::Entrance { level, .. } if level.is_floor_exit())
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.kind, TransitionKind::Exit)
    }

    pub fn is_active_at(&self, pos: &Position) -> bool {
        self.src.shares_road_with(pos) && self.active_range.includes(pos.x)
    }

    /// Closest position to `pos` from which the transition can be taken.
    ///
    /// The player turns to face the zone when outside it. Returns `None` when
    /// `pos` is on another road.
    pub fn active_position_nearest_to(&self, pos: &Position) -> Option<Position> {
        if !self.src.shares_road_with(pos) {
            return None;
        }
        let range = self.active_range;
        let nearest = if range.is_wholly_below(pos.x) {
            Position::new(true, pos.road, range.max())
        } else if range.is_wholly_above(pos.x) {
            Position::new(false, pos.road, range.min())
        } else {
            *pos
        };
        Some(nearest)
    }

    /// Ticks during which NPCs keep moving while the transition plays out.
    pub const fn npc_time(&self) -> Ticks {
        match self.kind {
            TransitionKind::Pipe => GameConfig::PIPE_NPC_TIME,
            TransitionKind::Crossing { up: true, .. } => GameConfig::CROSSING_UP_NPC_TIME,
            TransitionKind::Crossing { up: false, .. } => GameConfig::CROSSING_DOWN_NPC_TIME,
            TransitionKind::Entrance { .. } => GameConfig::ENTRANCE_NPC_TIME,
            TransitionKind::Exit => GameConfig::EXIT_NPC_TIME,
        }
    }

    /// Ticks from starting the transition until the player can act again.
    pub const fn total_time(&self) -> Ticks {
        match self.kind {
            TransitionKind::Pipe => GameConfig::PIPE_TOTAL_TIME,
            TransitionKind::Crossing { up: true, .. } => GameConfig::CROSSING_UP_TOTAL_TIME,
            TransitionKind::Crossing { up: false, .. } => GameConfig::CROSSING_DOWN_TOTAL_TIME,
            TransitionKind::Entrance { load_time, .. } => GameConfig::ENTRANCE_NPC_TIME + load_time,
            TransitionKind::Exit => GameConfig::EXIT_TOTAL_TIME,
        }
    }

    /// Arrival position after taking the transition from `pos`.
    ///
    /// Crossings only fire from inside their zone and return `None` otherwise.
    pub fn take(&self, pos: &Position) -> Option<Position> {
        match self.kind {
            TransitionKind::Pipe | TransitionKind::Exit => {
                Some(self.dest.with_facing_left(pos.facing_left))
            }
            TransitionKind::Entrance { .. } => Some(self.dest.with_facing_left(false)),
            TransitionKind::Crossing { left, .. } => self
                .is_active_at(pos)
                .then(|| self.dest.with_facing_left(left)),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransitionKind::Pipe => write!(f, "Pipe ({} -> {})", self.src, self.dest),
            TransitionKind::Crossing { left, up } => write!(
                f,
                "{} {} crossing ({} -> {})",
                if left { "Left" } else { "Right" },
                if up { "up" } else { "down" },
                self.src,
                self.dest
            ),
            TransitionKind::Entrance { level, .. } if level.is_floor_exit() => {
                write!(f, "Entrance ({} --> Next Floor)", self.src)
            }
            TransitionKind::Entrance { level, .. } => {
                write!(f, "Entrance ({} --> {})", self.src, level)
            }
            TransitionKind::Exit => write!(f, "Exit ({})", self.src),
        }
    }
}
