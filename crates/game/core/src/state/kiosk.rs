use core::fmt;

use crate::geometry::{Interval, Position};
use crate::state::ArtifactId;

/// Activation zone while facing left, relative to the kiosk base x.
const LEFT_ACTIVATION_RANGE: Interval = Interval::fixed(-54, -7);
/// Activation zone while facing right, relative to the kiosk base x.
const RIGHT_ACTIVATION_RANGE: Interval = Interval::fixed(-101, -55);

/// Checkpoint that accepts one artifact.
///
/// The two activation zones are adjacent, so every x inside their union is
/// active for exactly one facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Kiosk {
    artifact: ArtifactId,
    base: Position,
    left_range: Interval,
    right_range: Interval,
    completed: bool,
}

impl Kiosk {
    pub fn new(artifact: ArtifactId, base: Position) -> Self {
        Self {
            artifact,
            base,
            left_range: LEFT_ACTIVATION_RANGE.with_offset(base.x),
            right_range: RIGHT_ACTIVATION_RANGE.with_offset(base.x),
            completed: false,
        }
    }

    pub const fn artifact(&self) -> ArtifactId {
        self.artifact
    }

    pub const fn base_position(&self) -> Position {
        self.base
    }

    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn is_active_at(&self, pos: &Position) -> bool {
        if !pos.shares_road_with(&self.base) {
            return false;
        }
        if pos.facing_left {
            self.left_range.includes(pos.x)
        } else {
            self.right_range.includes(pos.x)
        }
    }

    /// Closest position to `pos` from which the kiosk can be used.
    ///
    /// Outside both zones the player runs to the nearest edge of their union.
    /// Inside the union but in the zone for the other facing, the player only
    /// turns around. Returns `None` for positions on another road.
    pub fn active_position_nearest_to(&self, pos: &Position) -> Option<Position> {
        if !pos.shares_road_with(&self.base) {
            return None;
        }
        let total = self.left_range.union(&self.right_range);
        let nearest = if total.is_wholly_below(pos.x) {
            Position::new(true, pos.road, total.max())
        } else if total.is_wholly_above(pos.x) {
            Position::new(false, pos.road, total.min())
        } else if self.is_active_at(pos) {
            *pos
        } else {
            pos.with_facing_left(!pos.facing_left)
        };
        Some(nearest)
    }
}

impl fmt::Display for Kiosk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kiosk {}{} @ {}",
            self.artifact,
            if self.completed { " (completed)" } else { "" },
            self.base
        )
    }
}
