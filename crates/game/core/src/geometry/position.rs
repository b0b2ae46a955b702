use core::fmt;

use crate::state::RoadId;

/// Where something stands: facing, road, and x offset along that road.
///
/// Positions are immutable values; every derived operation returns a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub facing_left: bool,
    pub road: RoadId,
    pub x: i32,
}

impl Position {
    pub const fn new(facing_left: bool, road: RoadId, x: i32) -> Self {
        Self {
            facing_left,
            road,
            x,
        }
    }

    #[must_use]
    pub const fn with_facing_left(self, facing_left: bool) -> Self {
        Self {
            facing_left,
            ..self
        }
    }

    #[must_use]
    pub const fn with_x(self, x: i32) -> Self {
        Self { x, ..self }
    }

    #[must_use]
    pub const fn plus_x(self, offset: i32) -> Self {
        Self {
            x: self.x + offset,
            ..self
        }
    }

    pub fn shares_road_with(&self, other: &Self) -> bool {
        self.road == other.road
    }

    /// True when this position is strictly left of `other`.
    pub const fn is_left_of(&self, other: &Self) -> bool {
        self.x < other.x
    }

    pub const fn x_distance(&self, other: &Self) -> i64 {
        (self.x as i64 - other.x as i64).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(#{}, {} ({}))",
            self.road,
            self.x,
            if self.facing_left { "left" } else { "right" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_positions_leave_the_original_untouched() {
        let pos = Position::new(false, RoadId(2), 100);
        let moved = pos.plus_x(-30).with_facing_left(true);
        assert_eq!(pos, Position::new(false, RoadId(2), 100));
        assert_eq!(moved, Position::new(true, RoadId(2), 70));
        assert_eq!(moved.x_distance(&pos), 30);
        assert!(moved.is_left_of(&pos));
        assert!(!pos.is_left_of(&pos));
    }

    #[test]
    fn display_names_road_and_facing() {
        let pos = Position::new(true, RoadId::CASTLE, 220);
        assert_eq!(pos.to_string(), "(#1234, 220 (left))");
    }
}
