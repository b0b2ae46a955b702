use std::sync::Arc;

use crate::geometry::Position;
use crate::state::{FloorId, KOOPA_LEFT_MARGIN, Level, LevelId, Road, StateError};

/// Immutable parts of a floor.
#[derive(Debug, PartialEq, Eq)]
pub struct FloorLayout {
    id: FloorId,
    start_pos: Position,
    castle_road: Road,
}

/// A group of levels connected through a castle road.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Floor {
    layout: Arc<FloorLayout>,
    /// Ascending by level id.
    levels: Vec<Level>,
}

impl Floor {
    /// Creates a floor without levels.
    ///
    /// `castle_road` must carry [`RoadId::CASTLE`](crate::state::RoadId::CASTLE),
    /// be at least [`KOOPA_LEFT_MARGIN`] long and only list transitions that
    /// start on it. A start on the castle road must lie within it.
    pub fn new(id: FloorId, start_pos: Position, castle_road: Road) -> Result<Self, StateError> {
        if !castle_road.is_castle() {
            return Err(StateError::CastleRoadIdMismatch {
                floor: id,
                found: castle_road.id(),
            });
        }
        let length = castle_road.length();
        if length < KOOPA_LEFT_MARGIN {
            return Err(StateError::CastleRoadTooShort { floor: id, length });
        }
        if start_pos.road.is_castle() && !(0..=length).contains(&start_pos.x) {
            return Err(StateError::PositionOffRoad {
                pos: start_pos,
                length,
            });
        }
        if let Some((index, transition)) = castle_road
            .transitions()
            .iter()
            .enumerate()
            .find(|(_, t)| !t.src().road.is_castle())
        {
            return Err(StateError::TransitionSourceMismatch {
                road: castle_road.id(),
                index,
                source_road: transition.src().road,
            });
        }
        Ok(Self {
            layout: Arc::new(FloorLayout {
                id,
                start_pos,
                castle_road,
            }),
            levels: Vec::new(),
        })
    }

    pub fn with_level(mut self, level: Level) -> Result<Self, StateError> {
        if self.level(level.id()).is_some() {
            return Err(StateError::DuplicateLevel {
                floor: self.id(),
                level: level.id(),
            });
        }
        let at = self.levels.partition_point(|l| l.id() < level.id());
        self.levels.insert(at, level);
        Ok(self)
    }

    pub fn id(&self) -> FloorId {
        self.layout.id
    }

    pub fn start_position(&self) -> Position {
        self.layout.start_pos
    }

    pub fn castle_road(&self) -> &Road {
        &self.layout.castle_road
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|l| l.id() == id)
    }

    pub(crate) fn level_mut(&mut self, id: LevelId) -> Option<&mut Level> {
        self.levels.iter_mut().find(|l| l.id() == id)
    }

    pub fn is_completed(&self) -> bool {
        self.levels.iter().all(Level::is_completed)
    }

    pub fn same_state(&self, other: &Self) -> bool {
        self.levels.len() == other.levels.len()
            && self.levels.iter().all(|level| {
                other
                    .level(level.id())
                    .is_some_and(|theirs| level.same_state(theirs))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RoadId;

    fn castle(x: i32) -> Position {
        Position::new(false, RoadId::CASTLE, x)
    }

    #[test]
    fn construction_checks_castle_road_extent() {
        assert_eq!(
            Floor::new(FloorId(1), castle(5), Road::castle(10, Vec::new())).map(|f| f.id()),
            Err(StateError::CastleRoadTooShort {
                floor: FloorId(1),
                length: 10
            })
        );
        assert_eq!(
            Floor::new(FloorId(1), castle(449), Road::castle(448, Vec::new())).map(|f| f.id()),
            Err(StateError::PositionOffRoad {
                pos: castle(449),
                length: 448
            })
        );
        assert!(Floor::new(FloorId(1), castle(448), Road::castle(448, Vec::new())).is_ok());
    }

    #[test]
    fn levels_stay_sorted_by_id() {
        let level = |id| {
            let road = Road::new(RoadId(0), 1000, Vec::new());
            let start = Position::new(false, RoadId(0), 50);
            Level::new(LevelId(id), start, vec![road], Vec::new(), Vec::new()).expect("level")
        };
        let floor = Floor::new(FloorId(1), castle(100), Road::castle(448, Vec::new()))
            .and_then(|f| f.with_level(level(3)))
            .and_then(|f| f.with_level(level(1)))
            .expect("floor");
        let ids: Vec<_> = floor.levels().iter().map(Level::id).collect();
        assert_eq!(ids, vec![LevelId(1), LevelId(3)]);
        assert_eq!(
            floor.with_level(level(1)).map(|f| f.id()),
            Err(StateError::DuplicateLevel {
                floor: FloorId(1),
                level: LevelId(1)
            })
        );
    }
}
