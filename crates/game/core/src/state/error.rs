//! World construction and lookup errors.

use crate::error::{ErrorSeverity, GameError};
use crate::geometry::Position;
use crate::state::{ArtifactId, FloorId, KOOPA_LEFT_MARGIN, KoopaId, LevelId, LevelKey, RoadId};

/// Errors raised while building or mutating the world model.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("floor {0} does not exist")]
    UnknownFloor(FloorId),

    #[error("level {0} does not exist")]
    UnknownLevel(LevelKey),

    #[error("road {road} does not exist in level {level}")]
    UnknownRoad { level: LevelId, road: RoadId },

    #[error("floor {0} is defined twice")]
    DuplicateFloor(FloorId),

    #[error("level {level} is defined twice on floor {floor}")]
    DuplicateLevel { floor: FloorId, level: LevelId },

    #[error("road at index {index} declares id {found}")]
    RoadIdMismatch { index: usize, found: RoadId },

    #[error("level {level} has {count} roads; the completion code holds at most {max}")]
    TooManyRoads { level: LevelId, count: usize, max: usize },

    #[error(
        "road {road} of level {level} is {length} long; koopas need at least {min}",
        min = KOOPA_LEFT_MARGIN
    )]
    RoadTooShort {
        level: LevelId,
        road: RoadId,
        length: i32,
    },

    #[error(
        "castle road of floor {floor} is {length} long; it needs at least {min}",
        min = KOOPA_LEFT_MARGIN
    )]
    CastleRoadTooShort { floor: FloorId, length: i32 },

    #[error("{pos} lies outside its road of length {length}")]
    PositionOffRoad { pos: Position, length: i32 },

    #[error("castle road of floor {floor} declares id {found}")]
    CastleRoadIdMismatch { floor: FloorId, found: RoadId },

    #[error("transition {index} of road {road} starts on road {source_road}")]
    TransitionSourceMismatch {
        road: RoadId,
        index: usize,
        source_road: RoadId,
    },

    #[error("artifact {0} is out of range")]
    ArtifactOutOfRange(ArtifactId),

    #[error("kiosk for artifact {0} is defined twice")]
    DuplicateKiosk(ArtifactId),

    #[error("artifact {0} is held by more than one koopa")]
    DuplicateArtifactHolder(ArtifactId),

    #[error("koopa {0} is defined twice")]
    DuplicateKoopa(KoopaId),

    #[error("koopa {0} does not exist in the current level")]
    MissingKoopa(KoopaId),

    #[error("kiosk for artifact {0} does not exist in the current level")]
    MissingKiosk(ArtifactId),

    #[error("level {level} has {slots} NPC slots; respawning needs at least {required}")]
    InsufficientSlots {
        level: LevelId,
        slots: usize,
        required: usize,
    },

    #[error("level {level} spreads its NPC slots over {roads} roads; respawning needs {required}")]
    InsufficientSlotRoads {
        level: LevelId,
        roads: usize,
        required: usize,
    },

    #[error("the player is not inside a level")]
    NotInLevel,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            // Bad world descriptions are rejected at load time.
            DuplicateFloor(_)
            | DuplicateLevel { .. }
            | RoadIdMismatch { .. }
            | TooManyRoads { .. }
            | RoadTooShort { .. }
            | CastleRoadTooShort { .. }
            | PositionOffRoad { .. }
            | CastleRoadIdMismatch { .. }
            | TransitionSourceMismatch { .. }
            | ArtifactOutOfRange(_)
            | DuplicateKiosk(_)
            | DuplicateArtifactHolder(_)
            | DuplicateKoopa(_)
            | InsufficientSlots { .. }
            | InsufficientSlotRoads { .. } => ErrorSeverity::Validation,

            // Lookups that fail during search mean the model is inconsistent.
            UnknownFloor(_) | UnknownLevel(_) | UnknownRoad { .. } | MissingKoopa(_)
            | MissingKiosk(_) | NotInLevel => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            UnknownFloor(_) => "STATE_UNKNOWN_FLOOR",
            UnknownLevel(_) => "STATE_UNKNOWN_LEVEL",
            UnknownRoad { .. } => "STATE_UNKNOWN_ROAD",
            DuplicateFloor(_) => "STATE_DUPLICATE_FLOOR",
            DuplicateLevel { .. } => "STATE_DUPLICATE_LEVEL",
            RoadIdMismatch { .. } => "STATE_ROAD_ID_MISMATCH",
            TooManyRoads { .. } => "STATE_TOO_MANY_ROADS",
            RoadTooShort { .. } => "STATE_ROAD_TOO_SHORT",
            CastleRoadTooShort { .. } => "STATE_CASTLE_ROAD_TOO_SHORT",
            PositionOffRoad { .. } => "STATE_POSITION_OFF_ROAD",
            CastleRoadIdMismatch { .. } => "STATE_CASTLE_ROAD_ID_MISMATCH",
            TransitionSourceMismatch { .. } => "STATE_TRANSITION_SOURCE_MISMATCH",
            ArtifactOutOfRange(_) => "STATE_ARTIFACT_OUT_OF_RANGE",
            DuplicateKiosk(_) => "STATE_DUPLICATE_KIOSK",
            DuplicateArtifactHolder(_) => "STATE_DUPLICATE_ARTIFACT_HOLDER",
            DuplicateKoopa(_) => "STATE_DUPLICATE_KOOPA",
            MissingKoopa(_) => "STATE_MISSING_KOOPA",
            MissingKiosk(_) => "STATE_MISSING_KIOSK",
            InsufficientSlots { .. } => "STATE_INSUFFICIENT_SLOTS",
            InsufficientSlotRoads { .. } => "STATE_INSUFFICIENT_SLOT_ROADS",
            NotInLevel => "STATE_NOT_IN_LEVEL",
        }
    }
}
