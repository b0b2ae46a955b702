use crate::geometry::Ticks;
use crate::state::FloorId;

/// Game timing constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Initial low register of the NPC slot generator.
    pub rng_low: u16,
    /// Initial high register of the NPC slot generator.
    pub rng_high: u16,
}

impl GameConfig {
    // ===== transition timings =====
    /// Time the game spends loading a road after any transition.
    pub const ROAD_LOAD_TIME: Ticks = 34;
    pub const PIPE_NPC_TIME: Ticks = 80;
    pub const PIPE_TOTAL_TIME: Ticks = Self::PIPE_NPC_TIME + Self::ROAD_LOAD_TIME;
    pub const CROSSING_UP_NPC_TIME: Ticks = 168;
    pub const CROSSING_UP_TOTAL_TIME: Ticks = Self::CROSSING_UP_NPC_TIME + Self::ROAD_LOAD_TIME;
    pub const CROSSING_DOWN_NPC_TIME: Ticks = 185;
    pub const CROSSING_DOWN_TOTAL_TIME: Ticks =
        Self::CROSSING_DOWN_NPC_TIME + Self::ROAD_LOAD_TIME;
    pub const ENTRANCE_NPC_TIME: Ticks = 80;
    pub const EXIT_NPC_TIME: Ticks = 0;
    pub const EXIT_TOTAL_TIME: Ticks = 370;

    // ===== action timings =====
    pub const POST_STOMP_TIME: Ticks = 40;
    pub const MOUNT_TIME: Ticks = 600;
    pub const EASY_ANSWER_TIME: Ticks = 90;
    pub const HARD_ANSWER_TIME: Ticks = 120;
    pub const ARTIFACT_SWITCH_TIME: Ticks = 160;
    /// Highest floor whose kiosks ask the easy questions.
    pub const LAST_EASY_FLOOR: u16 = 1;

    // ===== player motion =====
    pub const LEVEL_RUN_SPEED: i32 = 3;
    pub const CASTLE_RUN_SPEED: i32 = 2;
    pub const WALK_SPEED: i32 = 1;
    pub const MOUNT_SPEED_BONUS: i32 = 1;
    /// Minimum gap the game keeps between the player and either road edge.
    pub const PLAYER_EDGE_MARGIN: i32 = 18;

    // ===== level spawning =====
    pub const NUM_NPCS: usize = 5;
    pub const NUM_USELESS_KOOPAS: usize = 13;
    pub const NUM_ARTIFACTS: usize = 3;
    /// Stomp animation time of each artifact holder, indexed by artifact.
    pub const ANIMATION_TIMES: [Ticks; Self::NUM_ARTIFACTS] = [80, 48, 152];
    pub const MIN_NPC_SLOTS: usize = Self::NUM_NPCS + Self::NUM_USELESS_KOOPAS + Self::NUM_ARTIFACTS;
    pub const DEFAULT_CASTLE_ROAD_LENGTH: i32 = 448;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RNG_LOW: u16 = 4506;
    pub const DEFAULT_RNG_HIGH: u16 = 3716;

    pub fn new() -> Self {
        Self {
            rng_low: Self::DEFAULT_RNG_LOW,
            rng_high: Self::DEFAULT_RNG_HIGH,
        }
    }

    pub fn with_rng_seed(rng_low: u16, rng_high: u16) -> Self {
        Self { rng_low, rng_high }
    }

    /// Kiosk question time on the given floor.
    pub const fn answer_time(floor: FloorId) -> Ticks {
        if floor.0 <= Self::LAST_EASY_FLOOR {
            Self::EASY_ANSWER_TIME
        } else {
            Self::HARD_ANSWER_TIME
        }
    }

    /// Cheapest transition between two roads of a level.
    pub const fn min_transition_time() -> Ticks {
        let mut min = Self::PIPE_TOTAL_TIME;
        if Self::CROSSING_DOWN_TOTAL_TIME < min {
            min = Self::CROSSING_DOWN_TOTAL_TIME;
        }
        if Self::CROSSING_UP_TOTAL_TIME < min {
            min = Self::CROSSING_UP_TOTAL_TIME;
        }
        min
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_timings_match_reference_values() {
        assert_eq!(GameConfig::PIPE_TOTAL_TIME, 114);
        assert_eq!(GameConfig::CROSSING_UP_TOTAL_TIME, 202);
        assert_eq!(GameConfig::CROSSING_DOWN_TOTAL_TIME, 219);
        assert_eq!(GameConfig::min_transition_time(), 114);
        assert_eq!(GameConfig::MIN_NPC_SLOTS, 21);
    }

    #[test]
    fn answer_time_depends_on_floor() {
        assert_eq!(GameConfig::answer_time(FloorId(1)), 90);
        assert_eq!(GameConfig::answer_time(FloorId(2)), 120);
    }
}
