//! World scenario loader.
//!
//! A scenario is the routing start point: every floor with its castle road and
//! levels, and where the player stands. Road ids are implied by their index in
//! a level, and transitions start on the road that lists them.
//!
//! ```ron
//! (
//!     rng: Some((4506, 3716)),
//!     floors: [(
//!         id: 1,
//!         start: (road: 1234, x: 100),
//!         castle: [(from: 100, to: (road: 0, x: 50), kind: Entrance(level: 1, load_time: 34))],
//!         levels: [(
//!             id: 1,
//!             start: (road: 0, x: 50),
//!             roads: [(length: 1200, transitions: [(from: 1100, to: (road: 1234, x: 100), kind: Exit)])],
//!             npc_slots: [(road: 0, x: 100)],
//!             kiosks: [(artifact: 0, at: (road: 0, x: 700))],
//!         )],
//!     )],
//!     player: (floor: 1, at: (road: 1234, x: 100)),
//! )
//! ```

use std::path::Path;

use mim_core::{
    ArtifactId, Floor, FloorId, GameConfig, GameState, Kiosk, Koopa, KoopaId, KoopaStatus, Level,
    LevelId, Player, Position, Road, RoadId, SlotRng, StateError, Ticks, Transition,
    TransitionKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Whole scenario as written in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorldRon {
    /// `(low, high)` generator registers; the config seed when absent.
    #[serde(default)]
    rng: Option<(u16, u16)>,
    floors: Vec<FloorRon>,
    player: PlayerRon,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PointRon {
    road: u16,
    x: i32,
    #[serde(default)]
    left: bool,
}

impl PointRon {
    fn position(self) -> Position {
        Position::new(self.left, RoadId(self.road), self.x)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FloorRon {
    id: u16,
    start: PointRon,
    #[serde(default = "default_castle_length")]
    castle_length: i32,
    #[serde(default)]
    castle: Vec<TransitionRon>,
    #[serde(default)]
    levels: Vec<LevelRon>,
}

fn default_castle_length() -> i32 {
    GameConfig::DEFAULT_CASTLE_ROAD_LENGTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransitionRon {
    /// Source x on the listing road.
    from: i32,
    to: PointRon,
    kind: TransitionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoadRon {
    length: i32,
    #[serde(default)]
    transitions: Vec<TransitionRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct KioskRon {
    artifact: u8,
    at: PointRon,
}

/// Koopa already on the field, for scenarios that start inside a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KoopaRon {
    id: u16,
    at: PointRon,
    #[serde(default)]
    artifact: Option<u8>,
    #[serde(default)]
    status: KoopaStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelRon {
    id: u16,
    start: PointRon,
    roads: Vec<RoadRon>,
    #[serde(default)]
    npc_slots: Vec<PointRon>,
    #[serde(default)]
    kiosks: Vec<KioskRon>,
    #[serde(default)]
    koopas: Vec<KoopaRon>,
    #[serde(default)]
    completed_kiosks: Vec<u8>,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerRon {
    floor: u16,
    at: PointRon,
    #[serde(default)]
    level: Option<u16>,
    #[serde(default)]
    mount: bool,
    #[serde(default)]
    artifact: u8,
    #[serde(default)]
    delay_end: Ticks,
}

/// Loader for world scenarios from RON files.
pub struct WorldLoader;

impl WorldLoader {
    /// Load a scenario from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON scenario
    /// * `config` - Supplies the generator seed when the scenario has none
    pub fn load(path: &Path, config: &GameConfig) -> LoadResult<GameState> {
        let content = read_file(path)?;
        Self::parse(&content, config)
    }

    /// Parse a scenario from RON text and validate it into a [`GameState`].
    pub fn parse(content: &str, config: &GameConfig) -> LoadResult<GameState> {
        let data: WorldRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse world RON: {}", e))?;

        let floors = data
            .floors
            .into_iter()
            .map(build_floor)
            .collect::<LoadResult<Vec<_>>>()?;

        let spec = data.player;
        let mut player = Player::new(FloorId(spec.floor), spec.at.position())
            .with_mount(spec.mount)
            .holding(ArtifactId(spec.artifact))
            .with_transition_delay_end(spec.delay_end);
        if let Some(level) = spec.level {
            player = player.in_level(LevelId(level));
        }

        let (low, high) = data.rng.unwrap_or((config.rng_low, config.rng_high));
        GameState::new(floors, player, SlotRng::with_seed(low, high))
            .map_err(|e| anyhow::anyhow!("Invalid world: {}", e))
    }
}

fn build_floor(data: FloorRon) -> LoadResult<Floor> {
    let id = FloorId(data.id);
    let castle = build_road(RoadId::CASTLE, data.castle_length, data.castle);
    let mut floor = Floor::new(id, data.start.position(), castle)
        .map_err(|e| anyhow::anyhow!("Invalid floor {}: {}", id, e))?;
    for level in data.levels {
        floor = floor
            .with_level(build_level(level)?)
            .map_err(|e| anyhow::anyhow!("Invalid floor {}: {}", id, e))?;
    }
    Ok(floor)
}

fn build_road(id: RoadId, length: i32, transitions: Vec<TransitionRon>) -> Road {
    let transitions = transitions
        .into_iter()
        .map(|t| Transition::new(Position::new(false, id, t.from), t.to.position(), t.kind))
        .collect();
    Road::new(id, length, transitions)
}

fn build_level(data: LevelRon) -> LoadResult<Level> {
    let id = LevelId(data.id);
    let invalid = |e: StateError| anyhow::anyhow!("Invalid level {}: {}", id, e);

    let roads = data
        .roads
        .into_iter()
        .enumerate()
        .map(|(index, road)| {
            let road_id = u16::try_from(index)
                .map_err(|_| anyhow::anyhow!("Level {} has too many roads", id))?;
            Ok(build_road(RoadId(road_id), road.length, road.transitions))
        })
        .collect::<LoadResult<Vec<_>>>()?;
    let slots = data.npc_slots.into_iter().map(PointRon::position).collect();
    let kiosks = data
        .kiosks
        .into_iter()
        .map(|kiosk| Kiosk::new(ArtifactId(kiosk.artifact), kiosk.at.position()))
        .collect();

    let mut level = Level::new(id, data.start.position(), roads, slots, kiosks).map_err(invalid)?;
    if !data.koopas.is_empty() {
        let koopas = data
            .koopas
            .into_iter()
            .map(|koopa| build_koopa(id, koopa))
            .collect::<LoadResult<Vec<_>>>()?;
        level = level.with_koopas(koopas).map_err(invalid)?;
    }
    Ok(level
        .with_completed_kiosks(data.completed_kiosks.into_iter().map(ArtifactId))
        .map_err(invalid)?
        .with_completed(data.completed))
}

fn build_koopa(level: LevelId, data: KoopaRon) -> LoadResult<Koopa> {
    let id = KoopaId(data.id);
    // Road length is rebound from the level layout.
    let mut koopa = Koopa::new(id, data.at.position(), 0).with_status(data.status);
    if let Some(artifact) = data.artifact {
        let animation_time = GameConfig::ANIMATION_TIMES
            .get(usize::from(artifact))
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Koopa {} in level {} holds unknown artifact {}",
                    id,
                    level,
                    artifact
                )
            })?;
        koopa = koopa.with_artifact(ArtifactId(artifact), animation_time);
    }
    Ok(koopa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HUB_ONLY: &str = r#"(
        floors: [(
            id: 1,
            start: (road: 1234, x: 100),
            castle: [(from: 100, to: (road: 0, x: 50), kind: Entrance(level: 1, load_time: 34))],
            levels: [(
                id: 1,
                start: (road: 0, x: 50),
                roads: [
                    (length: 1000, transitions: [
                        (from: 500, to: (road: 1, x: 100), kind: Pipe),
                        (from: 900, to: (road: 1234, x: 100), kind: Exit),
                    ]),
                    (length: 800, transitions: [(from: 100, to: (road: 0, x: 500), kind: Pipe)]),
                ],
                kiosks: [(artifact: 0, at: (road: 1, x: 700))],
            )],
        )],
        player: (floor: 1, at: (road: 1234, x: 100)),
    )"#;

    #[test]
    fn builds_floors_and_roads() {
        let state = WorldLoader::parse(HUB_ONLY, &GameConfig::default()).unwrap();

        let floor = state.floor(FloorId(1)).unwrap();
        assert_eq!(
            floor.castle_road().length(),
            GameConfig::DEFAULT_CASTLE_ROAD_LENGTH
        );
        assert_eq!(
            floor.castle_road().transitions()[0].entered_level(),
            Some(LevelId(1))
        );

        let level = floor.level(LevelId(1)).unwrap();
        assert_eq!(level.roads().len(), 2);
        assert_eq!(level.roads()[1].length(), 800);
        let exit = level.roads()[0].transition(1).unwrap();
        assert!(exit.is_exit());
        assert_eq!(exit.src(), Position::new(false, RoadId(0), 900));
        assert_eq!(level.kiosks()[0].base_position().road, RoadId(1));
        assert!(state.player().is_in_castle());
    }

    #[test]
    fn seed_comes_from_config_unless_overridden() {
        let config = GameConfig::with_rng_seed(11, 22);
        let state = WorldLoader::parse(HUB_ONLY, &config).unwrap();
        assert_eq!(state.rng().registers(), (11, 22));

        let seeded = HUB_ONLY.replacen("floors:", "rng: Some((1, 2)),\n        floors:", 1);
        let state = WorldLoader::parse(&seeded, &config).unwrap();
        assert_eq!(state.rng().registers(), (1, 2));
    }

    #[test]
    fn loads_mid_level_snapshot_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.ron");
        let snapshot = HUB_ONLY
            .replacen(
                "kiosks: [(artifact: 0, at: (road: 1, x: 700))],",
                "kiosks: [(artifact: 0, at: (road: 1, x: 700))],
                koopas: [
                    (id: 18, at: (road: 1, x: 300, left: true), artifact: Some(0), status: Stomped),
                    (id: 3, at: (road: 0, x: 600)),
                ],",
                1,
            )
            .replacen(
                "player: (floor: 1, at: (road: 1234, x: 100)),",
                "player: (floor: 1, at: (road: 1, x: 250), level: Some(1), mount: true, delay_end: 40),",
                1,
            );
        std::fs::write(&path, snapshot).unwrap();

        let state = WorldLoader::load(&path, &GameConfig::default()).unwrap();
        let player = state.player();
        assert_eq!(player.level(), Some(LevelId(1)));
        assert!(player.has_mount());
        assert_eq!(player.transition_delay_end(), 40);

        let level = state.current_level().unwrap();
        let ids: Vec<_> = level.koopas().iter().map(|k| k.id()).collect();
        assert_eq!(ids, vec![KoopaId(3), KoopaId(18)]);
        let holder = level.koopa(KoopaId(18)).unwrap();
        assert_eq!(holder.status(), KoopaStatus::Stomped);
        assert_eq!(holder.artifact(), Some(ArtifactId(0)));
        assert!(holder.position().facing_left);
        assert_eq!(level.koopa(KoopaId(3)).unwrap().status(), KoopaStatus::Active);
    }

    #[test]
    fn reports_malformed_ron() {
        let err = WorldLoader::parse("(floors: [", &GameConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse world RON"), "{err}");
    }

    #[test]
    fn rejects_player_outside_known_floors() {
        let world = HUB_ONLY.replacen("player: (floor: 1,", "player: (floor: 2,", 1);
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid world"), "{err}");
    }

    #[test]
    fn rejects_npc_slots_on_missing_roads() {
        let world = HUB_ONLY.replacen(
            "kiosks: [(artifact: 0, at: (road: 1, x: 700))],",
            "npc_slots: [(road: 7, x: 10)],",
            1,
        );
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid level 1"), "{err}");
    }

    #[test]
    fn rejects_roads_too_short_for_koopas() {
        let world = HUB_ONLY.replacen("(length: 800,", "(length: 10,", 1);
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid level 1"), "{message}");
        assert!(message.contains("is 10 long"), "{message}");

        let world = HUB_ONLY.replacen("castle: [", "castle_length: 10,\n            castle: [", 1);
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid floor 1"), "{err}");
    }

    #[test]
    fn rejects_kiosks_past_the_road_end() {
        let world = HUB_ONLY.replacen("at: (road: 1, x: 700)", "at: (road: 1, x: 801)", 1);
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid level 1"), "{message}");
        assert!(message.contains("outside its road of length 800"), "{message}");
    }

    #[test]
    fn rejects_unknown_artifact_holder() {
        let world = HUB_ONLY.replacen(
            "kiosks: [(artifact: 0, at: (road: 1, x: 700))],",
            "koopas: [(id: 18, at: (road: 0, x: 300), artifact: Some(3))],",
            1,
        );
        let err = WorldLoader::parse(&world, &GameConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Koopa 18 in level 1 holds unknown artifact 3"
        );
    }

    #[test]
    fn demo_save_is_a_valid_world() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../saves/demo");
        let config = crate::ConfigLoader::load(&dir.join("game.toml")).unwrap();
        let state = WorldLoader::load(&dir.join("world.ron"), &config).unwrap();

        assert_eq!(state.floors().len(), 1);
        assert_eq!(state.rng().registers(), (config.rng_low, config.rng_high));
        let level = state.floor(FloorId(1)).unwrap().level(LevelId(1)).unwrap();
        assert_eq!(level.roads().len(), 5);
        assert!(!level.is_completed());
    }
}
