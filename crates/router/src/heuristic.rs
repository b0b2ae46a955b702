//! Time estimates that order the search frontiers.
//!
//! The outer tier ranks routes by elapsed time plus
//! [`Heuristic::remaining_levels_time`]; the inner tier by elapsed time plus
//! [`Heuristic::level_time`] for the level being solved.
use mim_core::{GameConfig, GameState, KoopaStatus, Level, Player, Ticks};

/// Remaining-time estimator used by both search tiers.
pub trait Heuristic {
    /// Estimated time to finish every incomplete level in the game.
    fn remaining_levels_time(&self, state: &GameState) -> Ticks;

    /// Estimated time left in `level`; zero once it is complete or the
    /// player has left it.
    fn level_time(&self, level: &Level, player: &Player) -> Ticks;
}

fn mount_penalty(player: &Player) -> Ticks {
    if player.has_mount() { 0 } else { GameConfig::MOUNT_TIME }
}

fn kiosk_penalty(level: &Level, player: &Player) -> Ticks {
    let open = level.kiosks().iter().filter(|kiosk| !kiosk.is_completed()).count();
    open as Ticks * GameConfig::answer_time(player.floor())
}

fn active_holders(level: &Level) -> Ticks {
    level
        .artifact_holders()
        .filter(|koopa| koopa.status() == KoopaStatus::Active)
        .count() as Ticks
}

/// Sums fixed costs of every unfinished objective.
///
/// For unfinished levels this charges kiosk answers, stomps, the exit, the
/// entrance and one transition per significant road (the start road plus
/// every kiosk road).
#[derive(Clone, Copy, Debug, Default)]
pub struct SlightlyBetterHeuristic;

impl SlightlyBetterHeuristic {
    const STOMP_PENALTY: Ticks = GameConfig::POST_STOMP_TIME;
}

impl Heuristic for SlightlyBetterHeuristic {
    fn remaining_levels_time(&self, state: &GameState) -> Ticks {
        let transition_estimate = GameConfig::min_transition_time();
        let mut penalty = 0;
        for floor in state.floors() {
            let answer = GameConfig::answer_time(floor.id());
            let entrances = floor.castle_road().transitions();
            for level in floor.levels().iter().filter(|level| !level.is_completed()) {
                let entrance = entrances
                    .iter()
                    .find(|t| t.entered_level() == Some(level.id()))
                    .map_or(0, |t| t.total_time());
                penalty += level.kiosks().len() as Ticks * answer;
                penalty += level.artifact_holders().count() as Ticks * Self::STOMP_PENALTY;
                penalty += GameConfig::EXIT_TOTAL_TIME;
                penalty += entrance;
                penalty += level.layout().significant_roads() as Ticks * transition_estimate;
            }
        }
        penalty
    }

    fn level_time(&self, level: &Level, player: &Player) -> Ticks {
        if level.is_completed() || player.is_in_castle() {
            return 0;
        }
        active_holders(level) * Self::STOMP_PENALTY
            + kiosk_penalty(level, player)
            + mount_penalty(player)
    }
}

/// Baseline estimator: one tick per active artifact holder, kiosk answers
/// and the mount. Ignores levels that have not been entered.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnderestimatingHeuristic;

impl Heuristic for UnderestimatingHeuristic {
    fn remaining_levels_time(&self, _state: &GameState) -> Ticks {
        0
    }

    fn level_time(&self, level: &Level, player: &Player) -> Ticks {
        if level.is_completed() {
            return 0;
        }
        let holders = level
            .koopas()
            .iter()
            .filter(|koopa| koopa.has_artifact() && koopa.is_active())
            .count() as Ticks;
        holders + kiosk_penalty(level, player) + mount_penalty(player)
    }
}

#[cfg(test)]
mod tests {
    use mim_core::{
        ArtifactId, Floor, FloorId, Kiosk, Koopa, KoopaId, LevelId, Position, Road, RoadId,
        SlotRng, Transition,
    };

    use super::*;

    fn at(road: u16, x: i32) -> Position {
        Position::new(false, RoadId(road), x)
    }

    fn castle(x: i32) -> Position {
        Position::new(false, RoadId::CASTLE, x)
    }

    /// Level 1 of floor 1: kiosks on roads 0 and 2, start on road 0.
    fn state(player: Player) -> GameState {
        let roads = (0..3).map(|id| Road::new(RoadId(id), 1000, Vec::new())).collect();
        let kiosks = vec![
            Kiosk::new(ArtifactId(0), at(0, 700)),
            Kiosk::new(ArtifactId(1), at(2, 700)),
        ];
        let koopas = vec![
            Koopa::new(KoopaId(18), at(1, 300), 0).with_artifact(ArtifactId(0), 80),
            Koopa::new(KoopaId(19), at(1, 600), 0)
                .with_artifact(ArtifactId(1), 48)
                .with_status(KoopaStatus::Stomped),
        ];
        let level = Level::new(LevelId(1), at(0, 50), roads, Vec::new(), kiosks)
            .and_then(|level| level.with_koopas(koopas))
            .expect("level");
        let entrance = Transition::entrance(castle(100), at(0, 50), LevelId(1), 34);
        let floor = Floor::new(FloorId(1), castle(100), Road::castle(448, vec![entrance]))
            .and_then(|floor| floor.with_level(level))
            .expect("floor");
        GameState::new(vec![floor], player, SlotRng::new()).expect("state")
    }

    fn level(state: &GameState) -> &Level {
        state.floors()[0].levels().first().expect("level")
    }

    #[test]
    fn remaining_levels_sums_fixed_costs() {
        let state = state(Player::new(FloorId(1), castle(100)));
        // 2 kiosks * 90 + 2 holders * 40 + exit 370 + entrance 114 + 2 roads * 114
        let expected = 180 + 80 + 370 + 114 + 228;
        assert_eq!(SlightlyBetterHeuristic.remaining_levels_time(&state), expected);
        assert_eq!(UnderestimatingHeuristic.remaining_levels_time(&state), 0);
    }

    #[test]
    fn level_estimates_count_open_objectives() {
        let inside = Player::new(FloorId(1), at(0, 50)).in_level(LevelId(1));
        let state = state(inside);
        let level = level(&state);
        let player = state.player();
        assert_eq!(SlightlyBetterHeuristic.level_time(level, player), 40 + 180 + 600);
        assert_eq!(UnderestimatingHeuristic.level_time(level, player), 1 + 180 + 600);

        let mounted = state.player().clone().with_mount(true);
        assert_eq!(SlightlyBetterHeuristic.level_time(level, &mounted), 220);
    }

    #[test]
    fn level_estimate_is_zero_outside_the_level() {
        let state = state(Player::new(FloorId(1), castle(100)));
        let level = level(&state);
        assert_eq!(SlightlyBetterHeuristic.level_time(level, state.player()), 0);
        assert_eq!(UnderestimatingHeuristic.level_time(level, state.player()), 781);
    }
}
