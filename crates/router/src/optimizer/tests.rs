use mim_core::{
    ArtifactId, Floor, FloorId, Kiosk, Koopa, KoopaId, Level, LevelId, Player, Position, Road,
    RoadId, SlotRng, Transition,
};

use super::*;

fn at(road: u16, x: i32) -> Position {
    Position::new(false, RoadId(road), x)
}

fn castle(x: i32) -> Position {
    Position::new(false, RoadId::CASTLE, x)
}

/// One koopa carrying artifact 0 next to the player, its kiosk 200 units to
/// the right and the exit at x 900. A side road adds a pointless loop.
fn single_artifact_level() -> GameState {
    let road0 = Road::new(
        RoadId(0),
        1000,
        vec![
            Transition::exit(at(0, 900), castle(200)),
            Transition::pipe(at(0, 100), at(1, 100)),
        ],
    );
    let road1 = Road::new(RoadId(1), 1000, vec![Transition::pipe(at(1, 100), at(0, 100))]);
    let koopa = Koopa::new(KoopaId(18), at(0, 500), 0).with_artifact(ArtifactId(0), 80);
    let level = Level::new(
        LevelId(1),
        at(0, 50),
        vec![road0, road1],
        Vec::new(),
        vec![Kiosk::new(ArtifactId(0), at(0, 700))],
    )
    .and_then(|level| level.with_koopas(vec![koopa]))
    .expect("level");
    let floor = Floor::new(FloorId(1), castle(100), Road::castle(448, Vec::new()))
        .and_then(|floor| floor.with_level(level))
        .expect("floor");
    let player = Player::new(FloorId(1), at(0, 500)).in_level(LevelId(1));
    GameState::new(vec![floor], player, SlotRng::new()).expect("state")
}

fn step_names(route: &Route) -> Vec<&'static str> {
    route
        .history()
        .iter()
        .map(|entry| entry.action().as_snake_case())
        .collect()
}

fn optimizer(heuristic: HeuristicKind) -> RouteOptimizer {
    RouteOptimizer::new(OptimizerConfig::default().with_heuristic(heuristic))
}

#[test]
fn solves_single_artifact_level_optimally() {
    for heuristic in [HeuristicKind::SlightlyBetter, HeuristicKind::Underestimating] {
        let entered = Route::new(single_artifact_level());
        let mut stats = SearchStats::default();
        let solved = optimizer(heuristic)
            .solve_level(&entered, &mut stats)
            .expect("search")
            .expect("level solution");

        // mount 600 + stomp 40 + pickup 16 + return 111 + exit 445
        assert_eq!(solved.total_time(), 1212, "{heuristic}");
        assert_eq!(
            step_names(&solved),
            vec![
                "acquire_mount",
                "stomp_target",
                "collect_artifact",
                "return_artifact",
                "take_transition"
            ]
        );
        assert!(solved.state().player().is_in_castle());
        assert_eq!(stats.levels_solved, 1);
        assert!(stats.self_loop_prunes > 0, "{heuristic}: {stats:?}");
    }
}

#[test]
fn solving_keeps_the_entered_route_untouched() {
    let entered = Route::new(single_artifact_level());
    let mut stats = SearchStats::default();
    optimizer(HeuristicKind::SlightlyBetter)
        .solve_level(&entered, &mut stats)
        .expect("search");
    assert!(entered.is_empty());
    assert!(!entered.state().player().has_mount());
}

#[test]
fn solving_requires_being_in_a_level() {
    let state = single_artifact_level();
    let floors = state.floors().to_vec();
    let outside = GameState::new(floors, Player::new(FloorId(1), castle(100)), SlotRng::new())
        .expect("state");
    let mut stats = SearchStats::default();
    let result =
        optimizer(HeuristicKind::SlightlyBetter).solve_level(&Route::new(outside), &mut stats);
    assert!(matches!(result, Err(RouterError::LevelNotEntered)));
}

#[test]
fn exhausted_budget_abandons_the_level() {
    let config = OptimizerConfig::default().with_node_budget(Some(2));
    let entered = Route::new(single_artifact_level());
    let mut stats = SearchStats::default();
    let solved = RouteOptimizer::new(config)
        .solve_level(&entered, &mut stats)
        .expect("search");
    assert!(solved.is_none());
    assert_eq!(stats.inner_pops, 2);
    assert_eq!(stats.levels_abandoned, 1);
}

#[test]
fn just_entered_requires_castle_transition_into_a_level() {
    let route = Route::new(single_artifact_level());
    assert!(!just_entered_level(&route));
}
