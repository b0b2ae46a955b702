//! Action generators: which actions the search may try from a state.
use arrayvec::ArrayVec;

use mim_core::{
    AcquireMount, Action, ActionTransition, CollectArtifact, CollectMultipleArtifacts, GameState,
    KoopaId, LevelId, MAX_TARGETS, ReturnArtifact, RoadId, StompMultipleTargets, StompTarget,
    TakeTransition,
};

/// Stomp variants in generation order: `(running, land_left)`.
const STOMP_VARIANTS: [(bool, bool); 4] =
    [(false, false), (false, true), (true, false), (true, true)];

/// Produces candidate actions for a state.
///
/// Every returned action must be feasible in `state`.
pub trait ActionGenerator {
    fn generate(&self, state: &GameState) -> Vec<Action>;
}

fn push_if_feasible(actions: &mut Vec<Action>, state: &GameState, action: impl Into<Action>) {
    let action = action.into();
    if action.is_feasible(state) {
        actions.push(action);
    }
}

/// Proposes every feasible action.
///
/// In a level: kiosk returns, per-koopa pickups and stomps, multi-koopa
/// variants for every group of two or more koopas on the player's road, the
/// road's transitions and finally the mount. In the hub: the castle road's
/// transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultActionGenerator;

impl DefaultActionGenerator {
    fn castle_actions(state: &GameState) -> Vec<Action> {
        let mut actions = Vec::new();
        Self::push_road_actions(state, RoadId::CASTLE, &mut actions);
        actions
    }

    fn level_actions(state: &GameState) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(level) = state.current_level() else {
            return actions;
        };

        for kiosk in level.kiosks() {
            push_if_feasible(&mut actions, state, ReturnArtifact::new(kiosk.artifact()));
        }

        for koopa in level.koopas() {
            let id = koopa.id();
            push_if_feasible(&mut actions, state, CollectArtifact::new(id));
            for (running, land_left) in STOMP_VARIANTS {
                push_if_feasible(&mut actions, state, StompTarget::new(id, running, land_left));
            }
        }

        // Groups are formed from artifact carriers sharing the player's road.
        let road = state.player().position().road;
        let on_road: Vec<KoopaId> = level
            .koopas()
            .iter()
            .filter(|koopa| koopa.has_artifact() && koopa.position().road == road)
            .map(|koopa| koopa.id())
            .collect();
        let mut selection = ArrayVec::new();
        Self::push_group_actions(state, &on_road, &mut selection, &mut actions);

        Self::push_road_actions(state, road, &mut actions);
        push_if_feasible(&mut actions, state, AcquireMount);
        actions
    }

    /// Walks every subset of `remaining` that extends `selection`, emitting
    /// the multi-target actions for each subset of two or more koopas.
    fn push_group_actions(
        state: &GameState,
        remaining: &[KoopaId],
        selection: &mut ArrayVec<KoopaId, MAX_TARGETS>,
        actions: &mut Vec<Action>,
    ) {
        for (i, id) in remaining.iter().enumerate() {
            if selection.try_push(*id).is_err() {
                return;
            }
            if selection.len() > 1 {
                push_if_feasible(actions, state, CollectMultipleArtifacts::new(selection.clone()));
                for (running, land_left) in STOMP_VARIANTS {
                    push_if_feasible(
                        actions,
                        state,
                        StompMultipleTargets::new(selection.clone(), running, land_left),
                    );
                }
            }
            Self::push_group_actions(state, &remaining[i + 1..], selection, actions);
            selection.pop();
        }
    }

    fn push_road_actions(state: &GameState, road: RoadId, actions: &mut Vec<Action>) {
        let count = if road.is_castle() {
            state
                .current_floor()
                .map_or(0, |floor| floor.castle_road().transitions().len())
        } else {
            state
                .current_level()
                .and_then(|level| level.road(road))
                .map_or(0, |road| road.transitions().len())
        };
        for index in 0..count {
            push_if_feasible(actions, state, TakeTransition::new(road, index));
        }
    }
}

impl ActionGenerator for DefaultActionGenerator {
    fn generate(&self, state: &GameState) -> Vec<Action> {
        if state.player().is_in_castle() {
            Self::castle_actions(state)
        } else {
            Self::level_actions(state)
        }
    }
}

/// Plays a floor's levels from both ends inward.
///
/// In the hub it offers the first and last levels until one of them is done,
/// then keeps working inward from whichever end finished, and offers the
/// floor exit once every level is complete. Inside levels it defers to
/// [`DefaultActionGenerator`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrderActionGenerator;

impl NaturalOrderActionGenerator {
    fn castle_actions(state: &GameState) -> Vec<Action> {
        let mut actions = Vec::new();
        let Some(floor) = state.current_floor() else {
            return actions;
        };

        let levels = floor.levels();
        let done = |id: LevelId| floor.level(id).is_some_and(|level| level.is_completed());
        let targets: Vec<LevelId> = match (levels.first(), levels.last()) {
            (Some(first), Some(_)) if done(first.id()) => levels
                .iter()
                .map(|level| level.id())
                .find(|id| !done(*id))
                .into_iter()
                .collect(),
            (Some(_), Some(last)) if done(last.id()) => levels
                .iter()
                .rev()
                .map(|level| level.id())
                .find(|id| !done(*id))
                .into_iter()
                .collect(),
            (Some(first), Some(last)) if first.id() == last.id() => vec![first.id()],
            (Some(first), Some(last)) => vec![first.id(), last.id()],
            _ => Vec::new(),
        };

        let transitions = floor.castle_road().transitions();
        if targets.is_empty() {
            if let Some(index) = transitions.iter().position(|t| t.is_floor_exit()) {
                push_if_feasible(&mut actions, state, TakeTransition::new(RoadId::CASTLE, index));
            }
            return actions;
        }
        for target in targets {
            let entrance = transitions
                .iter()
                .position(|t| t.entered_level() == Some(target));
            if let Some(index) = entrance {
                push_if_feasible(&mut actions, state, TakeTransition::new(RoadId::CASTLE, index));
            }
        }
        actions
    }
}

impl ActionGenerator for NaturalOrderActionGenerator {
    fn generate(&self, state: &GameState) -> Vec<Action> {
        if state.player().is_in_castle() {
            Self::castle_actions(state)
        } else {
            DefaultActionGenerator.generate(state)
        }
    }
}

#[cfg(test)]
mod tests {
    use mim_core::{
        ArtifactId, Floor, FloorId, GameConfig, Koopa, Level, Player, Position, Road, SlotRng,
        Transition,
    };

    use super::*;

    fn at(road: u16, x: i32) -> Position {
        Position::new(false, RoadId(road), x)
    }

    fn castle(x: i32) -> Position {
        Position::new(false, RoadId::CASTLE, x)
    }

    fn empty_level(id: u16, completed: bool) -> Level {
        let road = Road::new(RoadId(0), 1000, vec![Transition::exit(at(0, 900), castle(100))]);
        Level::new(LevelId(id), at(0, 50), vec![road], Vec::new(), Vec::new())
            .expect("level")
            .with_completed(completed)
    }

    /// Floor whose castle road has one entrance per level, then the floor exit.
    fn hub_state(levels: Vec<Level>) -> GameState {
        let mut transitions: Vec<_> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let door = castle(100 + 50 * i as i32);
                Transition::entrance(door, at(0, 50), level.id(), 34)
            })
            .collect();
        transitions.push(Transition::entrance(castle(400), castle(0), LevelId::FLOOR_EXIT, 34));
        let mut floor = Floor::new(FloorId(1), castle(100), Road::castle(448, transitions))
            .expect("floor");
        for level in levels {
            floor = floor.with_level(level).expect("level");
        }
        let next = Floor::new(FloorId(2), castle(64), Road::castle(448, Vec::new())).expect("floor");
        GameState::new(vec![floor, next], Player::new(FloorId(1), castle(100)), SlotRng::new())
            .expect("state")
    }

    fn entrances(actions: &[Action]) -> Vec<usize> {
        actions
            .iter()
            .map(|action| match action {
                Action::TakeTransition(take) => take.index,
                other => panic!("unexpected {other}"),
            })
            .collect()
    }

    #[test]
    fn hub_offers_incomplete_entrances() {
        let state = hub_state(vec![empty_level(1, false), empty_level(2, true)]);
        let actions = DefaultActionGenerator.generate(&state);
        assert_eq!(entrances(&actions), vec![0]);
    }

    #[test]
    fn level_offers_single_and_paired_actions() {
        let animation = GameConfig::ANIMATION_TIMES;
        let koopas = vec![
            Koopa::new(KoopaId(18), at(0, 300), 0).with_artifact(ArtifactId(0), animation[0]),
            Koopa::new(KoopaId(19), at(0, 500).with_facing_left(true), 0)
                .with_artifact(ArtifactId(1), animation[1]),
        ];
        let road = Road::new(RoadId(0), 1000, vec![Transition::exit(at(0, 900), castle(100))]);
        let level = Level::new(LevelId(1), at(0, 50), vec![road], Vec::new(), Vec::new())
            .and_then(|level| level.with_koopas(koopas))
            .expect("level");
        let floor = Floor::new(FloorId(1), castle(100), Road::castle(448, Vec::new()))
            .and_then(|floor| floor.with_level(level))
            .expect("floor");
        let player = Player::new(FloorId(1), at(0, 400)).in_level(LevelId(1));
        let state = GameState::new(vec![floor], player, SlotRng::new()).expect("state");

        let actions = DefaultActionGenerator.generate(&state);
        let count = |pred: fn(&Action) -> bool| actions.iter().filter(|a| pred(a)).count();
        assert_eq!(count(|a| matches!(a, Action::StompTarget(_))), 8);
        assert_eq!(count(|a| matches!(a, Action::StompMultipleTargets(_))), 4);
        assert_eq!(count(|a| matches!(a, Action::CollectArtifact(_))), 0);
        assert_eq!(count(|a| matches!(a, Action::CollectMultipleArtifacts(_))), 0);
        // The exit is out of reach without the mount.
        assert_eq!(count(|a| matches!(a, Action::TakeTransition(_))), 0);
        let first = Action::from(StompTarget::new(KoopaId(18), false, false));
        assert_eq!(actions.first(), Some(&first));
        assert_eq!(actions.last(), Some(&Action::from(AcquireMount)));
        assert!(actions.iter().all(|action| action.is_feasible(&state)));
    }

    #[test]
    fn groups_skip_koopas_without_artifacts() {
        let koopas = vec![
            Koopa::new(KoopaId(18), at(0, 300), 0).with_artifact(ArtifactId(0), 80),
            Koopa::new(KoopaId(3), at(0, 500).with_facing_left(true), 0),
        ];
        let road = Road::new(RoadId(0), 1000, vec![Transition::exit(at(0, 900), castle(100))]);
        let level = Level::new(LevelId(1), at(0, 50), vec![road], Vec::new(), Vec::new())
            .and_then(|level| level.with_koopas(koopas))
            .expect("level");
        let floor = Floor::new(FloorId(1), castle(100), Road::castle(448, Vec::new()))
            .and_then(|floor| floor.with_level(level))
            .expect("floor");
        let player = Player::new(FloorId(1), at(0, 400)).in_level(LevelId(1));
        let state = GameState::new(vec![floor], player, SlotRng::new()).expect("state");

        let actions = DefaultActionGenerator.generate(&state);
        assert!(actions.iter().any(|a| matches!(a, Action::StompTarget(_))));
        assert!(!actions.iter().any(|a| matches!(
            a,
            Action::StompMultipleTargets(_) | Action::CollectMultipleArtifacts(_)
        )));
    }

    #[test]
    fn natural_order_works_inward_from_both_ends() {
        let fresh = hub_state(vec![
            empty_level(1, false),
            empty_level(2, false),
            empty_level(3, false),
        ]);
        assert_eq!(entrances(&NaturalOrderActionGenerator.generate(&fresh)), vec![0, 2]);

        let first_done = hub_state(vec![
            empty_level(1, true),
            empty_level(2, false),
            empty_level(3, false),
        ]);
        assert_eq!(entrances(&NaturalOrderActionGenerator.generate(&first_done)), vec![1]);

        let last_done = hub_state(vec![
            empty_level(1, false),
            empty_level(2, false),
            empty_level(3, true),
        ]);
        assert_eq!(entrances(&NaturalOrderActionGenerator.generate(&last_done)), vec![1]);

        let all_done = hub_state(vec![
            empty_level(1, true),
            empty_level(2, true),
            empty_level(3, true),
        ]);
        assert_eq!(entrances(&NaturalOrderActionGenerator.generate(&all_done)), vec![3]);
    }

    #[test]
    fn natural_order_single_level_is_offered_once() {
        let state = hub_state(vec![empty_level(1, false)]);
        assert_eq!(entrances(&NaturalOrderActionGenerator.generate(&state)), vec![0]);
    }
}
