//! Two-tier best-first route search.
//!
//! The outer tier explores hub decisions ordered by elapsed time plus
//! [`Heuristic::remaining_levels_time`]. Whenever a route has just entered a
//! level, the inner tier solves that level on its own and the solution is
//! folded back into the outer frontier.
//!
//! # Module Structure
//!
//! - `frontier`: priority queue with out-of-order removal
//! - `equivalence`: dominance test used for pruning and deduplication
//! - `stats`: per-search counters
mod equivalence;
mod frontier;
mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use mim_core::{
    AcquireMount, Action, ActionTransition, CompletionCode, GameState, LevelKey, Route, Ticks,
};

pub use stats::SearchStats;

use crate::config::{GeneratorKind, HeuristicKind, OptimizerConfig};
use crate::error::{Result, RouterError};
use crate::generator::{ActionGenerator, DefaultActionGenerator, NaturalOrderActionGenerator};
use crate::heuristic::{Heuristic, SlightlyBetterHeuristic, UnderestimatingHeuristic};

use equivalence::is_equivalent;
use frontier::{Frontier, Handle};

/// Routes found by a search, fastest first, with the counters it collected.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub routes: Vec<Route>,
    pub stats: SearchStats,
}

/// Level state recorded for deduplication inside one level search.
struct Snapshot {
    handle: Handle,
    time: Ticks,
    state: Arc<GameState>,
}

/// Nested best-first optimizer.
pub struct RouteOptimizer {
    config: OptimizerConfig,
    generator: Box<dyn ActionGenerator>,
    heuristic: Box<dyn Heuristic>,
}

impl RouteOptimizer {
    /// Builds an optimizer with the strategies named in `config`.
    pub fn new(config: OptimizerConfig) -> Self {
        let generator: Box<dyn ActionGenerator> = match config.generator {
            GeneratorKind::Default => Box::new(DefaultActionGenerator),
            GeneratorKind::NaturalOrder => Box::new(NaturalOrderActionGenerator),
        };
        let heuristic: Box<dyn Heuristic> = match config.heuristic {
            HeuristicKind::SlightlyBetter => Box::new(SlightlyBetterHeuristic),
            HeuristicKind::Underestimating => Box::new(UnderestimatingHeuristic),
        };
        Self::with_strategies(config, generator, heuristic)
    }

    /// Builds an optimizer with caller-supplied strategies; the kinds in
    /// `config` are ignored.
    pub fn with_strategies(
        config: OptimizerConfig,
        generator: Box<dyn ActionGenerator>,
        heuristic: Box<dyn Heuristic>,
    ) -> Self {
        Self {
            config,
            generator,
            heuristic,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Searches for up to `max_routes` complete routes from `initial`.
    ///
    /// Fewer routes, including none, is a normal outcome.
    pub fn search(&self, initial: GameState) -> Result<SearchOutcome> {
        let mut stats = SearchStats::default();
        let mut frontier = Frontier::new();
        let mut routes = Vec::new();

        let root = Route::new(initial);
        frontier.push(self.outer_priority(&root), root);

        let mut pops = 0;
        while routes.len() < self.config.max_routes {
            if self.config.budget_exhausted(pops) {
                warn!(pops, found = routes.len(), "outer search hit its node budget");
                break;
            }
            let Some((_, route)) = frontier.pop() else {
                break;
            };
            pops += 1;
            stats.outer_pops += 1;

            if route.state().is_completed() {
                info!(
                    index = routes.len(),
                    total = route.total_time(),
                    "found complete route"
                );
                routes.push(route);
            } else if just_entered_level(&route) {
                match self.solve_level(&route, &mut stats)? {
                    Some(solved) => self.merge_level_solution(solved, &mut frontier, &mut stats),
                    None => debug!("dropping route whose level could not be solved"),
                }
            } else {
                for child in self.expand(&route, &mut stats)? {
                    frontier.push(self.outer_priority(&child), child);
                }
            }
        }

        stats.stale_skips += frontier.stale_skips();
        info!(
            routes = routes.len(),
            levels_solved = stats.levels_solved,
            pops = stats.total_pops(),
            "route search finished"
        );
        Ok(SearchOutcome { routes, stats })
    }

    /// Solves the level `entered` is in, starting with the mount.
    ///
    /// Returns `None` when the level frontier empties or the node budget runs
    /// out before the level is completed.
    pub fn solve_level(&self, entered: &Route, stats: &mut SearchStats) -> Result<Option<Route>> {
        let key = entered
            .state()
            .current_level_key()
            .ok_or(RouterError::LevelNotEntered)?;
        debug!(level = %key, "solving level");

        // Getting the mount first is assumed; it prunes every branch that
        // mounts later in the level.
        let mut seed = entered.clone();
        let mount = Action::from(AcquireMount);
        if mount.is_feasible(seed.state()) {
            seed.perform_action(mount.clone())
                .map_err(|source| RouterError::apply(&mount, source))?;
        }

        let mut frontier = Frontier::new();
        let mut snapshots: HashMap<CompletionCode, Vec<Snapshot>> = HashMap::new();
        frontier.push(self.inner_priority(&seed), seed);

        let mut pops = 0;
        let solved = loop {
            if self.config.budget_exhausted(pops) {
                warn!(level = %key, pops, "level search hit its node budget");
                break None;
            }
            let Some((_, route)) = frontier.pop() else {
                break None;
            };
            pops += 1;
            stats.inner_pops += 1;

            if level_completed(route.state(), key) {
                break Some(route);
            }
            for child in self.expand(&route, stats)? {
                // Leaving is only useful once the level is done.
                if child.state().player().is_in_castle() && !level_completed(child.state(), key) {
                    continue;
                }
                self.add_level_step(child, &mut frontier, &mut snapshots, stats);
            }
        };
        stats.stale_skips += frontier.stale_skips();

        match &solved {
            Some(route) => {
                stats.levels_solved += 1;
                info!(
                    level = %key,
                    tries = pops + frontier.len() as u64,
                    total = route.total_time(),
                    done = route.state().levels_completed(),
                    "level solved"
                );
            }
            None => {
                stats.levels_abandoned += 1;
                warn!(level = %key, tries = pops, "level could not be solved");
            }
        }
        Ok(solved)
    }

    fn expand(&self, route: &Route, stats: &mut SearchStats) -> Result<Vec<Route>> {
        self.generator
            .generate(route.state())
            .into_iter()
            .map(|action| {
                let mut child = route.clone();
                child
                    .perform_action(action.clone())
                    .map_err(|source| RouterError::apply(&action, source))?;
                stats.expansions += 1;
                Ok(child)
            })
            .collect()
    }

    fn outer_priority(&self, route: &Route) -> Ticks {
        route.total_time() + self.heuristic.remaining_levels_time(route.state())
    }

    fn inner_priority(&self, route: &Route) -> Ticks {
        let state = route.state();
        let estimate = match state.current_level() {
            Some(level) => self.heuristic.level_time(level, state.player()),
            None => 0,
        };
        route.total_time() + estimate
    }

    fn add_level_step(
        &self,
        route: Route,
        frontier: &mut Frontier<Route>,
        snapshots: &mut HashMap<CompletionCode, Vec<Snapshot>>,
        stats: &mut SearchStats,
    ) {
        let state = route.state();
        let Some(code) = state.current_level().map(|level| level.completion_code()) else {
            // Completed exits go straight in; the frontier picks the fastest.
            frontier.push(self.inner_priority(&route), route);
            return;
        };

        let time = route.total_time();
        let loops_back = route.entries_rev().any(|entry| {
            !Arc::ptr_eq(entry.state(), route.shared_state())
                && is_equivalent(state, time, entry.state(), entry.cumulative_time())
        });
        if loops_back {
            stats.self_loop_prunes += 1;
            return;
        }

        let recorded = snapshots.entry(code).or_default();
        let existing = recorded
            .iter()
            .position(|snap| is_equivalent(state, time, &snap.state, snap.time));
        if let Some(index) = existing {
            if time >= recorded[index].time {
                stats.dedup_rejections += 1;
                return;
            }
            let slower = recorded.swap_remove(index);
            frontier.remove(slower.handle);
            stats.dedup_replacements += 1;
            debug!(code = %code, old = slower.time, new = time, "replaced slower level state");
        }

        let shared = Arc::clone(route.shared_state());
        let handle = frontier.push(self.inner_priority(&route), route);
        recorded.push(Snapshot {
            handle,
            time,
            state: shared,
        });
    }

    /// Adds a solved-level route to the outer frontier unless a live route
    /// with the same completed levels and generator state is at least as
    /// fast. A slower match is removed.
    fn merge_level_solution(
        &self,
        solved: Route,
        frontier: &mut Frontier<Route>,
        stats: &mut SearchStats,
    ) {
        let state = solved.state();
        let rival = frontier.iter().find_map(|(handle, existing)| {
            let other = existing.state();
            (other.rng() == state.rng() && other.completed_levels().eq(state.completed_levels()))
                .then_some((handle, existing.total_time()))
        });

        if let Some((handle, rival_time)) = rival {
            if solved.total_time() >= rival_time {
                stats.merge_rejections += 1;
                debug!(
                    total = solved.total_time(),
                    rival = rival_time,
                    "dropping level solution"
                );
                return;
            }
            frontier.remove(handle);
            stats.merge_replacements += 1;
        }
        frontier.push(self.outer_priority(&solved), solved);
    }
}

/// True when the last action entered a level from the castle road.
fn just_entered_level(route: &Route) -> bool {
    matches!(route.last_action(), Some(action) if action.is_castle_transition())
        && !route.state().player().is_in_castle()
}

fn level_completed(state: &GameState, key: LevelKey) -> bool {
    state.level(key).is_some_and(|level| level.is_completed())
}

#[cfg(test)]
mod tests;
