//! Routes: an action trail from an initial snapshot to a final state.
//!
//! Routes branch by cloning. The initial snapshot and the history prefix are
//! shared through [`Arc`]; the final state is copied only when a branch first
//! mutates it, so sibling routes never observe each other's actions.

use core::fmt;
use std::sync::Arc;

use crate::action::{Action, ActionError, ActionTransition};
use crate::geometry::Ticks;
use crate::state::GameState;

/// One performed action together with the state it produced.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    action: Action,
    time: Ticks,
    cumulative: Ticks,
    state: Arc<GameState>,
    prev: Option<Arc<HistoryEntry>>,
}

impl HistoryEntry {
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Ticks spent on this action alone.
    pub fn time(&self) -> Ticks {
        self.time
    }

    /// Route time once this action finished.
    pub fn cumulative_time(&self) -> Ticks {
        self.cumulative
    }

    /// State right after this action.
    pub fn state(&self) -> &Arc<GameState> {
        &self.state
    }

    /// Detailed line for this step, given the state the action started from.
    pub fn describe(&self, before: &GameState) -> String {
        format!(
            "{} ({} - {})",
            self.action.describe(before, self.time),
            self.time,
            self.cumulative
        )
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.action, self.time, self.cumulative)
    }
}

/// Action sequence starting from a shared initial state.
#[derive(Clone, Debug)]
pub struct Route {
    initial: Arc<GameState>,
    state: Arc<GameState>,
    total: Ticks,
    last: Option<Arc<HistoryEntry>>,
    len: usize,
}

impl Route {
    pub fn new(initial: GameState) -> Self {
        Self::from_shared(Arc::new(initial))
    }

    pub fn from_shared(initial: Arc<GameState>) -> Self {
        Self {
            state: Arc::clone(&initial),
            initial,
            total: 0,
            last: None,
            len: 0,
        }
    }

    pub fn initial_state(&self) -> &GameState {
        &self.initial
    }

    /// State after the last performed action.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Shared handle to the current state, identical to the last entry's state.
    pub fn shared_state(&self) -> &Arc<GameState> {
        &self.state
    }

    pub fn total_time(&self) -> Ticks {
        self.total
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.last.as_deref()
    }

    pub fn last_action(&self) -> Option<&Action> {
        self.last_entry().map(HistoryEntry::action)
    }

    /// History entries from the most recent back to the first.
    pub fn entries_rev(&self) -> impl Iterator<Item = &HistoryEntry> {
        core::iter::successors(self.last.as_deref(), |entry| entry.prev.as_deref())
    }

    /// History entries in the order they were performed.
    pub fn history(&self) -> Vec<&HistoryEntry> {
        let mut entries: Vec<_> = self.entries_rev().collect();
        entries.reverse();
        entries
    }

    /// Applies `action` to the final state and records it.
    ///
    /// Other routes sharing the current state keep their copy untouched.
    pub fn perform_action(&mut self, action: impl Into<Action>) -> Result<Ticks, ActionError> {
        let action = action.into();
        let time = action.apply(Arc::make_mut(&mut self.state), self.total)?;
        self.total += time;
        self.len += 1;
        self.last = Some(Arc::new(HistoryEntry {
            action,
            time,
            cumulative: self.total,
            state: Arc::clone(&self.state),
            prev: self.last.take(),
        }));
        Ok(time)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route ({}):", self.total)?;
        let mut before = &*self.initial;
        for (i, entry) in self.history().into_iter().enumerate() {
            writeln!(f, "  {i}:  {}", entry.describe(before))?;
            before = &entry.state;
        }
        Ok(())
    }
}
