//! Per-search counters.

/// Counters collected by one [`RouteOptimizer::search`] call.
///
/// [`RouteOptimizer::search`]: super::RouteOptimizer::search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Levels the inner tier finished.
    pub levels_solved: u64,
    /// Entered levels the inner tier could not finish.
    pub levels_abandoned: u64,
    pub outer_pops: u64,
    pub inner_pops: u64,
    /// Child routes produced by applying a generated action.
    pub expansions: u64,
    /// Removed frontier entries skipped while popping.
    pub stale_skips: u64,
    /// Candidates equivalent to an earlier point of their own route.
    pub self_loop_prunes: u64,
    /// Candidates that replaced a slower equivalent level state.
    pub dedup_replacements: u64,
    /// Candidates dropped for an equivalent level state that was no slower.
    pub dedup_rejections: u64,
    /// Level solutions that replaced a slower outer route with the same
    /// completed levels and generator state.
    pub merge_replacements: u64,
    /// Level solutions dropped in favor of such a route.
    pub merge_rejections: u64,
}

impl SearchStats {
    pub fn total_pops(&self) -> u64 {
        self.outer_pops + self.inner_pops
    }
}
