//! Optimizer configuration.

/// Which estimator orders the search frontiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum HeuristicKind {
    /// Remaining-level sums plus per-level objective counts.
    #[default]
    SlightlyBetter,
    /// Baseline that ignores unfinished levels entirely.
    Underestimating,
}

/// Which generator proposes actions from each state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum GeneratorKind {
    /// Every feasible action.
    #[default]
    Default,
    /// Restricts hub choices to the natural level order.
    NaturalOrder,
}

/// Search limits and strategy selection shared by both search tiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Number of complete routes to collect before stopping.
    pub max_routes: usize,
    /// Maximum frontier pops per tier invocation. `None` means unbounded.
    pub node_budget: Option<u64>,
    pub heuristic: HeuristicKind,
    pub generator: GeneratorKind,
}

impl OptimizerConfig {
    pub const DEFAULT_MAX_ROUTES: usize = 10;

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }

    pub fn with_node_budget(mut self, node_budget: Option<u64>) -> Self {
        self.node_budget = node_budget;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// True once `pops` frontier pops have used up the budget.
    pub fn budget_exhausted(&self, pops: u64) -> bool {
        self.node_budget.is_some_and(|budget| pops >= budget)
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_routes: Self::DEFAULT_MAX_ROUTES,
            node_budget: None,
            heuristic: HeuristicKind::default(),
            generator: GeneratorKind::default(),
        }
    }
}
