use crate::BlankNodeMatchingMode;
use std::time::Duration;

/// Defines how many optimizations the query optimizer should apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OptimizationLevel {
    /// No optimizations. Basic graph patterns are evaluated in the order in which they are
    /// written.
    None,
    /// Reorders basic graph patterns based on the shape of the triple patterns.
    Default,
    /// Reorders basic graph patterns based on collected statistics, if available. Falls back to
    /// [OptimizationLevel::Default] otherwise.
    #[default]
    Full,
}

/// Options for SPARQL query evaluation.
///
/// The options are passed explicitly to every component that needs them. There is no global
/// configuration.
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// The defined optimization level
    pub optimization_level: OptimizationLevel,
    /// Whether every quad returned by the storage is checked again against the pattern that
    /// requested it. Useful for storages that over-approximate matches.
    pub rigorous_evaluation: bool,
    /// Whether, by default, queries match against all graphs.
    pub union_default_graph: bool,
    /// How blank nodes in triple patterns are matched.
    pub blank_node_mode: BlankNodeMatchingMode,
    /// The deadline of the evaluation. Checked between the evaluation of two algebra nodes.
    pub timeout: Option<Duration>,
}

impl QueryOptions {
    #[must_use]
    pub fn with_optimization_level(mut self, optimization_level: OptimizationLevel) -> Self {
        self.optimization_level = optimization_level;
        self
    }

    #[must_use]
    pub fn with_rigorous_evaluation(mut self, rigorous_evaluation: bool) -> Self {
        self.rigorous_evaluation = rigorous_evaluation;
        self
    }

    #[must_use]
    pub fn with_union_default_graph(mut self, union_default_graph: bool) -> Self {
        self.union_default_graph = union_default_graph;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
