//! Reorders the triple patterns of basic graph patterns.
//!
//! The optimiser is independent of the estimation strategy. Any [PatternComparer] can be used to
//! rank patterns. [WeightingComparer] uses a statistics-based [Weightings] model while
//! [StructuralComparer] only looks at which positions of a pattern are bound.

mod comparer;
mod weighting;

pub use comparer::*;
pub use weighting::*;

use crate::transform_up;
use rdf_multiset_common::{OptimizationLevel, QueryOptions};
use rdf_multiset_model::{GraphPattern, NamedNodePattern, TermPattern, TriplePattern};
use rustc_hash::FxHashSet;
use std::convert::Infallible;
use std::sync::Arc;

/// Reorders basic graph patterns such that selective patterns are evaluated first.
#[derive(Clone, Debug)]
pub struct QueryOptimiser {
    comparer: Arc<dyn PatternComparer>,
}

impl QueryOptimiser {
    /// Creates a new optimiser that ranks patterns with `comparer`.
    pub fn new(comparer: Arc<dyn PatternComparer>) -> Self {
        Self { comparer }
    }

    /// Creates the optimiser that is configured by `options`.
    ///
    /// Returns [None] if optimizations are disabled. [OptimizationLevel::Full] falls back to the
    /// structural heuristics if no `weightings` are available.
    pub fn for_options(
        options: &QueryOptions,
        weightings: Option<Arc<Weightings>>,
    ) -> Option<Self> {
        let structural = || -> Arc<dyn PatternComparer> {
            Arc::new(StructuralComparer::new(options.blank_node_mode))
        };
        let comparer = match options.optimization_level {
            OptimizationLevel::None => return None,
            OptimizationLevel::Default => structural(),
            OptimizationLevel::Full => match weightings {
                Some(weightings) => Arc::new(WeightingComparer::new(
                    weightings,
                    options.blank_node_mode,
                )),
                None => structural(),
            },
        };
        Some(Self::new(comparer))
    }

    /// Optimises all basic graph patterns in the tree. Directly joined basic graph patterns are
    /// merged before they are reordered.
    pub fn optimise(&self, pattern: GraphPattern) -> GraphPattern {
        let result = transform_up::<Infallible>(pattern, &mut |pattern| {
            Ok(match pattern {
                GraphPattern::Bgp { patterns } => GraphPattern::Bgp {
                    patterns: self.reorder(patterns),
                },
                GraphPattern::Join { left, right } => match (*left, *right) {
                    (
                        GraphPattern::Bgp { patterns: mut lhs },
                        GraphPattern::Bgp { patterns: rhs },
                    ) => {
                        lhs.extend(rhs);
                        GraphPattern::Bgp {
                            patterns: self.reorder(lhs),
                        }
                    }
                    (left, right) => GraphPattern::Join {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                },
                pattern => pattern,
            })
        });
        match result {
            Ok(pattern) => pattern,
            Err(infallible) => match infallible {},
        }
    }

    /// Reorders the patterns of a single basic graph pattern.
    ///
    /// The patterns are ranked by the comparer. Then, starting with the best pattern, the next
    /// pattern is always the best-ranked pattern that shares a variable with the patterns chosen
    /// so far. Only if no such pattern exists, a disconnected pattern is chosen. This avoids
    /// cross products whenever possible.
    pub fn reorder(&self, patterns: Vec<TriplePattern>) -> Vec<TriplePattern> {
        if patterns.len() < 2 {
            return patterns;
        }

        let mut ranked = patterns.clone();
        ranked.sort_by(|lhs, rhs| self.comparer.compare(lhs, rhs));

        let mut result = Vec::with_capacity(ranked.len());
        let mut bound = FxHashSet::default();
        while !ranked.is_empty() {
            let next = ranked
                .iter()
                .position(|pattern| join_keys(pattern).any(|key| bound.contains(&key)))
                .unwrap_or(0);
            let pattern = ranked.remove(next);
            bound.extend(join_keys(&pattern));
            result.push(pattern);
        }

        if result != patterns {
            tracing::debug!(
                "Reordered basic graph pattern: {}",
                itertools::join(result.iter().map(ToString::to_string), " . ")
            );
        }
        result
    }
}

/// Returns the names of all variables and blank nodes of a pattern. Blank nodes are prefixed such
/// that they can never collide with a variable.
fn join_keys(pattern: &TriplePattern) -> impl Iterator<Item = String> + '_ {
    let term_key = |pattern: &TermPattern| match pattern {
        TermPattern::Variable(v) => Some(v.as_str().to_owned()),
        TermPattern::BlankNode(b) => Some(format!("_:{}", b.as_str())),
        _ => None,
    };
    let predicate = match &pattern.predicate {
        NamedNodePattern::Variable(v) => Some(v.as_str().to_owned()),
        NamedNodePattern::NamedNode(_) => None,
    };
    [term_key(&pattern.subject), predicate, term_key(&pattern.object)]
        .into_iter()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_common::BlankNodeMatchingMode;
    use rdf_multiset_model::vocab::opt;
    use rdf_multiset_model::{integer_literal, Graph, NamedNode, NamedNodeRef, TripleRef, Variable};

    fn var(name: &str) -> TermPattern {
        Variable::new_unchecked(name).into()
    }

    fn iri(value: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex/{value}"))
    }

    fn triple(subject: TermPattern, predicate: NamedNode, object: TermPattern) -> TriplePattern {
        TriplePattern {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    fn render(patterns: &[TriplePattern]) -> String {
        patterns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn weighting_optimiser() -> QueryOptimiser {
        let mut statistics = Graph::new();
        let mut add = |subject: &str, predicate: NamedNodeRef<'_>, count: i64| {
            let subject = iri(subject);
            statistics.insert(TripleRef::new(&subject, predicate, &integer_literal(count)));
        };
        add("type", opt::PREDICATE_COUNT, 100);
        add("name", opt::PREDICATE_COUNT, 50);
        add("alice", opt::SUBJECT_COUNT, 2);
        let weightings = Arc::new(Weightings::from_statistics_graph(&statistics));
        QueryOptimiser::new(Arc::new(WeightingComparer::new(
            weightings,
            BlankNodeMatchingMode::Variable,
        )))
    }

    #[test]
    fn rare_subject_is_evaluated_first() {
        let optimiser = weighting_optimiser();
        let patterns = vec![
            triple(var("s"), iri("type"), var("t")),
            triple(iri("alice").into(), iri("knows"), var("s")),
        ];

        let result = optimiser.reorder(patterns);
        insta::assert_snapshot!(render(&result), @r"
        <http://ex/alice> <http://ex/knows> ?s
        ?s <http://ex/type> ?t
        ");
    }

    #[test]
    fn connected_patterns_are_preferred() {
        let optimiser = weighting_optimiser();
        let patterns = vec![
            triple(var("x"), iri("name"), var("n")),
            triple(var("s"), iri("type"), var("t")),
            triple(iri("alice").into(), iri("knows"), var("s")),
        ];

        let result = optimiser.reorder(patterns);
        insta::assert_snapshot!(render(&result), @r"
        <http://ex/alice> <http://ex/knows> ?s
        ?s <http://ex/type> ?t
        ?x <http://ex/name> ?n
        ");
    }

    #[test]
    fn reordering_is_deterministic() {
        let optimiser = weighting_optimiser();
        let patterns = vec![
            triple(var("a"), iri("p"), var("b")),
            triple(var("b"), iri("p"), var("c")),
            triple(var("c"), iri("q"), var("d")),
            triple(var("a"), iri("q"), var("d")),
        ];
        let mut reversed = patterns.clone();
        reversed.reverse();

        let expected = optimiser.reorder(patterns.clone());
        for _ in 0..10 {
            assert_eq!(optimiser.reorder(patterns.clone()), expected);
        }
        assert_eq!(optimiser.reorder(reversed), expected);
    }

    #[test]
    fn structural_comparer_follows_bound_positions() {
        let optimiser = QueryOptimiser::new(Arc::new(StructuralComparer::default()));
        let patterns = vec![
            triple(var("s"), iri("p"), var("o")),
            triple(var("s"), iri("p"), iri("o").into()),
        ];

        let result = optimiser.reorder(patterns);
        insta::assert_snapshot!(render(&result), @r"
        ?s <http://ex/p> <http://ex/o>
        ?s <http://ex/p> ?o
        ");
    }

    #[test]
    fn merges_joined_basic_graph_patterns() {
        let optimiser = QueryOptimiser::new(Arc::new(StructuralComparer::default()));
        let pattern = GraphPattern::Join {
            left: Box::new(GraphPattern::Bgp {
                patterns: vec![triple(var("s"), iri("p"), var("o"))],
            }),
            right: Box::new(GraphPattern::Bgp {
                patterns: vec![triple(var("s"), iri("p"), iri("o").into())],
            }),
        };

        let GraphPattern::Bgp { patterns } = optimiser.optimise(pattern) else {
            panic!("Expected a basic graph pattern.");
        };
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].to_string(), "?s <http://ex/p> <http://ex/o>");
    }

    #[test]
    fn disabled_optimizations_create_no_optimiser() {
        let options =
            QueryOptions::default().with_optimization_level(OptimizationLevel::None);
        assert!(QueryOptimiser::for_options(&options, None).is_none());
    }
}
