use crate::optimizer::Weightings;
use crate::patterns::PatternShape;
use rdf_multiset_common::BlankNodeMatchingMode;
use rdf_multiset_model::{fast_cmp_terms, NamedNodePattern, TermPattern, TermRef, TriplePattern};
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

/// Decides which of two triple patterns should be evaluated first.
///
/// Implementations must provide a total order. Patterns that are ordered [Ordering::Less] are
/// evaluated earlier.
pub trait PatternComparer: Debug + Send + Sync {
    fn compare(&self, lhs: &TriplePattern, rhs: &TriplePattern) -> Ordering;
}

/// Orders patterns by the structural heuristics of Oxigraph's join reordering. Does not require
/// any statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructuralComparer {
    blank_node_mode: BlankNodeMatchingMode,
}

impl StructuralComparer {
    pub fn new(blank_node_mode: BlankNodeMatchingMode) -> Self {
        Self { blank_node_mode }
    }

    /// Estimates the cardinality of a single triple pattern.
    pub fn estimate_cardinality(&self, pattern: &TriplePattern) -> usize {
        match PatternShape::of(pattern, self.blank_node_mode) {
            PatternShape::NoVariables(..) => 1,
            PatternShape::SubjectPredicate(..) => 10,
            PatternShape::SubjectObject(..) => 2,
            PatternShape::PredicateObject(..) => 10_000,
            PatternShape::Subject(_) => 100,
            PatternShape::AllVariables => 1_000_000_000,
            PatternShape::Predicate(_) => 1_000_000,
            PatternShape::Object(_) => 100_000,
        }
    }
}

impl PatternComparer for StructuralComparer {
    fn compare(&self, lhs: &TriplePattern, rhs: &TriplePattern) -> Ordering {
        self.estimate_cardinality(lhs)
            .cmp(&self.estimate_cardinality(rhs))
            .then_with(|| cmp_patterns_lexically(lhs, rhs))
    }
}

/// Orders patterns ascending by their selectivity score in a [Weightings] model.
#[derive(Clone, Debug)]
pub struct WeightingComparer {
    weightings: Arc<Weightings>,
    blank_node_mode: BlankNodeMatchingMode,
}

impl WeightingComparer {
    pub fn new(weightings: Arc<Weightings>, blank_node_mode: BlankNodeMatchingMode) -> Self {
        Self {
            weightings,
            blank_node_mode,
        }
    }

    pub fn score(&self, pattern: &TriplePattern) -> f64 {
        self.weightings
            .pattern_selectivity(&PatternShape::of(pattern, self.blank_node_mode))
    }
}

impl PatternComparer for WeightingComparer {
    fn compare(&self, lhs: &TriplePattern, rhs: &TriplePattern) -> Ordering {
        self.score(lhs)
            .total_cmp(&self.score(rhs))
            .then_with(|| cmp_patterns_lexically(lhs, rhs))
    }
}

/// A deterministic tie-break between patterns.
///
/// Patterns with fewer variables come first. Then, the positions are compared one after another.
/// Variables sort before terms and are ordered by their name.
pub fn cmp_patterns_lexically(lhs: &TriplePattern, rhs: &TriplePattern) -> Ordering {
    variable_count(lhs)
        .cmp(&variable_count(rhs))
        .then_with(|| cmp_term_patterns(&lhs.subject, &rhs.subject))
        .then_with(|| cmp_named_node_patterns(&lhs.predicate, &rhs.predicate))
        .then_with(|| cmp_term_patterns(&lhs.object, &rhs.object))
}

fn variable_count(pattern: &TriplePattern) -> usize {
    let subject = matches!(
        pattern.subject,
        TermPattern::Variable(_) | TermPattern::BlankNode(_)
    );
    let predicate = matches!(pattern.predicate, NamedNodePattern::Variable(_));
    let object = matches!(
        pattern.object,
        TermPattern::Variable(_) | TermPattern::BlankNode(_)
    );
    usize::from(subject) + usize::from(predicate) + usize::from(object)
}

fn cmp_term_patterns(lhs: &TermPattern, rhs: &TermPattern) -> Ordering {
    match (lhs, rhs) {
        (TermPattern::Variable(lhs), TermPattern::Variable(rhs)) => lhs.as_str().cmp(rhs.as_str()),
        (TermPattern::Variable(_), _) => Ordering::Less,
        (_, TermPattern::Variable(_)) => Ordering::Greater,
        (lhs, rhs) => fast_cmp_terms(pattern_term(lhs), pattern_term(rhs)),
    }
}

fn cmp_named_node_patterns(lhs: &NamedNodePattern, rhs: &NamedNodePattern) -> Ordering {
    match (lhs, rhs) {
        (NamedNodePattern::Variable(lhs), NamedNodePattern::Variable(rhs)) => {
            lhs.as_str().cmp(rhs.as_str())
        }
        (NamedNodePattern::Variable(_), NamedNodePattern::NamedNode(_)) => Ordering::Less,
        (NamedNodePattern::NamedNode(_), NamedNodePattern::Variable(_)) => Ordering::Greater,
        (NamedNodePattern::NamedNode(lhs), NamedNodePattern::NamedNode(rhs)) => {
            lhs.as_str().cmp(rhs.as_str())
        }
    }
}

fn pattern_term(pattern: &TermPattern) -> Option<TermRef<'_>> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.as_ref().into()),
        TermPattern::BlankNode(node) => Some(node.as_ref().into()),
        TermPattern::Literal(literal) => Some(literal.as_ref().into()),
        _ => None,
    }
}
