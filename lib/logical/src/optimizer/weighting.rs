use crate::patterns::PatternShape;
use rdf_multiset_model::vocab::{opt, xsd};
use rdf_multiset_model::{is_integer_datatype, Graph, Literal, NamedNodeRef, TermRef, TripleRef};
use rustc_hash::FxHashMap;

/// Computes the weight of a term that has been observed `count` times.
///
/// Frequent terms have a weight close to 1 while rare terms have a weight close to 0. The weight
/// never drops below [f64::EPSILON] such that products of weights stay comparable.
pub fn weight(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss, reason = "Counts are estimates")]
    let count = count.max(1) as f64;
    (1.0 - 1.0 / count).max(f64::EPSILON)
}

/// The weights that are used for terms without statistics and for variables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefaultWeights {
    pub subject: f64,
    pub predicate: f64,
    pub object: f64,
    pub variable: f64,
}

impl DefaultWeights {
    /// Clamps all weights to `(EPSILON, 1]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |value: f64| {
            if value.is_nan() {
                1.0
            } else {
                value.clamp(f64::EPSILON, 1.0)
            }
        };
        Self {
            subject: clamp(self.subject),
            predicate: clamp(self.predicate),
            object: clamp(self.object),
            variable: clamp(self.variable),
        }
    }
}

impl Default for DefaultWeights {
    fn default() -> Self {
        Self {
            subject: 0.8,
            predicate: 0.4,
            object: 0.6,
            variable: 1.0,
        }
    }
}

/// A selectivity model for triple patterns.
///
/// The model stores how often a term occurs in each position of the triples of a dataset. A
/// pattern that binds rare terms is more selective and should therefore be evaluated earlier.
///
/// The model is read-only after construction and can be shared between queries.
#[derive(Clone, Debug, Default)]
pub struct Weightings {
    subject_counts: TermCounts,
    predicate_counts: TermCounts,
    object_counts: TermCounts,
    defaults: DefaultWeights,
}

impl Weightings {
    /// Creates an empty model with the given defaults.
    pub fn with_defaults(defaults: DefaultWeights) -> Self {
        Self {
            defaults: defaults.clamped(),
            ..Self::default()
        }
    }

    /// Creates a model from a statistics graph (see [Weightings::add_statistics]).
    pub fn from_statistics_graph(graph: &Graph) -> Self {
        let mut weightings = Self::default();
        weightings.add_statistics(graph);
        weightings
    }

    /// Adds the counts of a statistics graph to this model.
    ///
    /// The graph contains triples of the form `term opt:subjectCount n` (similarly for
    /// `opt:predicateCount` and `opt:objectCount`). `opt:count` applies to all three positions.
    /// If a term receives multiple counts for the same position, the maximum wins. Triples with a
    /// count that is not a non-negative integer are skipped.
    pub fn add_statistics(&mut self, graph: &Graph) {
        let mut loaded = 0_usize;
        for triple in graph.iter() {
            if let Some(count) = statistics_count(triple) {
                let term = TermRef::from(triple.subject);
                let predicate = triple.predicate;
                if predicate == opt::SUBJECT_COUNT {
                    self.record_subject_count(term, count);
                } else if predicate == opt::PREDICATE_COUNT {
                    self.record_predicate_count(term, count);
                } else if predicate == opt::OBJECT_COUNT {
                    self.record_object_count(term, count);
                } else {
                    self.record_subject_count(term, count);
                    self.record_predicate_count(term, count);
                    self.record_object_count(term, count);
                }
                loaded += 1;
            }
        }
        tracing::debug!("Loaded {loaded} weightings from statistics graph.");
    }

    pub fn record_subject_count(&mut self, term: TermRef<'_>, count: u64) {
        self.subject_counts.record_max(term, count);
    }

    pub fn record_predicate_count(&mut self, term: TermRef<'_>, count: u64) {
        self.predicate_counts.record_max(term, count);
    }

    pub fn record_object_count(&mut self, term: TermRef<'_>, count: u64) {
        self.object_counts.record_max(term, count);
    }

    pub fn defaults(&self) -> &DefaultWeights {
        &self.defaults
    }

    pub fn subject_weight(&self, term: TermRef<'_>) -> f64 {
        self.subject_counts.get(term).map_or(self.defaults.subject, weight)
    }

    pub fn predicate_weight(&self, term: NamedNodeRef<'_>) -> f64 {
        self.predicate_counts.get(term.into()).map_or(self.defaults.predicate, weight)
    }

    pub fn object_weight(&self, term: TermRef<'_>) -> f64 {
        self.object_counts.get(term).map_or(self.defaults.object, weight)
    }

    pub fn variable_weight(&self) -> f64 {
        self.defaults.variable
    }

    /// Computes the selectivity score of a pattern. Lower scores are more selective.
    pub fn pattern_selectivity(&self, shape: &PatternShape<'_>) -> f64 {
        let variable = self.variable_weight();
        match *shape {
            PatternShape::AllVariables => variable * variable * variable,
            PatternShape::Subject(s) => self.subject_weight(s) * variable * variable,
            PatternShape::Predicate(p) => variable * self.predicate_weight(p) * variable,
            PatternShape::Object(o) => variable * variable * self.object_weight(o),
            PatternShape::SubjectPredicate(s, p) => {
                self.subject_weight(s) * self.predicate_weight(p) * variable
            }
            PatternShape::SubjectObject(s, o) => {
                self.subject_weight(s) * variable * self.object_weight(o)
            }
            PatternShape::PredicateObject(p, o) => {
                variable * self.predicate_weight(p) * self.object_weight(o)
            }
            PatternShape::NoVariables(s, p, o) => {
                self.subject_weight(s) * self.predicate_weight(p) * self.object_weight(o)
            }
        }
    }
}

/// Extracts the count of a statistics triple. Logs and skips malformed statistics.
fn statistics_count(triple: TripleRef<'_>) -> Option<u64> {
    let predicate = triple.predicate;
    if predicate != opt::SUBJECT_COUNT
        && predicate != opt::PREDICATE_COUNT
        && predicate != opt::OBJECT_COUNT
        && predicate != opt::COUNT
    {
        return None;
    }

    let count = match triple.object {
        TermRef::Literal(literal)
            if is_integer_datatype(literal.datatype()) || literal.datatype() == xsd::STRING =>
        {
            literal.value().trim().parse::<u64>().ok()
        }
        _ => None,
    };
    if count.is_none() {
        tracing::warn!("Skipping malformed statistics triple: {triple}");
    }
    count
}

/// The counts of the terms in one position. Lookups do not allocate.
#[derive(Clone, Debug, Default)]
struct TermCounts {
    named_nodes: FxHashMap<String, u64>,
    blank_nodes: FxHashMap<String, u64>,
    /// Literals grouped by their lexical form.
    literals: FxHashMap<String, Vec<(Literal, u64)>>,
}

impl TermCounts {
    fn record_max(&mut self, term: TermRef<'_>, count: u64) {
        let entry = match term {
            TermRef::NamedNode(node) => {
                self.named_nodes.entry(node.as_str().to_owned()).or_default()
            }
            TermRef::BlankNode(node) => {
                self.blank_nodes.entry(node.as_str().to_owned()).or_default()
            }
            TermRef::Literal(literal) => {
                let candidates = self.literals.entry(literal.value().to_owned()).or_default();
                let position = match candidates
                    .iter()
                    .position(|(candidate, _)| candidate.as_ref() == literal)
                {
                    Some(position) => position,
                    None => {
                        candidates.push((literal.into_owned(), 0));
                        candidates.len() - 1
                    }
                };
                &mut candidates[position].1
            }
        };
        *entry = (*entry).max(count);
    }

    fn get(&self, term: TermRef<'_>) -> Option<u64> {
        match term {
            TermRef::NamedNode(node) => self.named_nodes.get(node.as_str()).copied(),
            TermRef::BlankNode(node) => self.blank_nodes.get(node.as_str()).copied(),
            TermRef::Literal(literal) => self
                .literals
                .get(literal.value())?
                .iter()
                .find(|(candidate, _)| candidate.as_ref() == literal)
                .map(|(_, count)| *count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_common::BlankNodeMatchingMode;
    use rdf_multiset_model::{integer_literal, Literal, NamedNode, TriplePattern, Variable};

    fn statistics(triples: &[(&str, NamedNodeRef<'_>, Literal)]) -> Graph {
        let mut graph = Graph::new();
        for (subject, predicate, count) in triples {
            graph.insert(TripleRef::new(
                NamedNodeRef::new_unchecked(subject),
                *predicate,
                count,
            ));
        }
        graph
    }

    #[test]
    fn weight_is_monotonic() {
        let weights = (1..100).map(weight).collect::<Vec<_>>();
        assert!(weights.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(weight(0), f64::EPSILON);
        assert_eq!(weight(1), f64::EPSILON);
        assert!((weight(2) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn defaults_are_clamped() {
        let weightings = Weightings::with_defaults(DefaultWeights {
            subject: 0.0,
            predicate: 2.0,
            object: -1.0,
            variable: f64::NAN,
        });
        assert_eq!(
            *weightings.defaults(),
            DefaultWeights {
                subject: f64::EPSILON,
                predicate: 1.0,
                object: f64::EPSILON,
                variable: 1.0,
            }
        );
    }

    #[test]
    fn predicate_pattern_score() {
        let weightings = Weightings::from_statistics_graph(&statistics(&[(
            "http://ex/p",
            opt::PREDICATE_COUNT,
            integer_literal(100),
        )]));
        let pattern = TriplePattern {
            subject: Variable::new_unchecked("s").into(),
            predicate: NamedNode::new_unchecked("http://ex/p").into(),
            object: Variable::new_unchecked("o").into(),
        };

        let score = weightings
            .pattern_selectivity(&PatternShape::of(&pattern, BlankNodeMatchingMode::Variable));
        assert!((score - 0.99).abs() < 1e-9);
    }

    #[test]
    fn maximum_count_wins() {
        let weightings = Weightings::from_statistics_graph(&statistics(&[
            ("http://ex/s", opt::SUBJECT_COUNT, integer_literal(10)),
            ("http://ex/s", opt::SUBJECT_COUNT, integer_literal(4)),
        ]));
        let subject = NamedNodeRef::new_unchecked("http://ex/s");
        assert!((weightings.subject_weight(subject.into()) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn combined_count_applies_to_all_positions() {
        let weightings = Weightings::from_statistics_graph(&statistics(&[(
            "http://ex/t",
            opt::COUNT,
            integer_literal(2),
        )]));
        let term = NamedNodeRef::new_unchecked("http://ex/t");
        assert!((weightings.subject_weight(term.into()) - 0.5).abs() < 1e-9);
        assert!((weightings.predicate_weight(term) - 0.5).abs() < 1e-9);
        assert!((weightings.object_weight(term.into()) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn malformed_counts_are_skipped() {
        let weightings = Weightings::from_statistics_graph(&statistics(&[
            ("http://ex/s", opt::SUBJECT_COUNT, Literal::new_simple_literal("many")),
            ("http://ex/o", opt::OBJECT_COUNT, integer_literal(-3)),
        ]));
        let subject = NamedNodeRef::new_unchecked("http://ex/s");
        let object = NamedNodeRef::new_unchecked("http://ex/o");
        assert_eq!(weightings.subject_weight(subject.into()), 0.8);
        assert_eq!(weightings.object_weight(object.into()), 0.6);
    }

    #[test]
    fn counts_distinguish_terms_with_the_same_lexical_form() {
        let mut weightings = Weightings::default();
        let typed = integer_literal(7);
        let plain = Literal::new_simple_literal("7");
        weightings.record_object_count(typed.as_ref().into(), 2);
        weightings.record_object_count(plain.as_ref().into(), 10);
        weightings.record_object_count(NamedNodeRef::new_unchecked("7").into(), 4);

        assert!((weightings.object_weight(typed.as_ref().into()) - 0.5).abs() < 1e-9);
        assert!((weightings.object_weight(plain.as_ref().into()) - 0.9).abs() < 1e-9);
        assert!(
            (weightings.object_weight(NamedNodeRef::new_unchecked("7").into()) - 0.75).abs() < 1e-9
        );
        let blank = rdf_multiset_model::BlankNode::new_unchecked("7");
        assert_eq!(weightings.object_weight(blank.as_ref().into()), 0.6);
    }

    #[test]
    fn unseen_terms_use_defaults() {
        let weightings = Weightings::default();
        let term = NamedNodeRef::new_unchecked("http://ex/unknown");
        assert_eq!(weightings.subject_weight(term.into()), 0.8);
        assert_eq!(weightings.predicate_weight(term), 0.4);
        assert_eq!(weightings.object_weight(term.into()), 0.6);
        assert_eq!(weightings.variable_weight(), 1.0);
    }
}
