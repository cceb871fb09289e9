//! Evaluation of SPARQL queries over a [TripleSource].
//!
//! The algebra tree is first prepared (property paths are lowered and basic graph patterns are
//! reordered) and then evaluated bottom-up into [Multiset]s.

mod context;
mod group;
mod path;
mod pattern;
mod variables;

use crate::results::{QueryResults, QuerySolutions};
use crate::Multiset;
use pattern::PatternEvaluator;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::{QueryOptions, TripleSource};
use rdf_multiset_logical::optimizer::{QueryOptimiser, Weightings};
use rdf_multiset_logical::paths::lower_paths;
use rdf_multiset_model::{
    BlankNode, GraphPattern, Iri, NamedNodePattern, Query, QueryDataset, Subject, Term,
    TermPattern, Triple, TriplePattern, Variable,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Evaluates SPARQL queries against a [TripleSource].
///
/// The evaluator is cheap to create. It does not cache anything between two queries.
pub struct QueryEvaluator<'a> {
    source: &'a dyn TripleSource,
    options: QueryOptions,
    weightings: Option<Arc<Weightings>>,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(source: &'a dyn TripleSource, options: QueryOptions) -> Self {
        Self {
            source,
            options,
            weightings: None,
        }
    }

    /// Uses `weightings` to reorder basic graph patterns if the optimization level allows it.
    #[must_use]
    pub fn with_weightings(mut self, weightings: Arc<Weightings>) -> Self {
        self.weightings = Some(weightings);
        self
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Lowers the property paths of `pattern` and reorders its basic graph patterns.
    pub fn prepare(&self, pattern: GraphPattern) -> Result<GraphPattern, QueryEvaluationError> {
        let pattern = lower_paths(pattern)?;
        let optimiser = QueryOptimiser::for_options(&self.options, self.weightings.clone());
        Ok(match optimiser {
            Some(optimiser) => optimiser.optimise(pattern),
            None => pattern,
        })
    }

    /// Evaluates `query`.
    pub fn evaluate(&self, query: &Query) -> Result<QueryResults, QueryEvaluationError> {
        match query {
            Query::Select {
                dataset,
                pattern,
                base_iri,
            } => {
                let variables = result_variables(pattern);
                let evaluator = self.pattern_evaluator(dataset.as_ref(), base_iri);
                let solutions = evaluator
                    .evaluate_query(&self.prepare(pattern.clone())?)?
                    .project(&variables);
                let rows = solutions.iter().map(|(_, values)| values.to_vec()).collect();
                Ok(QueryResults::Solutions(QuerySolutions::new(
                    variables.into(),
                    rows,
                )))
            }
            Query::Ask {
                dataset,
                pattern,
                base_iri,
            } => {
                let evaluator = self.pattern_evaluator(dataset.as_ref(), base_iri);
                let solutions = evaluator.evaluate(&self.prepare(pattern.clone())?)?;
                Ok(QueryResults::Boolean(!solutions.is_empty()))
            }
            Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            } => {
                let evaluator = self.pattern_evaluator(dataset.as_ref(), base_iri);
                let solutions = evaluator.evaluate(&self.prepare(pattern.clone())?)?;
                Ok(QueryResults::Graph(construct(template, &solutions)))
            }
            Query::Describe {
                dataset,
                pattern,
                base_iri,
            } => {
                let evaluator = self.pattern_evaluator(dataset.as_ref(), base_iri);
                let solutions = evaluator.evaluate_query(&self.prepare(pattern.clone())?)?;
                Ok(QueryResults::Graph(describe(&evaluator, &solutions)?))
            }
        }
    }

    fn pattern_evaluator(
        &self,
        dataset: Option<&QueryDataset>,
        base_iri: &Option<Iri<String>>,
    ) -> PatternEvaluator<'_> {
        PatternEvaluator::new(self.source, &self.options, dataset, base_iri.clone())
    }
}

/// The variables of the solutions of a SELECT query.
fn result_variables(pattern: &GraphPattern) -> Vec<Variable> {
    match pattern {
        GraphPattern::Project { variables, .. } => variables.clone(),
        GraphPattern::Slice { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::OrderBy { inner, .. } => result_variables(inner),
        _ => {
            let mut variables = Vec::new();
            pattern.on_in_scope_variable(|variable| {
                if !variables.contains(variable) {
                    variables.push(variable.clone());
                }
            });
            variables
        }
    }
}

/// Instantiates the `template` for every solution. Blank nodes of the template are replaced
/// with fresh blank nodes per solution. Triples that would be invalid are skipped.
fn construct(template: &[TriplePattern], solutions: &Multiset) -> Vec<Triple> {
    let mut seen = FxHashSet::default();
    let mut result = Vec::new();
    for (id, _) in solutions.iter() {
        let mut blank_nodes = FxHashMap::default();
        for pattern in template {
            let mut instantiate = |pattern: &TermPattern| -> Option<Term> {
                match pattern {
                    TermPattern::NamedNode(node) => Some(node.clone().into()),
                    TermPattern::Literal(literal) => Some(literal.clone().into()),
                    TermPattern::BlankNode(node) => Some(
                        blank_nodes
                            .entry(node.clone())
                            .or_insert_with(BlankNode::default)
                            .clone()
                            .into(),
                    ),
                    TermPattern::Variable(variable) => {
                        solutions.get(id, variable.as_ref()).cloned()
                    }
                }
            };

            let subject = match instantiate(&pattern.subject) {
                Some(Term::NamedNode(node)) => Subject::NamedNode(node),
                Some(Term::BlankNode(node)) => Subject::BlankNode(node),
                _ => continue,
            };
            let predicate = match &pattern.predicate {
                NamedNodePattern::NamedNode(node) => node.clone(),
                NamedNodePattern::Variable(variable) => {
                    match solutions.get(id, variable.as_ref()) {
                        Some(Term::NamedNode(node)) => node.clone(),
                        _ => continue,
                    }
                }
            };
            let Some(object) = instantiate(&pattern.object) else {
                continue;
            };

            let triple = Triple::new(subject, predicate, object);
            if seen.insert(triple.clone()) {
                result.push(triple);
            }
        }
    }
    result
}

/// Returns the outgoing triples of all IRIs and blank nodes that are bound in `solutions`.
fn describe(
    evaluator: &PatternEvaluator<'_>,
    solutions: &Multiset,
) -> Result<Vec<Triple>, QueryEvaluationError> {
    let mut described = FxHashSet::default();
    let mut seen = FxHashSet::default();
    let mut result = Vec::new();
    for (_, values) in solutions.iter() {
        for value in values.iter().flatten() {
            let subject = match value {
                Term::NamedNode(node) => Subject::NamedNode(node.clone()),
                Term::BlankNode(node) => Subject::BlankNode(node.clone()),
                Term::Literal(_) => continue,
            };
            if !described.insert(subject.clone()) {
                continue;
            }
            for triple in evaluator.triples(Some(&Term::from(subject)), None, None)? {
                if seen.insert(triple.clone()) {
                    result.push(triple);
                }
            }
        }
    }
    Ok(result)
}
