use crate::eval::context::{ExistsCache, PatternContext};
use crate::Multiset;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::{
    BindingId, BlankNodeMatchingMode, QueryOptions, TripleSource, BLANK_NODE_VARIABLE_PREFIX,
};
use rdf_multiset_functions::{ExprValue, ExpressionEvaluator};
use rdf_multiset_logical::ActiveGraph;
use rdf_multiset_model::{
    cmp_terms, Expression, GraphNameRef, GraphPattern, GroundTerm, Iri, NamedNode,
    NamedNodePattern, NamedNodeRef, NamedOrBlankNode, OrderExpression, Quad, QueryDataset,
    SubjectRef, Term, TermPattern, TermRef, Triple, TriplePattern, Variable,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The state of the evaluation that changes while descending into the algebra tree.
#[derive(Clone, Debug, Default)]
struct EvaluationState {
    active_graph: ActiveGraph,
}

/// Either a term or a variable that is looked up in the current solution.
pub(super) enum PatternTerm {
    Constant(Term),
    Variable(Variable),
}

/// Evaluates the graph patterns of a single query.
pub(super) struct PatternEvaluator<'a> {
    source: &'a dyn TripleSource,
    options: &'a QueryOptions,
    pub(super) expressions: ExpressionEvaluator,
    /// The graphs of a `FROM NAMED` clause. [None] if all named graphs are available.
    named_graphs: Option<Vec<NamedOrBlankNode>>,
    deadline: Option<(Instant, Duration)>,
    state: RefCell<EvaluationState>,
    /// A solution whose values are substituted into every leaf of the pattern. Used for the
    /// patterns of `EXISTS` that read variables of the filtered solution.
    seed: Option<Multiset>,
}

impl<'a> PatternEvaluator<'a> {
    pub(super) fn new(
        source: &'a dyn TripleSource,
        options: &'a QueryOptions,
        dataset: Option<&QueryDataset>,
        base_iri: Option<Iri<String>>,
    ) -> Self {
        let active_graph = ActiveGraph::for_dataset(dataset, options.union_default_graph);
        let named_graphs = dataset.map(|dataset| {
            dataset
                .named
                .iter()
                .flatten()
                .cloned()
                .map(NamedOrBlankNode::NamedNode)
                .collect()
        });
        Self {
            source,
            options,
            expressions: ExpressionEvaluator::new(base_iri),
            named_graphs,
            deadline: options
                .timeout
                .map(|timeout| (Instant::now() + timeout, timeout)),
            state: RefCell::new(EvaluationState { active_graph }),
            seed: None,
        }
    }

    /// Creates an evaluator that shares the dataset, the deadline and the active graph with this
    /// evaluator but substitutes `seed` into the leaves of the evaluated pattern.
    pub(super) fn seeded(&self, seed: Option<Multiset>) -> Self {
        Self {
            source: self.source,
            options: self.options,
            expressions: self.expressions.clone(),
            named_graphs: self.named_graphs.clone(),
            deadline: self.deadline,
            state: RefCell::new(self.state.borrow().clone()),
            seed,
        }
    }

    /// Creates an evaluator for a sub-query that projects `variables`. Only the projected
    /// variables of the seed are visible inside the sub-query.
    fn nested(&self, variables: &[Variable]) -> Self {
        self.seeded(self.seed.clone().map(|seed| seed.project(variables)))
    }

    /// Joins a leaf of the pattern with the seed.
    fn with_seed(&self, solutions: Multiset) -> Multiset {
        match &self.seed {
            Some(seed) => seed.clone().join(solutions),
            None => solutions,
        }
    }

    /// Evaluates the pattern of a SELECT or DESCRIBE query.
    ///
    /// The outermost projection is the projection of the query itself. Projections below it
    /// belong to sub-queries.
    pub(super) fn evaluate_query(
        &self,
        pattern: &GraphPattern,
    ) -> Result<Multiset, QueryEvaluationError> {
        match pattern {
            GraphPattern::Project { inner, variables } => {
                Ok(self.evaluate(inner)?.project(variables))
            }
            GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner } => {
                Ok(self.evaluate_query(inner)?.distinct())
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => Ok(self.evaluate_query(inner)?.slice(*start, *length)),
            _ => self.evaluate(pattern),
        }
    }

    pub(super) fn blank_node_mode(&self) -> BlankNodeMatchingMode {
        self.options.blank_node_mode
    }

    /// Evaluates `pattern` into a new multiset.
    pub(super) fn evaluate(&self, pattern: &GraphPattern) -> Result<Multiset, QueryEvaluationError> {
        self.check_deadline()?;
        trace!(
            operator = operator_name(pattern),
            active_graph = %self.state.borrow().active_graph,
            "Evaluating algebra node"
        );

        match pattern {
            GraphPattern::Bgp { patterns } => self.evaluate_bgp(patterns),
            GraphPattern::Path {
                subject,
                path,
                object,
            } => Ok(self.with_seed(self.evaluate_path(subject, path, object)?)),
            GraphPattern::Join { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(left.join(right))
            }
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let exists = ExistsCache::default();
                left.left_join(right, |multiset, id| match expression {
                    Some(expression) => self.is_true(multiset, &exists, id, expression),
                    None => Ok(true),
                })
            }
            GraphPattern::Filter { expr, inner } => {
                let inner = self.evaluate(inner)?;
                let exists = ExistsCache::default();
                inner.filter(|multiset, id| self.is_true(multiset, &exists, id, expr))
            }
            GraphPattern::Union { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(left.union(right))
            }
            GraphPattern::Graph { name, inner } => self.evaluate_graph(name, inner),
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => {
                let inner = self.evaluate(inner)?;
                let exists = ExistsCache::default();
                inner.extend(variable.clone(), |multiset, id| {
                    let context = PatternContext::new(self, multiset, &exists);
                    Ok(match self.expressions.evaluate(&context, id, expression)? {
                        ExprValue::Bound(term) => Some(term),
                        ExprValue::Unbound | ExprValue::Error => None,
                    })
                })
            }
            GraphPattern::Minus { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(left.minus(&right))
            }
            GraphPattern::Values {
                variables,
                bindings,
            } => Ok(self.with_seed(Multiset::from_rows(
                variables.clone(),
                bindings.iter().map(|row| {
                    row.iter()
                        .map(|value| value.clone().map(ground_term))
                        .collect()
                }),
            ))),
            GraphPattern::OrderBy { inner, expression } => {
                let inner = self.evaluate(inner)?;
                self.evaluate_order_by(inner, expression)
            }
            GraphPattern::Project { inner, variables } => {
                debug!(
                    variables = %itertools::join(variables, " "),
                    "Evaluating sub-query"
                );
                let nested = self.nested(variables);
                let inner = nested
                    .evaluate(inner)
                    .map_err(QueryEvaluationError::in_sub_query)?;
                Ok(inner.project(variables))
            }
            GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner } => {
                Ok(self.evaluate(inner)?.distinct())
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => Ok(self.evaluate(inner)?.slice(*start, *length)),
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => self.evaluate_group(inner, variables, aggregates),
            GraphPattern::Service { name, .. } => {
                QueryEvaluationError::not_implemented(format!("SERVICE {name}"))
            }
        }
    }

    /// Returns true if the effective boolean value of `expression` is true for the solution.
    pub(super) fn is_true(
        &self,
        multiset: &Multiset,
        exists: &ExistsCache,
        id: BindingId,
        expression: &Expression,
    ) -> Result<bool, QueryEvaluationError> {
        let context = PatternContext::new(self, multiset, exists);
        Ok(self
            .expressions
            .effective_boolean_value(&context, id, expression)?
            == Ok(true))
    }

    fn check_deadline(&self) -> Result<(), QueryEvaluationError> {
        match self.deadline {
            Some((deadline, timeout)) if Instant::now() >= deadline => {
                Err(QueryEvaluationError::Timeout(timeout))
            }
            _ => Ok(()),
        }
    }

    /// Evaluates a basic graph pattern by matching one triple pattern after another. The
    /// patterns are matched in the given order with the values of the solutions so far, starting
    /// with the seed.
    fn evaluate_bgp(&self, patterns: &[TriplePattern]) -> Result<Multiset, QueryEvaluationError> {
        let mut result = self.seed.clone().unwrap_or(Multiset::Identity);
        for pattern in patterns {
            result = self.match_triple_pattern(&result, pattern)?;
        }
        Ok(result)
    }

    fn match_triple_pattern(
        &self,
        input: &Multiset,
        pattern: &TriplePattern,
    ) -> Result<Multiset, QueryEvaluationError> {
        let subject = self.pattern_term(&pattern.subject);
        let predicate = match &pattern.predicate {
            NamedNodePattern::NamedNode(node) => PatternTerm::Constant(node.clone().into()),
            NamedNodePattern::Variable(variable) => PatternTerm::Variable(variable.clone()),
        };
        let object = self.pattern_term(&pattern.object);

        let mut variables = input.variables().to_vec();
        let mut position = |term: &PatternTerm| match term {
            PatternTerm::Constant(_) => None,
            PatternTerm::Variable(variable) => Some(
                match variables.iter().position(|candidate| candidate == variable) {
                    Some(position) => position,
                    None => {
                        variables.push(variable.clone());
                        variables.len() - 1
                    }
                },
            ),
        };
        let positions = [
            position(&subject),
            position(&predicate),
            position(&object),
        ];
        let constants = [subject, predicate, object].map(|term| match term {
            PatternTerm::Constant(term) => Some(term),
            PatternTerm::Variable(_) => None,
        });

        let mut result = Multiset::new(variables.clone());
        for (_, values) in input.iter() {
            let mut values = values.to_vec();
            values.resize(variables.len(), None);

            let lookup = |index: usize| -> Option<&Term> {
                constants[index]
                    .as_ref()
                    .or_else(|| positions[index].and_then(|position| values[position].as_ref()))
            };
            let subject = lookup(0);
            let predicate = match lookup(1) {
                Some(Term::NamedNode(node)) => Some(node),
                Some(_) => continue,
                None => None,
            };
            let object = lookup(2);

            for triple in self.triples(subject, predicate, object)? {
                let matched = [
                    Term::from(triple.subject),
                    Term::from(triple.predicate),
                    triple.object,
                ];
                let mut row = values.clone();
                let mut compatible = true;
                for (term, position) in matched.into_iter().zip(positions) {
                    let Some(position) = position else {
                        continue;
                    };
                    match &row[position] {
                        Some(existing) => compatible &= *existing == term,
                        None => row[position] = Some(term),
                    }
                }
                if compatible {
                    result.add(row);
                }
            }
        }
        Ok(result)
    }

    pub(super) fn pattern_term(&self, pattern: &TermPattern) -> PatternTerm {
        match pattern {
            TermPattern::NamedNode(node) => PatternTerm::Constant(node.clone().into()),
            TermPattern::Literal(literal) => PatternTerm::Constant(literal.clone().into()),
            TermPattern::BlankNode(node) => match self.blank_node_mode() {
                BlankNodeMatchingMode::Filter => PatternTerm::Constant(node.clone().into()),
                BlankNodeMatchingMode::Variable => PatternTerm::Variable(
                    Variable::new_unchecked(format!(
                        "{BLANK_NODE_VARIABLE_PREFIX}{}",
                        node.as_str()
                    )),
                ),
            },
            TermPattern::Variable(variable) => PatternTerm::Variable(variable.clone()),
        }
    }

    /// Returns the triples of the active graph that match the given terms.
    ///
    /// If the active graph spans multiple graphs, each triple is only returned once.
    pub(super) fn triples(
        &self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, QueryEvaluationError> {
        let subject = match subject {
            Some(Term::NamedNode(node)) => Some(SubjectRef::NamedNode(node.as_ref())),
            Some(Term::BlankNode(node)) => Some(SubjectRef::BlankNode(node.as_ref())),
            Some(Term::Literal(_)) => return Ok(Vec::new()),
            None => None,
        };
        let predicate = predicate.map(NamedNode::as_ref);
        let object = object.map(Term::as_ref);

        let state = self.state.borrow();
        let graphs = match &state.active_graph {
            ActiveGraph::DefaultGraph => vec![Some(GraphNameRef::DefaultGraph)],
            ActiveGraph::AllGraphs => vec![None],
            ActiveGraph::Union(graphs) => graphs
                .iter()
                .map(|graph| Some(graph.as_ref()))
                .collect(),
        };

        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for graph in graphs {
            for quad in self
                .source
                .quads_for_pattern(subject, predicate, object, graph)
            {
                let quad = quad?;
                if self.options.rigorous_evaluation
                    && !quad_matches(&quad, subject, predicate, object, graph)
                {
                    continue;
                }
                let triple = Triple::from(quad);
                if !state.active_graph.is_merge() || seen.insert(triple.clone()) {
                    result.push(triple);
                }
            }
        }
        Ok(result)
    }

    fn evaluate_graph(
        &self,
        name: &NamedNodePattern,
        inner: &GraphPattern,
    ) -> Result<Multiset, QueryEvaluationError> {
        match name {
            NamedNodePattern::NamedNode(node) => {
                let graph = NamedOrBlankNode::NamedNode(node.clone());
                if !self.is_named_graph_available(&graph) {
                    return Ok(Multiset::Null);
                }
                self.with_active_graph(ActiveGraph::named(graph), || self.evaluate(inner))
            }
            NamedNodePattern::Variable(variable) => {
                let graphs = match &self.named_graphs {
                    Some(graphs) => graphs.clone(),
                    None => self.source.named_graphs()?,
                };

                let mut result = Multiset::new(vec![variable.clone()]);
                for graph in graphs {
                    let solutions = self.with_active_graph(ActiveGraph::named(graph.clone()), || {
                        self.evaluate(inner)
                    })?;
                    let graph_binding =
                        Multiset::from_rows(vec![variable.clone()], [vec![Some(graph.into())]]);
                    result = result.union(solutions.join(graph_binding));
                }
                Ok(result)
            }
        }
    }

    fn is_named_graph_available(&self, graph: &NamedOrBlankNode) -> bool {
        self.named_graphs
            .as_ref()
            .map_or(true, |graphs| graphs.contains(graph))
    }

    /// Evaluates `f` with a different active graph and restores the previous one afterward.
    fn with_active_graph<T>(&self, active_graph: ActiveGraph, f: impl FnOnce() -> T) -> T {
        let old_state = self.state.borrow().clone();
        self.state.replace(EvaluationState { active_graph });
        let result = f();
        self.state.replace(old_state);
        result
    }

    fn evaluate_order_by(
        &self,
        inner: Multiset,
        expressions: &[OrderExpression],
    ) -> Result<Multiset, QueryEvaluationError> {
        let mut keys = FxHashMap::default();
        {
            let exists = ExistsCache::default();
            let context = PatternContext::new(self, &inner, &exists);
            for (id, _) in inner.iter() {
                let mut key = Vec::with_capacity(expressions.len());
                for expression in expressions {
                    let (OrderExpression::Asc(expression) | OrderExpression::Desc(expression)) =
                        expression;
                    let value = self.expressions.evaluate(&context, id, expression)?;
                    key.push(value.into_term().ok());
                }
                keys.insert(id, key);
            }
        }

        Ok(inner.order_by(|lhs, rhs| {
            let (Some(lhs), Some(rhs)) = (keys.get(&lhs), keys.get(&rhs)) else {
                return Ordering::Equal;
            };
            for ((lhs, rhs), expression) in lhs.iter().zip(rhs).zip(expressions) {
                let ordering =
                    cmp_terms(lhs.as_ref().map(Term::as_ref), rhs.as_ref().map(Term::as_ref));
                let ordering = match expression {
                    OrderExpression::Asc(_) => ordering,
                    OrderExpression::Desc(_) => ordering.reverse(),
                };
                if ordering.is_ne() {
                    return ordering;
                }
            }
            Ordering::Equal
        }))
    }
}

fn quad_matches(
    quad: &Quad,
    subject: Option<SubjectRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
    graph: Option<GraphNameRef<'_>>,
) -> bool {
    subject.map_or(true, |subject| quad.subject.as_ref() == subject)
        && predicate.map_or(true, |predicate| quad.predicate.as_ref() == predicate)
        && object.map_or(true, |object| quad.object.as_ref() == object)
        && graph.map_or(true, |graph| quad.graph_name.as_ref() == graph)
}

fn ground_term(term: GroundTerm) -> Term {
    match term {
        GroundTerm::NamedNode(node) => node.into(),
        GroundTerm::Literal(literal) => literal.into(),
    }
}

fn operator_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Bgp { .. } => "Bgp",
        GraphPattern::Path { .. } => "Path",
        GraphPattern::Join { .. } => "Join",
        GraphPattern::LeftJoin { .. } => "LeftJoin",
        GraphPattern::Filter { .. } => "Filter",
        GraphPattern::Union { .. } => "Union",
        GraphPattern::Graph { .. } => "Graph",
        GraphPattern::Extend { .. } => "Extend",
        GraphPattern::Minus { .. } => "Minus",
        GraphPattern::Values { .. } => "Values",
        GraphPattern::OrderBy { .. } => "OrderBy",
        GraphPattern::Project { .. } => "Project",
        GraphPattern::Distinct { .. } => "Distinct",
        GraphPattern::Reduced { .. } => "Reduced",
        GraphPattern::Slice { .. } => "Slice",
        GraphPattern::Group { .. } => "Group",
        GraphPattern::Service { .. } => "Service",
    }
}
