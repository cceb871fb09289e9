//! Evaluation of the property paths that cannot be lowered to triple patterns.
//!
//! Paths are evaluated with set semantics: every pair of connected nodes is returned once, no
//! matter how many routes connect them.

use crate::eval::pattern::{PatternEvaluator, PatternTerm};
use crate::Multiset;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_model::{NamedNode, PropertyPathExpression, Term, TermPattern};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// The direction in which a path is followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// An ordered set of nodes.
#[derive(Default)]
struct NodeSet {
    seen: FxHashSet<Term>,
    nodes: Vec<Term>,
}

impl NodeSet {
    fn insert(&mut self, node: Term) -> bool {
        if self.seen.insert(node.clone()) {
            self.nodes.push(node);
            true
        } else {
            false
        }
    }

    fn contains(&self, node: &Term) -> bool {
        self.seen.contains(node)
    }
}

impl Extend<Term> for NodeSet {
    fn extend<T: IntoIterator<Item = Term>>(&mut self, iter: T) {
        for node in iter {
            self.insert(node);
        }
    }
}

impl PatternEvaluator<'_> {
    pub(super) fn evaluate_path(
        &self,
        subject: &TermPattern,
        path: &PropertyPathExpression,
        object: &TermPattern,
    ) -> Result<Multiset, QueryEvaluationError> {
        match (self.pattern_term(subject), self.pattern_term(object)) {
            (PatternTerm::Constant(start), PatternTerm::Constant(end)) => {
                let reachable = self.step(&start, path, Direction::Forward)?;
                Ok(if reachable.contains(&end) {
                    Multiset::Identity
                } else {
                    Multiset::Null
                })
            }
            (PatternTerm::Constant(start), PatternTerm::Variable(end)) => {
                let reachable = self.step(&start, path, Direction::Forward)?;
                Ok(Multiset::from_rows(
                    vec![end],
                    reachable.nodes.into_iter().map(|node| vec![Some(node)]),
                ))
            }
            (PatternTerm::Variable(start), PatternTerm::Constant(end)) => {
                let reachable = self.step(&end, path, Direction::Backward)?;
                Ok(Multiset::from_rows(
                    vec![start],
                    reachable.nodes.into_iter().map(|node| vec![Some(node)]),
                ))
            }
            (PatternTerm::Variable(start), PatternTerm::Variable(end)) => {
                let same_variable = start == end;
                let variables = if same_variable {
                    vec![start]
                } else {
                    vec![start, end]
                };
                let mut result = Multiset::new(variables);
                for node in self.all_nodes()?.nodes {
                    for reached in self.step(&node, path, Direction::Forward)?.nodes {
                        if same_variable {
                            if reached == node {
                                result.add(vec![Some(node.clone())]);
                            }
                        } else {
                            result.add(vec![Some(node.clone()), Some(reached)]);
                        }
                    }
                }
                Ok(result)
            }
        }
    }

    /// Returns the nodes that can be reached from `node` by following `path` in `direction`.
    fn step(
        &self,
        node: &Term,
        path: &PropertyPathExpression,
        direction: Direction,
    ) -> Result<NodeSet, QueryEvaluationError> {
        let mut result = NodeSet::default();
        match path {
            PropertyPathExpression::NamedNode(predicate) => {
                result.extend(self.neighbours(node, direction, Some(predicate), |_| true)?);
            }
            PropertyPathExpression::Reverse(inner) => {
                result = self.step(node, inner, direction.reverse())?;
            }
            PropertyPathExpression::Sequence(first, second) => {
                let (first, second) = match direction {
                    Direction::Forward => (first, second),
                    Direction::Backward => (second, first),
                };
                for middle in self.step(node, first, direction)?.nodes {
                    result.extend(self.step(&middle, second, direction)?.nodes);
                }
            }
            PropertyPathExpression::Alternative(left, right) => {
                result.extend(self.step(node, left, direction)?.nodes);
                result.extend(self.step(node, right, direction)?.nodes);
            }
            PropertyPathExpression::ZeroOrMore(inner) => {
                result.insert(node.clone());
                self.closure(&mut result, node, inner, direction)?;
            }
            PropertyPathExpression::OneOrMore(inner) => {
                self.closure(&mut result, node, inner, direction)?;
            }
            PropertyPathExpression::ZeroOrOne(inner) => {
                result.insert(node.clone());
                result.extend(self.step(node, inner, direction)?.nodes);
            }
            PropertyPathExpression::NegatedPropertySet(excluded) => {
                result.extend(self.neighbours(node, direction, None, |candidate| {
                    !excluded.contains(candidate)
                })?);
            }
        }
        Ok(result)
    }

    /// Adds every node that is reachable from `start` with one or more steps of `path`.
    fn closure(
        &self,
        result: &mut NodeSet,
        start: &Term,
        path: &PropertyPathExpression,
        direction: Direction,
    ) -> Result<(), QueryEvaluationError> {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([start.clone()]);
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node.clone()) {
                continue;
            }
            for reached in self.step(&node, path, direction)?.nodes {
                result.insert(reached.clone());
                if !visited.contains(&reached) {
                    queue.push_back(reached);
                }
            }
        }
        Ok(())
    }

    /// Returns the direct neighbours of `node` over `predicate` (or any predicate if [None])
    /// that are accepted by `accept`.
    fn neighbours(
        &self,
        node: &Term,
        direction: Direction,
        predicate: Option<&NamedNode>,
        accept: impl Fn(&NamedNode) -> bool,
    ) -> Result<Vec<Term>, QueryEvaluationError> {
        let triples = match direction {
            Direction::Forward => self.triples(Some(node), predicate, None)?,
            Direction::Backward => self.triples(None, predicate, Some(node))?,
        };
        Ok(triples
            .into_iter()
            .filter(|triple| accept(&triple.predicate))
            .map(|triple| match direction {
                Direction::Forward => triple.object,
                Direction::Backward => triple.subject.into(),
            })
            .collect())
    }

    /// Returns all subjects and objects of the active graph.
    fn all_nodes(&self) -> Result<NodeSet, QueryEvaluationError> {
        let mut result = NodeSet::default();
        for triple in self.triples(None, None, None)? {
            result.insert(triple.subject.into());
            result.insert(triple.object);
        }
        Ok(result)
    }
}
