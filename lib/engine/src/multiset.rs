//! Solution multisets.
//!
//! A [Multiset] is either the join identity (a single empty solution), the join annihilator (no
//! solutions) or a bag of solutions. All solutions of a bag share the variables of the bag.
//! Individual values may be unbound.
//!
//! Every solution of a bag is identified by a [BindingId]. Ids are handed out in increasing order
//! and the iteration order of a bag is the order of its ids. Operations that filter or extend a
//! bag keep the ids of the surviving solutions. Only [Multiset::order_by] re-numbers solutions.

use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_functions::EvaluationContext;
use rdf_multiset_model::{GraphPattern, Term, Variable, VariableRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The values of a single solution, aligned with the variables of its multiset.
pub type Values = Vec<Option<Term>>;

/// A multiset of solutions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Multiset {
    /// A single solution without any bound variable. Neutral element of the join.
    Identity,
    /// No solutions. Annihilates every join.
    Null,
    /// An ordinary bag of solutions.
    Bag(Bag),
}

/// A bag of solutions that share the same variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bag {
    variables: Vec<Variable>,
    solutions: BTreeMap<BindingId, Values>,
    next_id: BindingId,
}

impl Bag {
    fn new(variables: Vec<Variable>) -> Self {
        Self {
            variables,
            solutions: BTreeMap::new(),
            next_id: BindingId::new(0),
        }
    }

    fn add(&mut self, mut values: Values) -> BindingId {
        debug_assert!(values.len() <= self.variables.len());
        values.resize(self.variables.len(), None);

        let id = self.next_id;
        self.next_id = id.next();
        self.solutions.insert(id, values);
        id
    }

    fn position(&self, variable: VariableRef<'_>) -> Option<usize> {
        self.variables
            .iter()
            .position(|candidate| candidate.as_ref() == variable)
    }

    fn position_or_insert(&mut self, variable: Variable) -> usize {
        if let Some(position) = self.position(variable.as_ref()) {
            return position;
        }
        self.variables.push(variable);
        for values in self.solutions.values_mut() {
            values.push(None);
        }
        self.variables.len() - 1
    }
}

impl Multiset {
    /// Creates an empty bag with the given `variables`.
    pub fn new(variables: Vec<Variable>) -> Self {
        Multiset::Bag(Bag::new(variables))
    }

    /// Creates a bag that contains `rows`. Each row is aligned with `variables`.
    pub fn from_rows(variables: Vec<Variable>, rows: impl IntoIterator<Item = Values>) -> Self {
        let mut bag = Bag::new(variables);
        for row in rows {
            bag.add(row);
        }
        Multiset::Bag(bag)
    }

    /// The variables that are in scope for all solutions.
    pub fn variables(&self) -> &[Variable] {
        match self {
            Multiset::Identity | Multiset::Null => &[],
            Multiset::Bag(bag) => &bag.variables,
        }
    }

    /// The number of solutions.
    pub fn len(&self) -> usize {
        match self {
            Multiset::Identity => 1,
            Multiset::Null => 0,
            Multiset::Bag(bag) => bag.solutions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a solution and returns its id. Missing trailing values are unbound.
    ///
    /// The identity and the null multiset are turned into bags first.
    pub fn add(&mut self, values: Values) -> BindingId {
        self.as_bag_mut().add(values)
    }

    /// Adds a solution from `(variable, value)` pairs. Variables that are not yet in scope are
    /// added to the multiset and are unbound for all other solutions.
    pub fn add_bindings(
        &mut self,
        bindings: impl IntoIterator<Item = (Variable, Term)>,
    ) -> BindingId {
        let bag = self.as_bag_mut();
        let mut values = Vec::new();
        for (variable, term) in bindings {
            let position = bag.position_or_insert(variable);
            if values.len() <= position {
                values.resize(position + 1, None);
            }
            values[position] = Some(term);
        }
        bag.add(values)
    }

    /// Removes the solution `id`.
    pub fn remove(&mut self, id: BindingId) -> Option<Values> {
        match self {
            Multiset::Identity if id == BindingId::new(0) => {
                *self = Multiset::Null;
                Some(Vec::new())
            }
            Multiset::Identity | Multiset::Null => None,
            Multiset::Bag(bag) => bag.solutions.remove(&id),
        }
    }

    /// Returns the value of `variable` in the solution `id`.
    pub fn get(&self, id: BindingId, variable: VariableRef<'_>) -> Option<&Term> {
        let Multiset::Bag(bag) = self else {
            return None;
        };
        let position = bag.position(variable)?;
        bag.solutions.get(&id)?.get(position)?.as_ref()
    }

    /// Returns all values of the solution `id`.
    pub fn values(&self, id: BindingId) -> Option<&[Option<Term>]> {
        match self {
            Multiset::Identity if id == BindingId::new(0) => Some(&[]),
            Multiset::Identity | Multiset::Null => None,
            Multiset::Bag(bag) => bag.solutions.get(&id).map(Vec::as_slice),
        }
    }

    /// Returns the ids of all solutions in iteration order.
    pub fn ids(&self) -> Vec<BindingId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Iterates over all solutions.
    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &[Option<Term>])> + '_ {
        let identity = matches!(self, Multiset::Identity)
            .then_some((BindingId::new(0), &[] as &[Option<Term>]));
        let bag = match self {
            Multiset::Bag(bag) => Some(
                bag.solutions
                    .iter()
                    .map(|(id, values)| (*id, values.as_slice())),
            ),
            Multiset::Identity | Multiset::Null => None,
        };
        identity.into_iter().chain(bag.into_iter().flatten())
    }

    /// Joins two multisets. Two solutions are joined if they agree on all variables that are
    /// bound in both of them.
    #[must_use]
    pub fn join(self, other: Multiset) -> Multiset {
        match (self, other) {
            (Multiset::Null, _) | (_, Multiset::Null) => Multiset::Null,
            (Multiset::Identity, other) | (other, Multiset::Identity) => other,
            (Multiset::Bag(left), Multiset::Bag(right)) => {
                let layout = Layout::new(&left.variables, &right.variables);
                let index = JoinIndex::new(&layout, &right);
                let mut result = Bag::new(layout.variables.clone());
                for left_values in left.solutions.values() {
                    for right_values in index.candidates(left_values) {
                        result.add(layout.merge(left_values, right_values));
                    }
                }
                Multiset::Bag(result)
            }
        }
    }

    /// Joins two multisets but keeps solutions of `self` that have no join partner. Joined
    /// solutions are only kept if `filter` accepts them.
    pub fn left_join<E>(
        self,
        other: Multiset,
        mut filter: impl FnMut(&Multiset, BindingId) -> Result<bool, E>,
    ) -> Result<Multiset, E> {
        let left = self.into_bag();
        let right = other.into_bag();
        let layout = Layout::new(&left.variables, &right.variables);
        let index = JoinIndex::new(&layout, &right);

        let mut result = Multiset::Bag(Bag::new(layout.variables.clone()));
        for left_values in left.solutions.values() {
            let mut matched = false;
            for right_values in index.candidates(left_values) {
                let id = result.add(layout.merge(left_values, right_values));
                if filter(&result, id)? {
                    matched = true;
                } else {
                    result.remove(id);
                }
            }
            if !matched {
                result.add(left_values.clone());
            }
        }
        Ok(result)
    }

    /// Concatenates the solutions of both multisets.
    #[must_use]
    pub fn union(self, other: Multiset) -> Multiset {
        let left = self.into_bag();
        let right = other.into_bag();
        let layout = Layout::new(&left.variables, &right.variables);

        let mut result = Bag::new(layout.variables.clone());
        for values in left.solutions.into_values() {
            result.add(values);
        }
        for values in right.solutions.values() {
            result.add(layout.merge(&[], values));
        }
        Multiset::Bag(result)
    }

    /// Removes all solutions that are compatible with a solution of `other` and share at least
    /// one bound variable with it.
    #[must_use]
    pub fn minus(self, other: &Multiset) -> Multiset {
        let Multiset::Bag(mut left) = self else {
            return self;
        };
        let Multiset::Bag(right) = other else {
            return Multiset::Bag(left);
        };

        let layout = Layout::new(&left.variables, &right.variables);
        if layout.shared.is_empty() {
            return Multiset::Bag(left);
        }
        left.solutions.retain(|_, left_values| {
            !right.solutions.values().any(|right_values| {
                layout.is_compatible(left_values, right_values)
                    && layout.shares_bound_variable(left_values, right_values)
            })
        });
        Multiset::Bag(left)
    }

    /// Keeps the solutions that `predicate` accepts.
    pub fn filter<E>(
        mut self,
        mut predicate: impl FnMut(&Multiset, BindingId) -> Result<bool, E>,
    ) -> Result<Multiset, E> {
        let mut rejected = Vec::new();
        for (id, _) in self.iter() {
            if !predicate(&self, id)? {
                rejected.push(id);
            }
        }
        for id in rejected {
            self.remove(id);
        }
        Ok(self)
    }

    /// Binds `variable` to the value computed by `value` for each solution.
    pub fn extend<E>(
        self,
        variable: Variable,
        mut value: impl FnMut(&Multiset, BindingId) -> Result<Option<Term>, E>,
    ) -> Result<Multiset, E> {
        let mut values = Vec::with_capacity(self.len());
        for (id, _) in self.iter() {
            values.push((id, value(&self, id)?));
        }

        let mut bag = self.into_bag();
        let position = bag.position_or_insert(variable);
        for (id, value) in values {
            if let Some(solution) = bag.solutions.get_mut(&id) {
                solution[position] = value;
            }
        }
        Ok(Multiset::Bag(bag))
    }

    /// Restricts the solutions to `variables`. Variables that are not in scope are unbound.
    #[must_use]
    pub fn project(self, variables: &[Variable]) -> Multiset {
        if matches!(self, Multiset::Null) {
            return Multiset::Null;
        }

        let bag = self.into_bag();
        let positions = variables
            .iter()
            .map(|variable| bag.position(variable.as_ref()))
            .collect::<Vec<_>>();
        let solutions = bag
            .solutions
            .into_iter()
            .map(|(id, values)| {
                let projected = positions
                    .iter()
                    .map(|position| position.and_then(|position| values[position].clone()))
                    .collect();
                (id, projected)
            })
            .collect();
        Multiset::Bag(Bag {
            variables: variables.to_vec(),
            solutions,
            next_id: bag.next_id,
        })
    }

    /// Removes duplicate solutions. The first occurrence is kept.
    #[must_use]
    pub fn distinct(self) -> Multiset {
        let Multiset::Bag(mut bag) = self else {
            return self;
        };
        let mut seen = FxHashSet::default();
        bag.solutions.retain(|_, values| seen.insert(values.clone()));
        Multiset::Bag(bag)
    }

    /// Sorts the solutions with `compare`. The sort is stable and the solutions are re-numbered
    /// in their new order.
    #[must_use]
    pub fn order_by(self, mut compare: impl FnMut(BindingId, BindingId) -> Ordering) -> Multiset {
        let Multiset::Bag(mut bag) = self else {
            return self;
        };

        let mut ids = bag.solutions.keys().copied().collect::<Vec<_>>();
        ids.sort_by(|lhs, rhs| compare(*lhs, *rhs));

        let mut result = Bag::new(bag.variables.clone());
        for id in ids {
            if let Some(values) = bag.solutions.remove(&id) {
                result.add(values);
            }
        }
        Multiset::Bag(result)
    }

    /// Skips the first `start` solutions and keeps at most `length` of the remaining ones.
    #[must_use]
    pub fn slice(self, start: usize, length: Option<usize>) -> Multiset {
        let end = length.map_or(usize::MAX, |length| start.saturating_add(length));
        match self {
            Multiset::Identity if start == 0 && end > 0 => Multiset::Identity,
            Multiset::Identity | Multiset::Null => Multiset::Null,
            Multiset::Bag(mut bag) => {
                let mut position = 0;
                bag.solutions.retain(|_, _| {
                    let keep = (start..end).contains(&position);
                    position += 1;
                    keep
                });
                Multiset::Bag(bag)
            }
        }
    }

    fn as_bag_mut(&mut self) -> &mut Bag {
        if !matches!(self, Multiset::Bag(_)) {
            let bag = std::mem::replace(self, Multiset::Null).into_bag();
            *self = Multiset::Bag(bag);
        }
        match self {
            Multiset::Bag(bag) => bag,
            Multiset::Identity | Multiset::Null => unreachable!("Converted to a bag above"),
        }
    }

    fn into_bag(self) -> Bag {
        match self {
            Multiset::Identity => {
                let mut bag = Bag::new(Vec::new());
                bag.add(Vec::new());
                bag
            }
            Multiset::Null => Bag::new(Vec::new()),
            Multiset::Bag(bag) => bag,
        }
    }
}

/// A plain multiset can be used to evaluate expressions that do not contain `EXISTS`.
impl EvaluationContext for Multiset {
    fn variables(&self) -> &[Variable] {
        Multiset::variables(self)
    }

    fn value(&self, id: BindingId, variable: VariableRef<'_>) -> Option<&Term> {
        self.get(id, variable)
    }

    fn exists(&self, _id: BindingId, _pattern: &GraphPattern) -> Result<bool, QueryEvaluationError> {
        QueryEvaluationError::internal("EXISTS cannot be evaluated without a dataset")
    }
}

/// The variables of two combined multisets. The variables of the left side keep their
/// positions, new variables of the right side are appended.
struct Layout {
    variables: Vec<Variable>,
    /// The position of each right variable in the combined variables.
    right_targets: Vec<usize>,
    /// Pairs of (left, right) positions of shared variables.
    shared: Vec<(usize, usize)>,
}

impl Layout {
    fn new(left: &[Variable], right: &[Variable]) -> Self {
        let mut variables = left.to_vec();
        let mut right_targets = Vec::with_capacity(right.len());
        let mut shared = Vec::new();
        for (right_position, variable) in right.iter().enumerate() {
            match left.iter().position(|candidate| candidate == variable) {
                Some(left_position) => {
                    right_targets.push(left_position);
                    shared.push((left_position, right_position));
                }
                None => {
                    right_targets.push(variables.len());
                    variables.push(variable.clone());
                }
            }
        }
        Self {
            variables,
            right_targets,
            shared,
        }
    }

    fn is_compatible(&self, left: &[Option<Term>], right: &[Option<Term>]) -> bool {
        self.shared.iter().all(|(l, r)| match (&left[*l], &right[*r]) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => true,
        })
    }

    fn shares_bound_variable(&self, left: &[Option<Term>], right: &[Option<Term>]) -> bool {
        self.shared
            .iter()
            .any(|(l, r)| left[*l].is_some() && right[*r].is_some())
    }

    fn merge(&self, left: &[Option<Term>], right: &[Option<Term>]) -> Values {
        let mut values = left.to_vec();
        values.resize(self.variables.len(), None);
        for (value, target) in right.iter().zip(&self.right_targets) {
            if values[*target].is_none() {
                values[*target].clone_from(value);
            }
        }
        values
    }
}

/// Indexes the right side of a join by the values of the shared variables.
struct JoinIndex<'a> {
    layout: &'a Layout,
    keyed: FxHashMap<Vec<Term>, Vec<&'a Values>>,
    /// Solutions with an unbound shared variable. They must be checked individually.
    partial: Vec<&'a Values>,
    all: Vec<&'a Values>,
}

impl<'a> JoinIndex<'a> {
    fn new(layout: &'a Layout, right: &'a Bag) -> Self {
        let mut keyed: FxHashMap<_, Vec<_>> = FxHashMap::default();
        let mut partial = Vec::new();
        let mut all = Vec::with_capacity(right.solutions.len());
        for values in right.solutions.values() {
            all.push(values);
            let key = layout
                .shared
                .iter()
                .map(|(_, r)| values[*r].clone())
                .collect::<Option<Vec<_>>>();
            match key {
                Some(key) => keyed.entry(key).or_default().push(values),
                None => partial.push(values),
            }
        }
        Self {
            layout,
            keyed,
            partial,
            all,
        }
    }

    /// Returns the right solutions that are compatible with `left`.
    fn candidates(&self, left: &[Option<Term>]) -> Vec<&'a Values> {
        let key = self
            .layout
            .shared
            .iter()
            .map(|(l, _)| left[*l].clone())
            .collect::<Option<Vec<_>>>();
        match key {
            Some(key) => self
                .keyed
                .get(&key)
                .into_iter()
                .flatten()
                .copied()
                .chain(
                    self.partial
                        .iter()
                        .copied()
                        .filter(|right| self.layout.is_compatible(left, right)),
                )
                .collect(),
            None => self
                .all
                .iter()
                .copied()
                .filter(|right| self.layout.is_compatible(left, right))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_model::{Literal, NamedNode};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn iri(name: &str) -> Option<Term> {
        Some(NamedNode::new_unchecked(format!("http://example.com/{name}")).into())
    }

    fn int(value: i64) -> Option<Term> {
        Some(rdf_multiset_model::integer_literal(value).into())
    }

    #[test]
    fn ids_are_never_reused() {
        let mut multiset = Multiset::new(vec![var("x")]);
        let first = multiset.add(vec![int(1)]);
        multiset.remove(first);
        let second = multiset.add(vec![int(2)]);

        assert_ne!(first, second);
        assert_eq!(multiset.ids(), vec![second]);
    }

    #[test]
    fn identity_and_null() {
        let bag = Multiset::from_rows(vec![var("x")], [vec![int(1)]]);

        assert_eq!(Multiset::Identity.join(bag.clone()), bag);
        assert_eq!(bag.clone().join(Multiset::Identity), bag);
        assert_eq!(Multiset::Null.join(bag.clone()), Multiset::Null);
        assert_eq!(bag.join(Multiset::Null), Multiset::Null);
    }

    #[test]
    fn join_on_shared_variables() {
        let left = Multiset::from_rows(
            vec![var("x"), var("y")],
            [vec![iri("a"), int(1)], vec![iri("b"), int(2)], vec![None, int(3)]],
        );
        let right = Multiset::from_rows(
            vec![var("x"), var("z")],
            [vec![iri("a"), int(10)], vec![iri("c"), int(30)]],
        );

        let result = left.join(right);
        assert_eq!(result.variables(), &[var("x"), var("y"), var("z")]);
        let rows = result.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                vec![iri("a"), int(1), int(10)],
                vec![iri("a"), int(3), int(10)],
                vec![iri("c"), int(3), int(30)],
            ]
        );
    }

    #[test]
    fn left_join_keeps_unmatched_solutions() {
        let left = Multiset::from_rows(vec![var("x")], [vec![iri("a")], vec![iri("b")]]);
        let right = Multiset::from_rows(
            vec![var("x"), var("y")],
            [vec![iri("a"), int(1)], vec![iri("a"), int(2)]],
        );

        let result = left
            .left_join(right, |multiset, id| {
                Ok::<_, ()>(multiset.get(id, var("y").as_ref()) != int(2).as_ref())
            })
            .unwrap();
        let rows = result.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![vec![iri("a"), int(1)], vec![iri("b"), None]]
        );
    }

    #[test]
    fn union_aligns_variables() {
        let left = Multiset::from_rows(vec![var("x")], [vec![int(1)]]);
        let right = Multiset::from_rows(vec![var("y"), var("x")], [vec![int(2), int(3)]]);

        let result = left.union(right);
        assert_eq!(result.variables(), &[var("x"), var("y")]);
        let rows = result.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![int(1), None], vec![int(3), int(2)]]);
    }

    #[test]
    fn minus_requires_shared_bound_variable() {
        let left = Multiset::from_rows(
            vec![var("x"), var("y")],
            [vec![iri("a"), None], vec![iri("b"), None], vec![None, int(1)]],
        );
        let right = Multiset::from_rows(vec![var("x")], [vec![iri("a")]]);

        let result = left.minus(&right);
        let rows = result.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![iri("b"), None], vec![None, int(1)]]);
    }

    #[test]
    fn filter_keeps_ids() {
        let multiset = Multiset::from_rows(vec![var("x")], [vec![int(1)], vec![int(2)], vec![int(3)]]);
        let result = multiset
            .filter(|multiset, id| Ok::<_, ()>(multiset.get(id, var("x").as_ref()) != int(2).as_ref()))
            .unwrap();
        assert_eq!(result.ids(), vec![BindingId::new(0), BindingId::new(2)]);
    }

    #[test]
    fn extend_adds_variable() {
        let result = Multiset::Identity
            .extend(var("x"), |_, _| Ok::<_, ()>(Some(Literal::new_simple_literal("v").into())))
            .unwrap();
        assert_eq!(result.variables(), &[var("x")]);
        assert_eq!(
            result.get(BindingId::new(0), var("x").as_ref()),
            Some(&Literal::new_simple_literal("v").into())
        );
    }

    #[test]
    fn project_distinct_order_slice() {
        let multiset = Multiset::from_rows(
            vec![var("x"), var("y")],
            [
                vec![int(3), int(0)],
                vec![int(1), int(1)],
                vec![int(3), int(2)],
                vec![int(2), int(3)],
            ],
        );

        let projected = multiset.project(&[var("x")]).distinct();
        let ordered = projected.clone().order_by(|lhs, rhs| {
            let lhs = projected.get(lhs, var("x").as_ref());
            let rhs = projected.get(rhs, var("x").as_ref());
            rdf_multiset_model::cmp_terms(lhs.map(Term::as_ref), rhs.map(Term::as_ref))
        });
        let sliced = ordered.slice(1, Some(5));

        let rows = sliced.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![int(2)], vec![int(3)]]);
    }

    #[test]
    fn add_bindings_extends_variables() {
        let mut multiset = Multiset::new(Vec::new());
        multiset.add_bindings([(var("x"), int(1).unwrap())]);
        multiset.add_bindings([(var("y"), int(2).unwrap())]);

        assert_eq!(multiset.variables(), &[var("x"), var("y")]);
        let rows = multiset.iter().map(|(_, v)| v.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![int(1), None], vec![None, int(2)]]);
    }
}
