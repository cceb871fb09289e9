//! Partitioning of solutions for `GROUP BY`.
//!
//! A [Grouping] splits the binding ids of a multiset into [BindingGroup]s. Multiple grouping keys
//! are chained by [GroupBy]: the first key partitions the input and every further key subdivides
//! the groups of its predecessor.

mod expression;
mod variable;

pub use expression::GroupByExpression;
pub use variable::GroupByVariable;

use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_functions::EvaluationContext;
use rdf_multiset_model::{Expression, Term, Variable, VariableRef};
use std::fmt::Debug;

/// The binding ids of a single group and the values that the grouping assigned to variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindingGroup {
    ids: Vec<BindingId>,
    assignments: Vec<(Variable, Option<Term>)>,
}

impl BindingGroup {
    pub fn new(ids: Vec<BindingId>) -> Self {
        Self {
            ids,
            assignments: Vec::new(),
        }
    }

    pub fn ids(&self) -> &[BindingId] {
        &self.ids
    }

    pub fn assignments(&self) -> &[(Variable, Option<Term>)] {
        &self.assignments
    }

    /// Returns the assignment of `variable`. The outer [Option] is [None] if the group has no
    /// assignment for the variable, the inner one is [None] if the variable is assigned the
    /// unbound value.
    pub fn assignment(&self, variable: VariableRef<'_>) -> Option<Option<&Term>> {
        self.assignments
            .iter()
            .find(|(candidate, _)| candidate.as_ref() == variable)
            .map(|(_, value)| value.as_ref())
    }

    /// Adds an assignment. A later assignment of the same variable replaces the earlier one.
    #[must_use]
    pub fn with_assignment(mut self, variable: Variable, value: Option<Term>) -> Self {
        self.assignments.retain(|(candidate, _)| *candidate != variable);
        self.assignments.push((variable, value));
        self
    }

    /// Creates a child group with the given `ids` that inherits the assignments of this group.
    fn child(&self, ids: Vec<BindingId>) -> Self {
        Self {
            ids,
            assignments: self.assignments.clone(),
        }
    }
}

/// A single grouping key of a `GROUP BY` clause.
pub trait Grouping: Debug {
    /// Partitions `ids` into groups. Every id ends up in exactly one group.
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<Vec<BindingGroup>, QueryEvaluationError>;

    /// Partitions each of the `groups` further. The new groups inherit the assignments of the
    /// group they were created from.
    fn subdivide(
        &self,
        context: &dyn EvaluationContext,
        groups: Vec<BindingGroup>,
    ) -> Result<Vec<BindingGroup>, QueryEvaluationError> {
        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            for child in self.apply(context, group.ids())? {
                let mut inherited = group.child(child.ids);
                for (variable, value) in child.assignments {
                    inherited = inherited.with_assignment(variable, value);
                }
                result.push(inherited);
            }
        }
        Ok(result)
    }

    /// The variables whose values are equal within each group.
    fn variables(&self) -> Vec<Variable>;

    /// The variables that can be projected after grouping: the grouped variables followed by
    /// the assigned variables, in first-seen order.
    fn projectable_variables(&self) -> Vec<Variable> {
        let mut result = self.variables();
        if let Some(variable) = self.assign_variable() {
            if !result.contains(variable) {
                result.push(variable.clone());
            }
        }
        result
    }

    /// The expression that is grouped on, if any.
    fn expression(&self) -> Option<&Expression> {
        None
    }

    /// The variable that receives the grouping value of each group, if any.
    fn assign_variable(&self) -> Option<&Variable>;
}

/// Chains multiple grouping keys.
///
/// Without any key all ids form a single group. This group is also created for an empty input
/// so that aggregates produce a single row.
#[derive(Debug, Default)]
pub struct GroupBy {
    keys: Vec<Box<dyn Grouping>>,
}

impl GroupBy {
    pub fn new(keys: Vec<Box<dyn Grouping>>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[Box<dyn Grouping>] {
        &self.keys
    }
}

impl Grouping for GroupBy {
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<Vec<BindingGroup>, QueryEvaluationError> {
        let Some((first, rest)) = self.keys.split_first() else {
            return Ok(vec![BindingGroup::new(ids.to_vec())]);
        };

        let mut groups = first.apply(context, ids)?;
        for key in rest {
            groups = key.subdivide(context, groups)?;
        }
        Ok(groups)
    }

    fn variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        for variable in self.keys.iter().flat_map(|key| key.variables()) {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }
        result
    }

    fn projectable_variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        for variable in self
            .keys
            .iter()
            .flat_map(|key| key.projectable_variables())
        {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }
        result
    }

    fn assign_variable(&self) -> Option<&Variable> {
        None
    }
}
