#![allow(dead_code)]

use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_functions::{EvaluationContext, ExprValue};
use rdf_multiset_model::{GraphPattern, Term, Variable, VariableRef};
use std::cell::Cell;

/// A table of solutions that counts the variable lookups.
pub struct SolutionTable {
    variables: Vec<Variable>,
    rows: Vec<Vec<Option<Term>>>,
    lookups: Cell<usize>,
}

impl SolutionTable {
    pub fn new(variables: &[&str], rows: Vec<Vec<Option<Term>>>) -> Self {
        Self {
            variables: variables
                .iter()
                .map(|name| Variable::new_unchecked(*name))
                .collect(),
            rows,
            lookups: Cell::new(0),
        }
    }

    /// A table with a single variable `?x`.
    pub fn column(values: Vec<Option<Term>>) -> Self {
        Self::new(&["x"], values.into_iter().map(|value| vec![value]).collect())
    }

    pub fn ids(&self) -> Vec<BindingId> {
        (0..self.rows.len()).map(BindingId::new).collect()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl EvaluationContext for SolutionTable {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn value(&self, id: BindingId, variable: VariableRef<'_>) -> Option<&Term> {
        self.lookups.set(self.lookups.get() + 1);
        let position = self
            .variables
            .iter()
            .position(|candidate| candidate.as_ref() == variable)?;
        self.rows.get(id.as_usize())?.get(position)?.as_ref()
    }

    fn exists(&self, _id: BindingId, _pattern: &GraphPattern) -> Result<bool, QueryEvaluationError> {
        QueryEvaluationError::not_implemented("EXISTS in test context")
    }
}

/// Renders an expression value for snapshots.
pub fn render(value: &ExprValue) -> String {
    match value {
        ExprValue::Bound(term) => term.to_string(),
        ExprValue::Unbound => "UNBOUND".to_owned(),
        ExprValue::Error => "ERROR".to_owned(),
    }
}
