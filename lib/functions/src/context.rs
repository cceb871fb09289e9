use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_model::{GraphPattern, Term, Variable, VariableRef};

/// Provides the solutions that expressions are evaluated against.
pub trait EvaluationContext {
    /// The variables that are in scope for all solutions.
    fn variables(&self) -> &[Variable];

    /// Returns the value of `variable` in the solution `id`.
    fn value(&self, id: BindingId, variable: VariableRef<'_>) -> Option<&Term>;

    /// Evaluates `pattern` with the bindings of the solution `id` and returns whether it has any
    /// solution. Failures of the evaluation abort the query.
    fn exists(&self, id: BindingId, pattern: &GraphPattern) -> Result<bool, QueryEvaluationError>;
}
