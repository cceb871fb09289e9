use crate::eval::pattern::PatternEvaluator;
use crate::eval::variables::mentioned_variables;
use crate::Multiset;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::{is_hidden_variable, BindingId};
use rdf_multiset_functions::EvaluationContext;
use rdf_multiset_model::{GraphPattern, Term, Variable, VariableRef};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// The results of the `EXISTS` patterns of a single operator.
///
/// Patterns are identified by their address in the algebra tree. A pattern is evaluated once per
/// distinct combination of the values it reads from the filtered solutions.
#[derive(Default)]
pub(super) struct ExistsCache {
    /// The positions of the variables of the filtered solutions that a pattern reads.
    outer_variables: RefCell<FxHashMap<*const GraphPattern, Vec<usize>>>,
    results: RefCell<FxHashMap<(*const GraphPattern, Vec<Option<Term>>), bool>>,
}

/// Evaluates expressions against the solutions of an operator while the operator is evaluated.
pub(super) struct PatternContext<'a> {
    evaluator: &'a PatternEvaluator<'a>,
    multiset: &'a Multiset,
    exists: &'a ExistsCache,
}

impl<'a> PatternContext<'a> {
    pub(super) fn new(
        evaluator: &'a PatternEvaluator<'a>,
        multiset: &'a Multiset,
        exists: &'a ExistsCache,
    ) -> Self {
        Self {
            evaluator,
            multiset,
            exists,
        }
    }

    /// Returns the positions of the visible variables of the filtered solutions that `pattern`
    /// mentions.
    fn outer_variables(&self, pattern: &GraphPattern) -> Vec<usize> {
        let key = std::ptr::from_ref(pattern);
        if let Some(positions) = self.exists.outer_variables.borrow().get(&key) {
            return positions.clone();
        }

        let mentioned = mentioned_variables(pattern);
        let positions = self
            .multiset
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, variable)| {
                !is_hidden_variable(variable.as_ref()) && mentioned.contains(variable)
            })
            .map(|(position, _)| position)
            .collect::<Vec<_>>();
        self.exists
            .outer_variables
            .borrow_mut()
            .insert(key, positions.clone());
        positions
    }
}

impl EvaluationContext for PatternContext<'_> {
    fn variables(&self) -> &[Variable] {
        self.multiset.variables()
    }

    fn value(&self, id: BindingId, variable: VariableRef<'_>) -> Option<&Term> {
        self.multiset.get(id, variable)
    }

    /// Evaluates `pattern` with the values of the solution substituted for the variables it
    /// shares with the solution.
    fn exists(&self, id: BindingId, pattern: &GraphPattern) -> Result<bool, QueryEvaluationError> {
        let Some(values) = self.multiset.values(id) else {
            return QueryEvaluationError::internal(format!("Unknown binding {id}"));
        };

        let positions = self.outer_variables(pattern);
        let substituted = positions
            .iter()
            .map(|position| values.get(*position).cloned().flatten())
            .collect::<Vec<_>>();
        let key = (std::ptr::from_ref(pattern), substituted);
        if let Some(result) = self.exists.results.borrow().get(&key) {
            return Ok(*result);
        }

        let seed = (!positions.is_empty()).then(|| {
            let variables = self.multiset.variables();
            Multiset::from_rows(
                positions
                    .iter()
                    .map(|position| variables[*position].clone())
                    .collect(),
                [key.1.clone()],
            )
        });
        let result = !self.evaluator.seeded(seed).evaluate(pattern)?.is_empty();
        self.exists.results.borrow_mut().insert(key, result);
        Ok(result)
    }
}
