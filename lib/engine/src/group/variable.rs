use crate::group::{BindingGroup, Grouping};
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_functions::EvaluationContext;
use rdf_multiset_model::{Term, Variable};
use rustc_hash::FxHashMap;

/// Groups solutions by the term that is bound to a variable.
///
/// Terms are compared with term equality. `"1"^^xsd:integer` and `"01"^^xsd:integer` end up in
/// different groups. Solutions in which the variable is unbound form a single group that is
/// emitted after all other groups.
#[derive(Clone, Debug)]
pub struct GroupByVariable {
    variable: Variable,
    assign: Option<Variable>,
}

impl GroupByVariable {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            assign: None,
        }
    }

    /// Assigns the grouped value to `assign` in every group.
    #[must_use]
    pub fn with_assignment(mut self, assign: Variable) -> Self {
        self.assign = Some(assign);
        self
    }

    fn group(&self, ids: Vec<BindingId>, value: Option<Term>) -> BindingGroup {
        let group = BindingGroup::new(ids);
        match &self.assign {
            Some(assign) => group.with_assignment(assign.clone(), value),
            None => group,
        }
    }
}

impl Grouping for GroupByVariable {
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<Vec<BindingGroup>, QueryEvaluationError> {
        let mut positions = FxHashMap::<&Term, usize>::default();
        let mut keyed = Vec::<(Term, Vec<BindingId>)>::new();
        let mut nulls = Vec::new();

        for id in ids {
            match context.value(*id, self.variable.as_ref()) {
                Some(term) => {
                    let position = *positions.entry(term).or_insert_with(|| {
                        keyed.push((term.clone(), Vec::new()));
                        keyed.len() - 1
                    });
                    keyed[position].1.push(*id);
                }
                None => nulls.push(*id),
            }
        }

        let mut groups = keyed
            .into_iter()
            .map(|(term, ids)| self.group(ids, Some(term)))
            .collect::<Vec<_>>();
        if !nulls.is_empty() {
            groups.push(self.group(nulls, None));
        }
        Ok(groups)
    }

    fn variables(&self) -> Vec<Variable> {
        vec![self.variable.clone()]
    }

    fn assign_variable(&self) -> Option<&Variable> {
        self.assign.as_ref()
    }
}
