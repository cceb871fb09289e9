use crate::group::{BindingGroup, Grouping};
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_functions::{EvaluationContext, ExprValue, ExpressionEvaluator};
use rdf_multiset_model::{Expression, Term, Variable};
use rustc_hash::FxHashMap;

/// Groups solutions by the value of an expression, i.e., `GROUP BY (expr AS ?v)`.
///
/// Each solution lands in exactly one of three kinds of buckets: one per distinct value, a
/// single bucket for evaluation errors, and a single bucket for unbound results. The error and
/// unbound buckets follow the value buckets (errors first) and are only emitted if they are not
/// empty. Both assign the unbound value.
#[derive(Clone, Debug)]
pub struct GroupByExpression {
    expression: Expression,
    assign: Option<Variable>,
    evaluator: ExpressionEvaluator,
}

impl GroupByExpression {
    pub fn new(expression: Expression, evaluator: ExpressionEvaluator) -> Self {
        Self {
            expression,
            assign: None,
            evaluator,
        }
    }

    /// Assigns the value of the expression to `assign` in every group.
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

impl Grouping for GroupByExpression {
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<Vec<BindingGroup>, QueryEvaluationError> {
        let mut positions = FxHashMap::<Term, usize>::default();
        let mut keyed = Vec::<(Term, Vec<BindingId>)>::new();
        let mut errors = Vec::new();
        let mut nulls = Vec::new();

        for id in ids {
            match self.evaluator.evaluate(context, *id, &self.expression)? {
                ExprValue::Bound(term) => {
                    let position = match positions.get(&term) {
                        Some(position) => *position,
                        None => {
                            positions.insert(term.clone(), keyed.len());
                            keyed.push((term, Vec::new()));
                            keyed.len() - 1
                        }
                    };
                    keyed[position].1.push(*id);
                }
                ExprValue::Error => errors.push(*id),
                ExprValue::Unbound => nulls.push(*id),
            }
        }

        let mut groups = keyed
            .into_iter()
            .map(|(term, ids)| self.group(ids, Some(term)))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            groups.push(self.group(errors, None));
        }
        if !nulls.is_empty() {
            groups.push(self.group(nulls, None));
        }
        Ok(groups)
    }

    /// An expression does not group on a variable. Only its assigned variable can be projected.
    fn variables(&self) -> Vec<Variable> {
        Vec::new()
    }

    fn expression(&self) -> Option<&Expression> {
        Some(&self.expression)
    }

    fn assign_variable(&self) -> Option<&Variable> {
        self.assign.as_ref()
    }
}
