use crate::eval::context::{ExistsCache, PatternContext};
use crate::eval::pattern::PatternEvaluator;
use crate::group::{GroupBy, GroupByVariable, Grouping};
use crate::Multiset;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_functions::aggregates::create_aggregate;
use rdf_multiset_functions::ExprValue;
use rdf_multiset_model::{AggregateExpression, GraphPattern, Variable};

impl PatternEvaluator<'_> {
    pub(super) fn evaluate_group(
        &self,
        inner: &GraphPattern,
        variables: &[Variable],
        aggregates: &[(Variable, AggregateExpression)],
    ) -> Result<Multiset, QueryEvaluationError> {
        let solutions = self.evaluate(inner)?;

        // `GROUP BY (expr AS ?v)` and `BIND(expr AS ?v) GROUP BY ?v` share their algebra, so an
        // expression that fails leaves ?v unbound in both cases.
        let group_by = GroupBy::new(
            variables
                .iter()
                .map(|variable| -> Box<dyn Grouping> {
                    Box::new(
                        GroupByVariable::new(variable.clone()).with_assignment(variable.clone()),
                    )
                })
                .collect(),
        );

        let exists = ExistsCache::default();
        let context = PatternContext::new(self, &solutions, &exists);
        let aggregates = aggregates
            .iter()
            .map(|(variable, aggregate)| {
                Ok((variable, create_aggregate(aggregate, &self.expressions)?))
            })
            .collect::<Result<Vec<_>, QueryEvaluationError>>()?;

        let mut result_variables = variables.to_vec();
        result_variables.extend(aggregates.iter().map(|(variable, _)| (*variable).clone()));
        let mut result = Multiset::new(result_variables);

        for group in group_by.apply(&context, &solutions.ids())? {
            let mut row = Vec::with_capacity(variables.len() + aggregates.len());
            for variable in variables {
                row.push(group.assignment(variable.as_ref()).flatten().cloned());
            }
            for (_, aggregate) in &aggregates {
                row.push(match aggregate.apply(&context, group.ids())? {
                    ExprValue::Bound(term) => Some(term),
                    ExprValue::Unbound | ExprValue::Error => None,
                });
            }
            result.add(row);
        }
        Ok(result)
    }
}
