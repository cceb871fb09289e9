//! Aggregate functions over groups of solutions.
//!
//! An aggregate is applied to the binding IDs of a single group. The aggregated expression is
//! evaluated lazily, one solution at a time, and fed into an [Accumulator]. Accumulators may stop
//! early once their result is known (e.g., `agg:all` after the first false value).

mod avg;
mod boolean;
mod count;
mod group_concat;
mod median;
mod min_max;
mod mode;
mod sample;
mod sum;

use crate::{EvaluationContext, ExprValue, ExpressionEvaluator};
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::{is_hidden_variable, BindingId};
use rdf_multiset_model::vocab::agg;
use rdf_multiset_model::{AggregateExpression, AggregateFunction, Expression, Term};
use rustc_hash::FxHashSet;
use std::fmt::Debug;

/// An aggregate that reduces a group of solutions to a single value.
pub trait Aggregate: Debug {
    /// Computes the aggregate for the solutions `ids` of `context`.
    ///
    /// Expected errors produce [ExprValue::Error]. A [QueryEvaluationError] is only returned if
    /// the evaluation of the aggregated expression fails fatally.
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<ExprValue, QueryEvaluationError>;
}

/// Consumes the values of a group one by one.
trait Accumulator {
    fn update(&mut self, value: ExprValue);

    /// Returns true if further values cannot change the result.
    fn is_done(&self) -> bool {
        false
    }

    fn evaluate(self: Box<Self>) -> ExprValue;
}

/// Creates an [Aggregate] for `expression`.
///
/// Returns an error if the aggregate function is unknown.
pub fn create_aggregate(
    expression: &AggregateExpression,
    evaluator: &ExpressionEvaluator,
) -> Result<Box<dyn Aggregate>, QueryEvaluationError> {
    match expression {
        AggregateExpression::CountSolutions { distinct } => Ok(Box::new(CountSolutions {
            distinct: *distinct,
        })),
        AggregateExpression::FunctionCall {
            name,
            expr,
            distinct,
        } => {
            let kind = AccumulatorKind::try_from_function(name)?;
            Ok(Box::new(ExpressionAggregate {
                kind,
                expression: expr.clone(),
                distinct: *distinct,
                evaluator: evaluator.clone(),
            }))
        }
    }
}

/// The accumulators of the aggregates that take an expression argument.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AccumulatorKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Sample,
    GroupConcat { separator: String },
    All,
    Any,
    None,
    Mode,
    Median,
}

impl AccumulatorKind {
    fn try_from_function(function: &AggregateFunction) -> Result<Self, QueryEvaluationError> {
        Ok(match function {
            AggregateFunction::Count => Self::Count,
            AggregateFunction::Sum => Self::Sum,
            AggregateFunction::Avg => Self::Avg,
            AggregateFunction::Min => Self::Min,
            AggregateFunction::Max => Self::Max,
            AggregateFunction::Sample => Self::Sample,
            AggregateFunction::GroupConcat { separator } => Self::GroupConcat {
                separator: separator.clone().unwrap_or_else(|| " ".to_owned()),
            },
            AggregateFunction::Custom(name) if name.as_ref() == agg::ALL => Self::All,
            AggregateFunction::Custom(name) if name.as_ref() == agg::ANY => Self::Any,
            AggregateFunction::Custom(name) if name.as_ref() == agg::NONE => Self::None,
            AggregateFunction::Custom(name) if name.as_ref() == agg::MODE => Self::Mode,
            AggregateFunction::Custom(name) if name.as_ref() == agg::MEDIAN => Self::Median,
            AggregateFunction::Custom(name) => {
                return QueryEvaluationError::not_implemented(format!(
                    "Custom aggregate function {name}"
                ))
            }
        })
    }

    fn accumulator(&self) -> Box<dyn Accumulator> {
        match self {
            Self::Count => Box::new(count::CountAccumulator::default()),
            Self::Sum => Box::new(sum::SumAccumulator::default()),
            Self::Avg => Box::new(avg::AvgAccumulator::default()),
            Self::Min => Box::new(min_max::MinMaxAccumulator::min()),
            Self::Max => Box::new(min_max::MinMaxAccumulator::max()),
            Self::Sample => Box::new(sample::SampleAccumulator::default()),
            Self::GroupConcat { separator } => {
                Box::new(group_concat::GroupConcatAccumulator::new(separator.clone()))
            }
            Self::All => Box::new(boolean::AllAccumulator::default()),
            Self::Any => Box::new(boolean::AnyAccumulator::default()),
            Self::None => Box::new(boolean::NoneAccumulator::default()),
            Self::Mode => Box::new(mode::ModeAccumulator::default()),
            Self::Median => Box::new(median::MedianAccumulator::default()),
        }
    }
}

/// `COUNT(*)` and `COUNT(DISTINCT *)`. Solutions are distinct if they differ in a variable that
/// is visible to the query.
#[derive(Debug)]
struct CountSolutions {
    distinct: bool,
}

impl Aggregate for CountSolutions {
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<ExprValue, QueryEvaluationError> {
        if !self.distinct {
            return Ok(count::count_literal(ids.len()).into());
        }

        let variables = context
            .variables()
            .iter()
            .filter(|variable| !is_hidden_variable(variable.as_ref()))
            .collect::<Vec<_>>();
        let distinct = ids
            .iter()
            .map(|id| {
                variables
                    .iter()
                    .map(|variable| context.value(*id, variable.as_ref()).cloned())
                    .collect::<Vec<Option<Term>>>()
            })
            .collect::<FxHashSet<_>>();
        Ok(count::count_literal(distinct.len()).into())
    }
}

/// An aggregate whose input is an expression that is evaluated for every solution.
#[derive(Debug)]
struct ExpressionAggregate {
    kind: AccumulatorKind,
    expression: Expression,
    distinct: bool,
    evaluator: ExpressionEvaluator,
}

impl Aggregate for ExpressionAggregate {
    fn apply(
        &self,
        context: &dyn EvaluationContext,
        ids: &[BindingId],
    ) -> Result<ExprValue, QueryEvaluationError> {
        let mut accumulator = self.kind.accumulator();
        let mut seen = FxHashSet::default();
        for id in ids {
            if accumulator.is_done() {
                break;
            }

            let value = self.evaluator.evaluate(context, *id, &self.expression)?;
            if self.distinct && !seen.insert(value.clone()) {
                continue;
            }
            accumulator.update(value);
        }
        Ok(accumulator.evaluate())
    }
}
