use crate::scalar::{bool_term, call_function, comparison, numeric};
use crate::{EvaluationContext, ExprValue};
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_common::BindingId;
use rdf_multiset_model::{DateTime, Expression, Iri, Term, ThinError, ThinResult};
use std::cmp::Ordering;

/// Evaluates SPARQL expressions for single solutions.
///
/// Expected errors (e.g., type errors) are reported as [ExprValue::Error] and never abort the
/// evaluation. Only failures of nested graph patterns (`EXISTS`) are returned as
/// [QueryEvaluationError].
///
/// `NOW()` returns the point in time at which the evaluator was created. Clones share it.
#[derive(Clone, Debug)]
pub struct ExpressionEvaluator {
    base_iri: Option<Iri<String>>,
    now: DateTime,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ExpressionEvaluator {
    /// Creates a new evaluator. The `base_iri` is used to resolve relative IRIs in `IRI(...)`.
    pub fn new(base_iri: Option<Iri<String>>) -> Self {
        Self {
            base_iri,
            now: DateTime::now(),
        }
    }

    /// Evaluates `expression` for the solution `id`.
    pub fn evaluate(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        expression: &Expression,
    ) -> Result<ExprValue, QueryEvaluationError> {
        let value = match expression {
            Expression::NamedNode(node) => ExprValue::Bound(node.clone().into()),
            Expression::Literal(literal) => ExprValue::Bound(literal.clone().into()),
            Expression::Variable(variable) => context
                .value(id, variable.as_ref())
                .cloned()
                .map_or(ExprValue::Unbound, ExprValue::Bound),
            Expression::Or(lhs, rhs) => {
                let lhs = self.effective_boolean_value(context, id, lhs)?;
                if lhs == Ok(true) {
                    return Ok(true.into());
                }
                match (lhs, self.effective_boolean_value(context, id, rhs)?) {
                    (_, Ok(true)) => true.into(),
                    (Ok(false), Ok(false)) => false.into(),
                    _ => ExprValue::Error,
                }
            }
            Expression::And(lhs, rhs) => {
                let lhs = self.effective_boolean_value(context, id, lhs)?;
                if lhs == Ok(false) {
                    return Ok(false.into());
                }
                match (lhs, self.effective_boolean_value(context, id, rhs)?) {
                    (_, Ok(false)) => false.into(),
                    (Ok(true), Ok(true)) => true.into(),
                    _ => ExprValue::Error,
                }
            }
            Expression::Equal(lhs, rhs) => self
                .binary(context, id, lhs, rhs, |lhs, rhs| {
                    comparison::equals(lhs.as_ref(), rhs.as_ref()).map(bool_term)
                })?,
            Expression::SameTerm(lhs, rhs) => {
                self.binary(context, id, lhs, rhs, |lhs, rhs| Ok(bool_term(lhs == rhs)))?
            }
            Expression::Greater(lhs, rhs) => {
                self.comparison(context, id, lhs, rhs, Ordering::is_gt)?
            }
            Expression::GreaterOrEqual(lhs, rhs) => {
                self.comparison(context, id, lhs, rhs, Ordering::is_ge)?
            }
            Expression::Less(lhs, rhs) => self.comparison(context, id, lhs, rhs, Ordering::is_lt)?,
            Expression::LessOrEqual(lhs, rhs) => {
                self.comparison(context, id, lhs, rhs, Ordering::is_le)?
            }
            Expression::In(needle, haystack) => self.evaluate_in(context, id, needle, haystack)?,
            Expression::Add(lhs, rhs) => self.binary(context, id, lhs, rhs, numeric::add)?,
            Expression::Subtract(lhs, rhs) => {
                self.binary(context, id, lhs, rhs, numeric::subtract)?
            }
            Expression::Multiply(lhs, rhs) => {
                self.binary(context, id, lhs, rhs, numeric::multiply)?
            }
            Expression::Divide(lhs, rhs) => self.binary(context, id, lhs, rhs, numeric::divide)?,
            Expression::UnaryPlus(inner) => {
                self.unary(context, id, inner, numeric::unary_plus)?
            }
            Expression::UnaryMinus(inner) => {
                self.unary(context, id, inner, numeric::unary_minus)?
            }
            Expression::Not(inner) => self
                .effective_boolean_value(context, id, inner)?
                .map(|value| !value)
                .into(),
            Expression::Exists(pattern) => context.exists(id, pattern)?.into(),
            Expression::Bound(variable) => context.value(id, variable.as_ref()).is_some().into(),
            Expression::If(condition, then, otherwise) => {
                match self.effective_boolean_value(context, id, condition)? {
                    Ok(true) => self.evaluate(context, id, then)?,
                    Ok(false) => self.evaluate(context, id, otherwise)?,
                    Err(_) => ExprValue::Error,
                }
            }
            Expression::Coalesce(expressions) => {
                for expression in expressions {
                    if let ExprValue::Bound(term) = self.evaluate(context, id, expression)? {
                        return Ok(ExprValue::Bound(term));
                    }
                }
                ExprValue::Error
            }
            Expression::FunctionCall(function, args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match self.evaluate(context, id, arg)? {
                        ExprValue::Bound(term) => values.push(term),
                        ExprValue::Unbound | ExprValue::Error => return Ok(ExprValue::Error),
                    }
                }
                call_function(function, &values, self.base_iri.as_ref(), self.now).into()
            }
        };
        Ok(value)
    }

    /// Evaluates the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of
    /// `expression` for the solution `id`. Unbound values are errors.
    pub fn effective_boolean_value(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        expression: &Expression,
    ) -> Result<ThinResult<bool>, QueryEvaluationError> {
        let value = self.evaluate(context, id, expression)?;
        Ok(value
            .into_term()
            .and_then(|term| comparison::effective_boolean_value(term.as_ref())))
    }

    fn unary(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        inner: &Expression,
        op: impl FnOnce(&Term) -> ThinResult<Term>,
    ) -> Result<ExprValue, QueryEvaluationError> {
        let inner = self.evaluate(context, id, inner)?;
        Ok(inner.into_term().and_then(|term| op(&term)).into())
    }

    fn binary(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        lhs: &Expression,
        rhs: &Expression,
        op: impl FnOnce(&Term, &Term) -> ThinResult<Term>,
    ) -> Result<ExprValue, QueryEvaluationError> {
        let lhs = self.evaluate(context, id, lhs)?.into_term();
        let rhs = self.evaluate(context, id, rhs)?.into_term();
        let result = match (lhs, rhs) {
            (Ok(lhs), Ok(rhs)) => op(&lhs, &rhs),
            _ => ThinError::expected(),
        };
        Ok(result.into())
    }

    fn comparison(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        lhs: &Expression,
        rhs: &Expression,
        accept: fn(Ordering) -> bool,
    ) -> Result<ExprValue, QueryEvaluationError> {
        self.binary(context, id, lhs, rhs, |lhs, rhs| {
            comparison::compare(lhs.as_ref(), rhs.as_ref()).map(|ordering| bool_term(accept(ordering)))
        })
    }

    fn evaluate_in(
        &self,
        context: &dyn EvaluationContext,
        id: BindingId,
        needle: &Expression,
        haystack: &[Expression],
    ) -> Result<ExprValue, QueryEvaluationError> {
        let Ok(needle) = self.evaluate(context, id, needle)?.into_term() else {
            return Ok(ExprValue::Error);
        };

        let mut error = false;
        for candidate in haystack {
            let candidate = self.evaluate(context, id, candidate)?.into_term();
            match candidate.and_then(|candidate| {
                comparison::equals(needle.as_ref(), candidate.as_ref())
            }) {
                Ok(true) => return Ok(true.into()),
                Ok(false) => {}
                Err(_) => error = true,
            }
        }

        Ok(if error { ExprValue::Error } else { false.into() })
    }
}
