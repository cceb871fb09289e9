use rdf_multiset_model::{boolean_literal, Literal, Term, ThinError, ThinResult};

/// The result of evaluating an expression for a single solution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprValue {
    /// The expression evaluated to a term.
    Bound(Term),
    /// The expression referred to an unbound variable.
    Unbound,
    /// The evaluation raised a SPARQL error (e.g., a type error).
    Error,
}

impl ExprValue {
    pub fn is_bound(&self) -> bool {
        matches!(self, ExprValue::Bound(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExprValue::Error)
    }

    pub fn term(&self) -> Option<&Term> {
        match self {
            ExprValue::Bound(term) => Some(term),
            ExprValue::Unbound | ExprValue::Error => None,
        }
    }

    /// Returns the bound term. Unbound values are treated as errors.
    pub fn into_term(self) -> ThinResult<Term> {
        match self {
            ExprValue::Bound(term) => Ok(term),
            ExprValue::Unbound | ExprValue::Error => ThinError::expected(),
        }
    }

    /// Returns the bound term as an optional value. Errors are treated as unbound.
    pub fn into_option(self) -> Option<Term> {
        match self {
            ExprValue::Bound(term) => Some(term),
            ExprValue::Unbound | ExprValue::Error => None,
        }
    }
}

impl From<Term> for ExprValue {
    fn from(value: Term) -> Self {
        ExprValue::Bound(value)
    }
}

impl From<Literal> for ExprValue {
    fn from(value: Literal) -> Self {
        ExprValue::Bound(value.into())
    }
}

impl From<bool> for ExprValue {
    fn from(value: bool) -> Self {
        ExprValue::Bound(boolean_literal(value).into())
    }
}

impl From<ThinResult<Term>> for ExprValue {
    fn from(value: ThinResult<Term>) -> Self {
        value.map_or(ExprValue::Error, ExprValue::Bound)
    }
}

impl From<ThinResult<bool>> for ExprValue {
    fn from(value: ThinResult<bool>) -> Self {
        value.map_or(ExprValue::Error, ExprValue::from)
    }
}
