use rdf_multiset_model::{Literal, Numeric, Term, TermRef, ThinError, ThinResult};

/// Extracts a numeric value from a term.
pub fn numeric(term: &Term) -> ThinResult<Numeric> {
    match term.as_ref() {
        TermRef::Literal(literal) => Numeric::from_literal(literal),
        _ => ThinError::expected(),
    }
}

pub(crate) fn numeric_term(value: Numeric) -> Term {
    value.into_literal().into()
}

pub fn add(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    numeric(lhs)?.checked_add(numeric(rhs)?).map(numeric_term)
}

pub fn subtract(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    numeric(lhs)?.checked_sub(numeric(rhs)?).map(numeric_term)
}

pub fn multiply(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    numeric(lhs)?.checked_mul(numeric(rhs)?).map(numeric_term)
}

pub fn divide(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    numeric(lhs)?.checked_div(numeric(rhs)?).map(numeric_term)
}

pub fn unary_plus(arg: &Term) -> ThinResult<Term> {
    numeric(arg).map(numeric_term)
}

pub fn unary_minus(arg: &Term) -> ThinResult<Term> {
    numeric(arg)?.checked_neg().map(numeric_term)
}

pub fn abs(arg: &Term) -> ThinResult<Term> {
    numeric(arg)?.checked_abs().map(numeric_term)
}

pub fn ceil(arg: &Term) -> ThinResult<Term> {
    numeric(arg)?.ceil().map(numeric_term)
}

pub fn floor(arg: &Term) -> ThinResult<Term> {
    numeric(arg)?.floor().map(numeric_term)
}

pub fn round(arg: &Term) -> ThinResult<Term> {
    numeric(arg)?.round().map(numeric_term)
}

/// A random double in `[0, 1)`.
pub fn rand() -> Term {
    Literal::from(rand::random::<f64>()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_model::vocab::xsd;

    fn typed(value: &str, datatype: rdf_multiset_model::NamedNodeRef<'_>) -> Term {
        Literal::new_typed_literal(value, datatype).into()
    }

    #[test]
    fn adds_mixed_types() {
        let result = add(&typed("1", xsd::INTEGER), &typed("1.5", xsd::DECIMAL)).unwrap();
        assert_eq!(result, typed("2.5", xsd::DECIMAL));
    }

    #[test]
    fn non_numeric_arguments_are_errors() {
        assert!(add(&typed("1", xsd::INTEGER), &typed("1", xsd::STRING)).is_err());
    }

    #[test]
    fn rand_is_a_double_in_unit_interval() {
        let Term::Literal(literal) = rand() else {
            panic!("Expected a literal");
        };
        assert_eq!(literal.datatype(), xsd::DOUBLE);
        let value: f64 = literal.value().parse().unwrap();
        assert!((0.0..1.0).contains(&value));
    }
}
