use rdf_multiset_model::vocab::{rdf, xsd};
use rdf_multiset_model::{
    boolean_from_literal, is_numeric_datatype, partial_cmp_literal_values, LiteralRef, Numeric,
    TermRef, ThinError, ThinResult,
};
use std::cmp::Ordering;

/// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of a term.
pub fn effective_boolean_value(term: TermRef<'_>) -> ThinResult<bool> {
    let TermRef::Literal(literal) = term else {
        return ThinError::expected();
    };

    let datatype = literal.datatype();
    if datatype == xsd::BOOLEAN {
        return Ok(boolean_from_literal(literal).unwrap_or(false));
    }
    if datatype == xsd::STRING {
        return Ok(!literal.value().is_empty());
    }
    if is_numeric_datatype(datatype) {
        return Ok(Numeric::from_literal(literal).is_ok_and(|value| {
            let value = value.to_f64();
            value != 0.0 && !value.is_nan()
        }));
    }
    ThinError::expected()
}

/// [RDFterm-equal](https://www.w3.org/TR/sparql11-query/#func-RDFterm-equal) extended by the
/// value comparison of known literal types.
///
/// Returns an error if two different literals cannot be compared.
pub fn equals(lhs: TermRef<'_>, rhs: TermRef<'_>) -> ThinResult<bool> {
    match (lhs, rhs) {
        (TermRef::Literal(lhs), TermRef::Literal(rhs)) => {
            match partial_cmp_literal_values(lhs, rhs) {
                Some(ordering) => Ok(ordering == Ordering::Equal),
                None if lhs == rhs => Ok(true),
                None if is_known_datatype(lhs) && is_known_datatype(rhs) => Ok(false),
                None => ThinError::expected(),
            }
        }
        (lhs, rhs) => Ok(lhs == rhs),
    }
}

/// Compares two terms with the SPARQL `<` operator semantics.
pub fn compare(lhs: TermRef<'_>, rhs: TermRef<'_>) -> ThinResult<Ordering> {
    match (lhs, rhs) {
        (TermRef::Literal(lhs), TermRef::Literal(rhs)) => {
            partial_cmp_literal_values(lhs, rhs).ok_or(ThinError::default())
        }
        _ => ThinError::expected(),
    }
}

fn is_known_datatype(literal: LiteralRef<'_>) -> bool {
    let datatype = literal.datatype();
    datatype == xsd::STRING
        || datatype == rdf::LANG_STRING
        || datatype == xsd::BOOLEAN
        || datatype == xsd::DATE_TIME
        || is_numeric_datatype(datatype)
}
