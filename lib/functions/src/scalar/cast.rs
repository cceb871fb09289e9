//! Casts to the XSD datatypes that are supported as constructor functions.

use crate::scalar::strings::StringArg;
use rdf_multiset_model::vocab::xsd;
use rdf_multiset_model::{
    boolean_literal, integer_literal, parse_boolean, Decimal, Integer,
    Literal, LiteralRef, NamedNodeRef, Numeric, Term, TermRef, ThinError, ThinResult,
};
use std::str::FromStr;

/// Casts `arg` to `datatype`. Returns [None] if the datatype has no constructor function.
pub fn cast(datatype: NamedNodeRef<'_>, arg: &Term) -> Option<ThinResult<Term>> {
    let result = if datatype == xsd::STRING {
        cast_to_string(arg)
    } else if datatype == xsd::INTEGER {
        cast_to_integer(arg)
    } else if datatype == xsd::DECIMAL {
        cast_to_decimal(arg)
    } else if datatype == xsd::DOUBLE {
        cast_to_double(arg).map(|value| Literal::from(value).into())
    } else if datatype == xsd::FLOAT {
        #[allow(clippy::cast_possible_truncation, reason = "Cast semantics")]
        cast_to_double(arg).map(|value| Literal::from(value as f32).into())
    } else if datatype == xsd::BOOLEAN {
        cast_to_boolean(arg)
    } else {
        return None;
    };
    Some(result)
}

fn cast_to_string(arg: &Term) -> ThinResult<Term> {
    let value = match arg.as_ref() {
        TermRef::NamedNode(node) => node.as_str(),
        TermRef::Literal(literal) => literal.value(),
        _ => return ThinError::expected(),
    };
    Ok(Literal::new_typed_literal(value, xsd::STRING).into())
}

fn cast_to_integer(arg: &Term) -> ThinResult<Term> {
    let literal = literal(arg)?;
    if let Ok(StringArg { value, .. }) = StringArg::try_plain_from_term(arg) {
        return Ok(Numeric::Integer(Integer::from_str(value.trim())?)
            .into_literal()
            .into());
    }
    if literal.datatype() == xsd::BOOLEAN {
        return Ok(integer_literal(i64::from(parse_boolean(literal.value())?)).into());
    }

    match Numeric::from_literal(literal)? {
        Numeric::Integer(value) => Ok(Numeric::Integer(value).into_literal().into()),
        Numeric::Decimal(value) => {
            let truncated = value.to_string();
            let truncated = truncated.split('.').next().unwrap_or("0");
            Ok(Numeric::Integer(Integer::from_str(truncated)?)
                .into_literal()
                .into())
        }
        Numeric::Float(_) | Numeric::Double(_) => {
            let value = Numeric::from_literal(literal)?.to_f64().trunc();
            #[allow(clippy::cast_precision_loss, reason = "Range check")]
            if !value.is_finite() || value.abs() >= i64::MAX as f64 {
                return ThinError::expected();
            }
            #[allow(clippy::cast_possible_truncation, reason = "Checked above")]
            Ok(integer_literal(value as i64).into())
        }
    }
}

fn cast_to_decimal(arg: &Term) -> ThinResult<Term> {
    let literal = literal(arg)?;
    let decimal = if let Ok(StringArg { value, .. }) = StringArg::try_plain_from_term(arg) {
        Decimal::from_str(value.trim())?
    } else if literal.datatype() == xsd::BOOLEAN {
        Decimal::from(i64::from(parse_boolean(literal.value())?))
    } else {
        match Numeric::from_literal(literal)? {
            Numeric::Integer(value) => Decimal::from(value),
            Numeric::Decimal(value) => value,
            value @ (Numeric::Float(_) | Numeric::Double(_)) => {
                let value = value.to_f64();
                if !value.is_finite() {
                    return ThinError::expected();
                }
                Decimal::from_str(&format!("{value}"))?
            }
        }
    };
    Ok(Numeric::Decimal(decimal).into_literal().into())
}

fn cast_to_double(arg: &Term) -> ThinResult<f64> {
    let literal = literal(arg)?;
    if let Ok(StringArg { value, .. }) = StringArg::try_plain_from_term(arg) {
        return Ok(match value.trim() {
            "INF" | "+INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            value => f64::from_str(value)?,
        });
    }
    if literal.datatype() == xsd::BOOLEAN {
        return Ok(if parse_boolean(literal.value())? { 1.0 } else { 0.0 });
    }
    Ok(Numeric::from_literal(literal)?.to_f64())
}

fn cast_to_boolean(arg: &Term) -> ThinResult<Term> {
    let literal = literal(arg)?;
    if let Ok(StringArg { value, .. }) = StringArg::try_plain_from_term(arg) {
        return Ok(boolean_literal(parse_boolean(value.trim())?).into());
    }
    if literal.datatype() == xsd::BOOLEAN {
        return Ok(boolean_literal(parse_boolean(literal.value())?).into());
    }
    let value = Numeric::from_literal(literal)?.to_f64();
    Ok(boolean_literal(value != 0.0 && !value.is_nan()).into())
}

fn literal(arg: &Term) -> ThinResult<LiteralRef<'_>> {
    match arg.as_ref() {
        TermRef::Literal(literal) => Ok(literal),
        _ => ThinError::expected(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(value: &str, datatype: NamedNodeRef<'_>) -> Term {
        Literal::new_typed_literal(value, datatype).into()
    }

    fn cast_ok(datatype: NamedNodeRef<'_>, arg: &Term) -> Term {
        cast(datatype, arg).unwrap().unwrap()
    }

    #[test]
    fn string_to_integer() {
        let result = cast_ok(xsd::INTEGER, &Literal::new_simple_literal(" 42 ").into());
        assert_eq!(result, typed("42", xsd::INTEGER));
    }

    #[test]
    fn decimal_to_integer_truncates() {
        let result = cast_ok(xsd::INTEGER, &typed("-3.7", xsd::DECIMAL));
        assert_eq!(result, typed("-3", xsd::INTEGER));
    }

    #[test]
    fn double_to_integer_truncates() {
        let result = cast_ok(xsd::INTEGER, &typed("2.9E0", xsd::DOUBLE));
        assert_eq!(result, typed("2", xsd::INTEGER));
    }

    #[test]
    fn boolean_to_decimal() {
        let result = cast_ok(xsd::DECIMAL, &typed("true", xsd::BOOLEAN));
        assert_eq!(result, typed("1", xsd::DECIMAL));
    }

    #[test]
    fn number_to_boolean() {
        assert_eq!(
            cast_ok(xsd::BOOLEAN, &typed("0", xsd::INTEGER)),
            typed("false", xsd::BOOLEAN)
        );
        assert_eq!(
            cast_ok(xsd::BOOLEAN, &typed("0.5", xsd::DECIMAL)),
            typed("true", xsd::BOOLEAN)
        );
    }

    #[test]
    fn invalid_lexical_form_is_an_error() {
        let result = cast(xsd::INTEGER, &Literal::new_simple_literal("abc").into()).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn unsupported_datatype() {
        assert!(cast(xsd::DATE, &Literal::new_simple_literal("2020-01-01").into()).is_none());
    }
}
