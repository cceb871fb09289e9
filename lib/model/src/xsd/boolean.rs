use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, LiteralRef};

/// Parses the lexical form of an [XML Schema `boolean`](https://www.w3.org/TR/xmlschema11-2/#boolean).
pub fn parse_boolean(value: &str) -> ThinResult<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => ThinError::expected(),
    }
}

/// Extracts the boolean value of an `xsd:boolean` literal.
pub fn boolean_from_literal(literal: LiteralRef<'_>) -> ThinResult<bool> {
    if literal.datatype() != xsd::BOOLEAN {
        return ThinError::expected();
    }
    parse_boolean(literal.value())
}

/// Creates an `xsd:boolean` literal.
pub fn boolean_literal(value: bool) -> Literal {
    Literal::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_lexical_forms() {
        assert_eq!(parse_boolean("true"), Ok(true));
        assert_eq!(parse_boolean("1"), Ok(true));
        assert_eq!(parse_boolean("false"), Ok(false));
        assert_eq!(parse_boolean("0"), Ok(false));
        assert!(parse_boolean("TRUE").is_err());
    }

    #[test]
    fn rejects_other_datatypes() {
        let literal = Literal::new_simple_literal("true");
        assert!(boolean_from_literal(literal.as_ref()).is_err());
    }
}
