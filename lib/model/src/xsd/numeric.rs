use crate::xsd::is_integer_datatype;
use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, LiteralRef};
use oxsdatatypes::{Decimal, Integer};
use std::cmp::Ordering;
use std::str::FromStr;

/// A numeric value of one of the four primitive numeric types of XSD.
///
/// Arithmetic follows the [XPath numeric type promotion](https://www.w3.org/TR/xpath-functions-31/#op.numeric):
/// `integer < decimal < float < double`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
}

/// Two numerics promoted to the same type.
enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Float(f32, f32),
    Double(f64, f64),
}

impl Numeric {
    /// Extracts a numeric value from a literal. Returns an error if the literal is not numeric
    /// or its lexical form is invalid.
    pub fn from_literal(literal: LiteralRef<'_>) -> ThinResult<Self> {
        let datatype = literal.datatype();
        let value = literal.value();
        if is_integer_datatype(datatype) {
            Ok(Numeric::Integer(Integer::from_str(value)?))
        } else if datatype == xsd::DECIMAL {
            Ok(Numeric::Decimal(Decimal::from_str(value)?))
        } else if datatype == xsd::FLOAT {
            Ok(Numeric::Float(f32::from_str(value)?))
        } else if datatype == xsd::DOUBLE {
            Ok(Numeric::Double(f64::from_str(value)?))
        } else {
            ThinError::expected()
        }
    }

    /// Creates the canonical literal of this value.
    pub fn into_literal(self) -> Literal {
        match self {
            Numeric::Integer(value) => Literal::new_typed_literal(value.to_string(), xsd::INTEGER),
            Numeric::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Numeric::Float(value) => Literal::from(value),
            Numeric::Double(value) => Literal::from(value),
        }
    }

    /// Returns an approximation of this value as an [f64].
    pub fn to_f64(self) -> f64 {
        match self {
            Numeric::Integer(value) => integer_to_f64(value),
            Numeric::Decimal(value) => decimal_to_f64(value),
            Numeric::Float(value) => f64::from(value),
            Numeric::Double(value) => value,
        }
    }

    /// [op:numeric-add](https://www.w3.org/TR/xpath-functions-31/#func-numeric-add)
    pub fn checked_add(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            NumericPair::Integer(a, b) => a.checked_add(b).map(Numeric::Integer),
            NumericPair::Decimal(a, b) => a.checked_add(b).map(Numeric::Decimal),
            NumericPair::Float(a, b) => Some(Numeric::Float(a + b)),
            NumericPair::Double(a, b) => Some(Numeric::Double(a + b)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-subtract](https://www.w3.org/TR/xpath-functions-31/#func-numeric-subtract)
    pub fn checked_sub(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            NumericPair::Integer(a, b) => a.checked_sub(b).map(Numeric::Integer),
            NumericPair::Decimal(a, b) => a.checked_sub(b).map(Numeric::Decimal),
            NumericPair::Float(a, b) => Some(Numeric::Float(a - b)),
            NumericPair::Double(a, b) => Some(Numeric::Double(a - b)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-multiply](https://www.w3.org/TR/xpath-functions-31/#func-numeric-multiply)
    pub fn checked_mul(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            NumericPair::Integer(a, b) => a.checked_mul(b).map(Numeric::Integer),
            NumericPair::Decimal(a, b) => a.checked_mul(b).map(Numeric::Decimal),
            NumericPair::Float(a, b) => Some(Numeric::Float(a * b)),
            NumericPair::Double(a, b) => Some(Numeric::Double(a * b)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-divide](https://www.w3.org/TR/xpath-functions-31/#func-numeric-divide)
    ///
    /// Dividing two integers yields a decimal. Returns `Err` on a decimal division by zero.
    pub fn checked_div(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            NumericPair::Integer(a, b) => Decimal::from(a)
                .checked_div(Decimal::from(b))
                .map(Numeric::Decimal),
            NumericPair::Decimal(a, b) => a.checked_div(b).map(Numeric::Decimal),
            NumericPair::Float(a, b) => Some(Numeric::Float(a / b)),
            NumericPair::Double(a, b) => Some(Numeric::Double(a / b)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-unary-minus](https://www.w3.org/TR/xpath-functions-31/#func-numeric-unary-minus)
    pub fn checked_neg(self) -> ThinResult<Self> {
        match self {
            Numeric::Integer(value) => Integer::from(0_i64)
                .checked_sub(value)
                .map(Numeric::Integer)
                .ok_or(ThinError::default()),
            Numeric::Decimal(value) => Decimal::from(0_i64)
                .checked_sub(value)
                .map(Numeric::Decimal)
                .ok_or(ThinError::default()),
            Numeric::Float(value) => Ok(Numeric::Float(-value)),
            Numeric::Double(value) => Ok(Numeric::Double(-value)),
        }
    }

    /// [fn:abs](https://www.w3.org/TR/xpath-functions-31/#func-abs)
    pub fn checked_abs(self) -> ThinResult<Self> {
        match self {
            Numeric::Integer(value) if value < Integer::from(0_i64) => self.checked_neg(),
            Numeric::Decimal(value) if value < Decimal::from(0_i64) => self.checked_neg(),
            Numeric::Float(value) => Ok(Numeric::Float(value.abs())),
            Numeric::Double(value) => Ok(Numeric::Double(value.abs())),
            _ => Ok(self),
        }
    }

    /// [fn:round](https://www.w3.org/TR/xpath-functions-31/#func-round)
    pub fn round(self) -> ThinResult<Self> {
        self.map_fractional(|value| (value + 0.5).floor(), |value| (value + 0.5).floor())
    }

    /// [fn:ceiling](https://www.w3.org/TR/xpath-functions-31/#func-ceiling)
    pub fn ceil(self) -> ThinResult<Self> {
        self.map_fractional(f32::ceil, f64::ceil)
    }

    /// [fn:floor](https://www.w3.org/TR/xpath-functions-31/#func-floor)
    pub fn floor(self) -> ThinResult<Self> {
        self.map_fractional(f32::floor, f64::floor)
    }

    fn map_fractional(
        self,
        float_op: impl Fn(f32) -> f32,
        double_op: impl Fn(f64) -> f64,
    ) -> ThinResult<Self> {
        match self {
            Numeric::Integer(_) => Ok(self),
            Numeric::Decimal(value) => {
                let rounded = double_op(decimal_to_f64(value));
                Ok(Numeric::Decimal(Decimal::from_str(&format!("{rounded:.0}"))?))
            }
            Numeric::Float(value) => Ok(Numeric::Float(float_op(value))),
            Numeric::Double(value) => Ok(Numeric::Double(double_op(value))),
        }
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match promote(*self, *other) {
            NumericPair::Integer(a, b) => Some(a.cmp(&b)),
            NumericPair::Decimal(a, b) => Some(a.cmp(&b)),
            NumericPair::Float(a, b) => a.partial_cmp(&b),
            NumericPair::Double(a, b) => a.partial_cmp(&b),
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Integer(Integer::from(value))
    }
}

/// Creates an `xsd:integer` literal.
pub fn integer_literal(value: i64) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER)
}

fn promote(lhs: Numeric, rhs: Numeric) -> NumericPair {
    match (lhs, rhs) {
        (Numeric::Integer(a), Numeric::Integer(b)) => NumericPair::Integer(a, b),
        (Numeric::Integer(a), Numeric::Decimal(b)) => NumericPair::Decimal(Decimal::from(a), b),
        (Numeric::Decimal(a), Numeric::Integer(b)) => NumericPair::Decimal(a, Decimal::from(b)),
        (Numeric::Decimal(a), Numeric::Decimal(b)) => NumericPair::Decimal(a, b),
        (Numeric::Float(a), Numeric::Float(b)) => NumericPair::Float(a, b),
        (Numeric::Float(a), Numeric::Integer(_) | Numeric::Decimal(_)) => {
            #[allow(clippy::cast_possible_truncation, reason = "Float promotion")]
            NumericPair::Float(a, rhs.to_f64() as f32)
        }
        (Numeric::Integer(_) | Numeric::Decimal(_), Numeric::Float(b)) => {
            #[allow(clippy::cast_possible_truncation, reason = "Float promotion")]
            NumericPair::Float(lhs.to_f64() as f32, b)
        }
        (a, b) => NumericPair::Double(a.to_f64(), b.to_f64()),
    }
}

#[allow(clippy::cast_precision_loss, reason = "Promotion to double")]
fn integer_to_f64(value: Integer) -> f64 {
    i64::from(value) as f64
}

fn decimal_to_f64(value: Decimal) -> f64 {
    f64::from_str(&value.to_string()).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(value: &str, datatype: oxrdf::NamedNodeRef<'_>) -> Literal {
        Literal::new_typed_literal(value, datatype)
    }

    #[test]
    fn parses_derived_integer_types() {
        let literal = typed("42", xsd::INT);
        assert_eq!(
            Numeric::from_literal(literal.as_ref()),
            Ok(Numeric::from(42_i64))
        );
    }

    #[test]
    fn rejects_non_numeric_literals() {
        let literal = Literal::new_simple_literal("42");
        assert!(Numeric::from_literal(literal.as_ref()).is_err());
    }

    #[test]
    fn integer_division_yields_decimal() {
        let result = Numeric::from(3_i64).checked_div(Numeric::from(2_i64)).unwrap();
        assert_eq!(result.into_literal(), typed("1.5", xsd::DECIMAL));
    }

    #[test]
    fn decimal_division_by_zero_is_an_error() {
        assert!(Numeric::from(1_i64).checked_div(Numeric::from(0_i64)).is_err());
    }

    #[test]
    fn promotes_integer_and_double() {
        let result = Numeric::from(1_i64).checked_add(Numeric::Double(0.5)).unwrap();
        assert_eq!(result, Numeric::Double(1.5));
    }

    #[test]
    fn compares_across_types() {
        assert_eq!(
            Numeric::from(2_i64).partial_cmp(&Numeric::Double(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Numeric::Double(f64::NAN).partial_cmp(&Numeric::Double(1.0)),
            None
        );
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(Numeric::Double(2.5).round(), Ok(Numeric::Double(3.0)));
        assert_eq!(Numeric::Double(-2.5).round(), Ok(Numeric::Double(-2.0)));
        assert_eq!(Numeric::from(7_i64).round(), Ok(Numeric::from(7_i64)));
    }
}
