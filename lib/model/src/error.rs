use oxiri::IriParseError;
use oxsdatatypes::{ParseDateTimeError, ParseDecimalError};
use std::fmt::{Debug, Display, Formatter};
use std::num::{ParseFloatError, ParseIntError, TryFromIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// Result of evaluating a SPARQL expression or a value-level operation.
pub type ThinResult<T> = Result<T, ThinError>;

/// The SPARQL expression error.
///
/// An expression that fails (a type error, a division by zero, an unparsable lexical form) does
/// not abort the query. `FILTER` drops the solution, `BIND` leaves the variable unbound and an
/// expression grouping puts the solution into its error group. None of these consumers inspect
/// the cause, so the error carries none.
#[derive(Clone, Copy, Debug, Default, Error, PartialEq, Eq, Hash)]
pub struct ThinError {}

impl ThinError {
    /// Shorthand for `Err(ThinError::default())`.
    pub fn expected<T>() -> ThinResult<T> {
        Err(Self {})
    }
}

impl Display for ThinError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("the expression could not be evaluated")
    }
}

/// Lexical form and range errors become expression errors.
macro_rules! into_expression_error {
    ($($t:ty),+ $(,)?) => {
        $(
            impl From<$t> for ThinError {
                fn from(_: $t) -> Self {
                    Self {}
                }
            }
        )+
    };
}

into_expression_error!(
    ParseBoolError,
    ParseIntError,
    ParseFloatError,
    ParseDecimalError,
    ParseDateTimeError,
    IriParseError,
    TryFromIntError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use oxsdatatypes::Integer;
    use std::str::FromStr;

    fn parse_integer(value: &str) -> ThinResult<Integer> {
        Ok(Integer::from_str(value)?)
    }

    #[test]
    fn lexical_errors_convert() {
        assert_eq!(parse_integer("12").map(i64::from), Ok(12));
        assert_eq!(parse_integer("twelve"), ThinError::expected());
    }
}
