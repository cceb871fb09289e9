use crate::aggregates::Accumulator;
use crate::scalar::numeric::{numeric, numeric_term};
use crate::ExprValue;
use rdf_multiset_model::{Numeric, ThinError, ThinResult};
use std::cmp::Ordering;

/// The median of numeric values. For an even number of values, the two middle values are
/// averaged. Unbound values are skipped, any non-numeric value turns the result into an error.
#[derive(Debug)]
pub(super) struct MedianAccumulator {
    values: ThinResult<Vec<Numeric>>,
}

impl Default for MedianAccumulator {
    fn default() -> Self {
        Self {
            values: Ok(Vec::new()),
        }
    }
}

impl Accumulator for MedianAccumulator {
    fn update(&mut self, value: ExprValue) {
        let Ok(values) = &mut self.values else {
            return;
        };

        let number = match value {
            ExprValue::Bound(term) => numeric(&term),
            ExprValue::Unbound => return,
            ExprValue::Error => ThinError::expected(),
        };
        match number {
            Ok(number) => values.push(number),
            Err(error) => self.values = Err(error),
        }
    }

    fn is_done(&self) -> bool {
        self.values.is_err()
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        let Ok(mut values) = self.values else {
            return ExprValue::Error;
        };
        if values.is_empty() {
            return ExprValue::Unbound;
        }

        values.sort_by(|lhs, rhs| lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal));
        let middle = values.len() / 2;
        let median = if values.len() % 2 == 1 {
            Ok(values[middle])
        } else {
            values[middle - 1]
                .checked_add(values[middle])
                .and_then(|sum| sum.checked_div(Numeric::from(2_i64)))
        };
        median.map(numeric_term).into()
    }
}
