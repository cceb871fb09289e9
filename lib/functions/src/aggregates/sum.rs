use crate::aggregates::Accumulator;
use crate::scalar::numeric::{numeric, numeric_term};
use crate::ExprValue;
use rdf_multiset_model::{Numeric, ThinError, ThinResult};

/// Sums numeric values. Unbound values are skipped, any other non-numeric value turns the result
/// into an error.
#[derive(Debug)]
pub(super) struct SumAccumulator {
    sum: ThinResult<Numeric>,
}

impl Default for SumAccumulator {
    fn default() -> Self {
        Self {
            sum: Ok(Numeric::from(0_i64)),
        }
    }
}

impl Accumulator for SumAccumulator {
    fn update(&mut self, value: ExprValue) {
        self.sum = match (&self.sum, value) {
            (Ok(sum), ExprValue::Bound(term)) => numeric(&term).and_then(|n| sum.checked_add(n)),
            (Ok(_), ExprValue::Unbound) => return,
            _ => ThinError::expected(),
        };
    }

    fn is_done(&self) -> bool {
        self.sum.is_err()
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        self.sum.map(numeric_term).into()
    }
}
