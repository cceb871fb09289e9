use crate::aggregates::Accumulator;
use crate::scalar::numeric::{numeric, numeric_term};
use crate::ExprValue;
use rdf_multiset_model::{Numeric, ThinError, ThinResult};

/// Averages numeric values. The average of an empty group is `0`.
#[derive(Debug)]
pub(super) struct AvgAccumulator {
    sum: ThinResult<Numeric>,
    count: i64,
}

impl Default for AvgAccumulator {
    fn default() -> Self {
        Self {
            sum: Ok(Numeric::from(0_i64)),
            count: 0,
        }
    }
}

impl Accumulator for AvgAccumulator {
    fn update(&mut self, value: ExprValue) {
        self.sum = match (&self.sum, value) {
            (Ok(sum), ExprValue::Bound(term)) => numeric(&term).and_then(|n| sum.checked_add(n)),
            (Ok(_), ExprValue::Unbound) => return,
            _ => ThinError::expected(),
        };
        self.count += 1;
    }

    fn is_done(&self) -> bool {
        self.sum.is_err()
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        let result = self.sum.and_then(|sum| {
            if self.count == 0 {
                Ok(sum)
            } else {
                sum.checked_div(Numeric::from(self.count))
            }
        });
        result.map(numeric_term).into()
    }
}
