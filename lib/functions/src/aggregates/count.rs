use crate::aggregates::Accumulator;
use crate::ExprValue;
use rdf_multiset_model::{integer_literal, Literal};

/// Counts the bound values.
#[derive(Debug, Default)]
pub(super) struct CountAccumulator {
    count: usize,
}

impl Accumulator for CountAccumulator {
    fn update(&mut self, value: ExprValue) {
        if value.is_bound() {
            self.count += 1;
        }
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        count_literal(self.count).into()
    }
}

pub(super) fn count_literal(count: usize) -> Literal {
    integer_literal(i64::try_from(count).unwrap_or(i64::MAX))
}
