use crate::aggregates::Accumulator;
use crate::ExprValue;
use rdf_multiset_model::Term;

/// Returns the first bound value.
#[derive(Debug, Default)]
pub(super) struct SampleAccumulator {
    value: Option<Term>,
}

impl Accumulator for SampleAccumulator {
    fn update(&mut self, value: ExprValue) {
        if let ExprValue::Bound(term) = value {
            self.value = Some(term);
        }
    }

    fn is_done(&self) -> bool {
        self.value.is_some()
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        self.value.map_or(ExprValue::Unbound, ExprValue::Bound)
    }
}
