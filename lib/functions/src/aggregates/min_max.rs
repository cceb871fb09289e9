use crate::aggregates::Accumulator;
use crate::ExprValue;
use rdf_multiset_model::{cmp_terms, Term};
use std::cmp::Ordering;

/// Keeps the smallest or largest value according to the total order of terms. Errors and unbound
/// values are skipped. The result of an empty group is unbound.
#[derive(Debug)]
pub(super) struct MinMaxAccumulator {
    replace_on: Ordering,
    current: Option<Term>,
}

impl MinMaxAccumulator {
    pub fn min() -> Self {
        Self {
            replace_on: Ordering::Less,
            current: None,
        }
    }

    pub fn max() -> Self {
        Self {
            replace_on: Ordering::Greater,
            current: None,
        }
    }
}

impl Accumulator for MinMaxAccumulator {
    fn update(&mut self, value: ExprValue) {
        let ExprValue::Bound(term) = value else {
            return;
        };

        let replace = self.current.as_ref().map_or(true, |current| {
            cmp_terms(Some(term.as_ref()), Some(current.as_ref())) == self.replace_on
        });
        if replace {
            self.current = Some(term);
        }
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        self.current.map_or(ExprValue::Unbound, ExprValue::Bound)
    }
}
