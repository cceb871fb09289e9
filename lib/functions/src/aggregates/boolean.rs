//! Quantifiers over the effective boolean values of a group.

use crate::aggregates::Accumulator;
use crate::scalar::effective_boolean_value;
use crate::ExprValue;
use rdf_multiset_model::{ThinError, ThinResult};

fn truth(value: &ExprValue) -> ThinResult<bool> {
    match value {
        ExprValue::Bound(term) => effective_boolean_value(term.as_ref()),
        ExprValue::Unbound | ExprValue::Error => ThinError::expected(),
    }
}

/// True iff every value is true. Stops at the first false value or error.
#[derive(Debug)]
pub(super) struct AllAccumulator {
    result: bool,
}

impl Default for AllAccumulator {
    fn default() -> Self {
        Self { result: true }
    }
}

impl Accumulator for AllAccumulator {
    fn update(&mut self, value: ExprValue) {
        if truth(&value) != Ok(true) {
            self.result = false;
        }
    }

    fn is_done(&self) -> bool {
        !self.result
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        self.result.into()
    }
}

/// True iff at least one value is true. Errors are skipped.
#[derive(Debug, Default)]
pub(super) struct AnyAccumulator {
    result: bool,
}

impl Accumulator for AnyAccumulator {
    fn update(&mut self, value: ExprValue) {
        if truth(&value) == Ok(true) {
            self.result = true;
        }
    }

    fn is_done(&self) -> bool {
        self.result
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        self.result.into()
    }
}

/// True iff no value is true. Errors are skipped.
#[derive(Debug, Default)]
pub(super) struct NoneAccumulator {
    found: bool,
}

impl Accumulator for NoneAccumulator {
    fn update(&mut self, value: ExprValue) {
        if truth(&value) == Ok(true) {
            self.found = true;
        }
    }

    fn is_done(&self) -> bool {
        self.found
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        (!self.found).into()
    }
}
