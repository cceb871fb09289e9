use crate::aggregates::Accumulator;
use crate::scalar::strings::{string_term, StringArg};
use crate::ExprValue;
use rdf_multiset_model::{ThinError, ThinResult};

/// Concatenates the lexical forms of string values.
///
/// The result keeps the language tag if all values share the same one.
#[derive(Debug)]
pub(super) struct GroupConcatAccumulator {
    separator: String,
    value: ThinResult<String>,
    count: usize,
    language: Option<String>,
}

impl GroupConcatAccumulator {
    pub fn new(separator: String) -> Self {
        Self {
            separator,
            value: Ok(String::new()),
            count: 0,
            language: None,
        }
    }
}

impl Accumulator for GroupConcatAccumulator {
    fn update(&mut self, value: ExprValue) {
        let term = match value {
            ExprValue::Bound(term) => term,
            ExprValue::Unbound => return,
            ExprValue::Error => {
                self.value = ThinError::expected();
                return;
            }
        };
        let Ok(arg) = StringArg::try_from_term(&term) else {
            self.value = ThinError::expected();
            return;
        };

        if self.count == 0 {
            self.language = arg.language.map(ToOwned::to_owned);
        } else if self.language.as_deref() != arg.language {
            self.language = None;
        }

        if let Ok(concat) = &mut self.value {
            if self.count > 0 {
                concat.push_str(&self.separator);
            }
            concat.push_str(arg.value);
        }
        self.count += 1;
    }

    fn is_done(&self) -> bool {
        self.value.is_err()
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        let language = self.language;
        self.value
            .map(|value| string_term(value, language.as_deref()))
            .into()
    }
}
