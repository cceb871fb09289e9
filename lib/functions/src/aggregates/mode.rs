use crate::aggregates::Accumulator;
use crate::ExprValue;
use rdf_multiset_model::Term;
use rustc_hash::FxHashMap;

/// The most frequent bound value. Ties are resolved in favor of the value that was seen first.
#[derive(Debug, Default)]
pub(super) struct ModeAccumulator {
    positions: FxHashMap<Term, usize>,
    counts: Vec<(Term, usize)>,
}

impl Accumulator for ModeAccumulator {
    fn update(&mut self, value: ExprValue) {
        let ExprValue::Bound(term) = value else {
            return;
        };

        match self.positions.get(&term) {
            Some(position) => self.counts[*position].1 += 1,
            None => {
                self.positions.insert(term.clone(), self.counts.len());
                self.counts.push((term, 1));
            }
        }
    }

    fn evaluate(self: Box<Self>) -> ExprValue {
        let mut mode: Option<(Term, usize)> = None;
        for (term, count) in self.counts {
            if mode.as_ref().map_or(true, |(_, max)| count > *max) {
                mode = Some((term, count));
            }
        }
        mode.map_or(ExprValue::Unbound, |(term, _)| ExprValue::Bound(term))
    }
}
