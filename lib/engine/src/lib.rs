//! The evaluator of RDF Multiset.
//!
//! Graph patterns are evaluated bottom-up into solution [Multiset]s. Solutions are addressed by
//! [BindingId](rdf_multiset_common::BindingId)s, which the [group] module and the aggregate
//! functions use to read values without copying solutions.

pub mod eval;
pub mod group;
mod multiset;
pub mod results;

pub use eval::QueryEvaluator;
pub use multiset::{Bag, Multiset, Values};
pub use results::{QueryResults, QuerySolution, QuerySolutions};
