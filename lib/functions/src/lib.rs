//! SPARQL expressions and aggregate functions of RDF Multiset.
//!
//! Expressions are evaluated for a single solution, identified by a
//! [BindingId](rdf_multiset_common::BindingId), within an [EvaluationContext]. The result is an
//! explicit [ExprValue] that distinguishes unbound values from errors.

pub mod aggregates;
mod context;
mod evaluator;
mod scalar;
mod value;

pub use context::EvaluationContext;
pub use evaluator::ExpressionEvaluator;
pub use scalar::effective_boolean_value;
pub use value::ExprValue;
