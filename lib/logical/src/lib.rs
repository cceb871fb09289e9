//! The logical layer of RDF Multiset.
//!
//! Everything in this crate operates on the algebra tree of `spargebra` before it is evaluated:
//! property paths are lowered to basic graph patterns and the triple patterns of basic graph
//! patterns are reordered by their estimated selectivity.

mod active_graph;
pub mod optimizer;
pub mod paths;
pub mod patterns;
mod rewrite;

pub use active_graph::ActiveGraph;
pub use rewrite::transform_up;
