//! Lowering of property paths to basic graph patterns.
//!
//! Paths that consist only of predicates, inverse paths, sequences and alternatives can be
//! expressed with ordinary triple patterns joined on temporary variables. The remaining operators
//! (`*`, `+`, `?` and negated property sets) are kept as path patterns and must be evaluated by
//! a path-aware evaluator.

mod context;
mod transformer;

pub use context::*;
pub use transformer::*;

use crate::transform_up;
use rdf_multiset_common::error::QueryEvaluationError;
use rdf_multiset_model::GraphPattern;

/// Lowers all property paths in the tree that can be expressed with triple patterns.
pub fn lower_paths(pattern: GraphPattern) -> Result<GraphPattern, QueryEvaluationError> {
    let mut transformer = PathTransformer::new();
    transform_up(pattern, &mut |pattern| match pattern {
        GraphPattern::Path {
            subject,
            path,
            object,
        } if PathTransformer::is_lowerable(&path) => {
            transformer.transform(&subject, &path, &object)
        }
        pattern => Ok(pattern),
    })
}
