use crate::error::StorageError;
use rdf_multiset_model::{
    GraphNameRef, NamedNodeRef, NamedOrBlankNode, Quad, SubjectRef, TermRef,
};

/// An iterator over the quads that match a pattern.
pub type QuadIter<'a> = Box<dyn Iterator<Item = Result<Quad, StorageError>> + 'a>;

/// Provides access to the dataset that queries are evaluated against.
///
/// The engine only requires pattern lookups. Every component of the pattern can either be bound
/// (`Some`) or a wildcard (`None`). A wildcard `graph_name` matches quads in any graph, including
/// the default graph.
#[allow(clippy::len_without_is_empty)]
pub trait TripleSource: Send + Sync {
    /// Returns all quads that match the given pattern.
    fn quads_for_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> QuadIter<'_>;

    /// Returns the list of named graphs in the source.
    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Returns the number of quads in the source.
    fn len(&self) -> Result<usize, StorageError>;
}
