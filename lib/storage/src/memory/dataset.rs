use crate::memory::content::Content;
use crate::memory::statistics::StatisticsBuilder;
use rdf_multiset_common::error::StorageError;
use rdf_multiset_common::{QuadIter, TripleSource};
use rdf_multiset_model::{
    Graph, GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef,
    SubjectRef, TermRef,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A simple in-memory RDF dataset.
///
/// Quads are indexed by each of their components. Lookups scan the smallest index that matches
/// a bound component of the pattern. Results are returned in insertion order, which makes
/// evaluation deterministic.
#[derive(Debug, Default)]
pub struct MemDataset {
    content: RwLock<Content>,
}

impl MemDataset {
    /// Creates a new empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single quad. Returns `false` if the quad was already present.
    pub fn insert<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        Ok(self.write()?.insert(quad.into()))
    }

    /// Inserts the given quads and returns the number of quads that were not yet present.
    pub fn insert_quads(
        &self,
        quads: impl IntoIterator<Item = Quad>,
    ) -> Result<usize, StorageError> {
        let mut content = self.write()?;
        Ok(quads
            .into_iter()
            .filter(|quad| content.insert(quad.as_ref()))
            .count())
    }

    /// Inserts all triples of the graph into the default graph.
    pub fn extend(&self, graph: &Graph) -> Result<usize, StorageError> {
        let mut content = self.write()?;
        Ok(graph
            .iter()
            .filter(|triple| content.insert(triple.in_graph(GraphNameRef::DefaultGraph)))
            .count())
    }

    /// Removes a single quad. Returns `false` if the quad was not present.
    pub fn remove<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        Ok(self.write()?.remove(quad.into()))
    }

    pub fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        Ok(self.read()?.contains(quad.into()))
    }

    /// Declares an (empty) named graph.
    pub fn insert_named_graph<'a>(
        &self,
        graph: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        Ok(self.write()?.add_named_graph(graph.into().into_owned()))
    }

    /// Removes a named graph together with all of its quads.
    pub fn remove_named_graph<'a>(
        &self,
        graph: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        Ok(self.write()?.remove_named_graph(graph.into()))
    }

    pub fn contains_named_graph<'a>(
        &self,
        graph: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        Ok(self.read()?.contains_named_graph(graph.into()))
    }

    /// Removes all quads and named graphs.
    pub fn clear(&self) -> Result<(), StorageError> {
        *self.write()? = Content::default();
        Ok(())
    }

    /// Creates an independent copy of the current state of the dataset.
    pub fn snapshot(&self) -> Result<MemDataset, StorageError> {
        let content = self.read()?.clone();
        Ok(MemDataset {
            content: RwLock::new(content),
        })
    }

    /// Checks the internal consistency of the indexes.
    pub fn validate(&self) -> Result<(), StorageError> {
        self.read()?.validate().map_err(StorageError::msg)
    }

    /// Creates a statistics graph that can seed the selectivity model of the optimiser.
    ///
    /// For each term and each position (subject, predicate, object), the graph contains a triple
    /// `term opt:<position>Count n` where `n` is the number of quads that contain the term in this
    /// position. Literals cannot be the subject of a triple and are therefore not described.
    pub fn statistics_graph(&self) -> Result<Graph, StorageError> {
        let content = self.read()?;
        let mut builder = StatisticsBuilder::default();
        for quad in content.quads() {
            builder.record(quad.as_ref());
        }
        let graph = builder.build();
        tracing::debug!("Computed statistics graph with {} triples.", graph.len());
        Ok(graph)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Content>, StorageError> {
        self.content.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Content>, StorageError> {
        self.content.write().map_err(|_| StorageError::Poisoned)
    }
}

impl TripleSource for MemDataset {
    fn quads_for_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
        graph_name: Option<GraphNameRef<'_>>,
    ) -> QuadIter<'_> {
        match self.read() {
            Ok(content) => Box::new(
                content
                    .matching(subject, predicate, object, graph_name)
                    .into_iter()
                    .map(Ok),
            ),
            Err(error) => Box::new(std::iter::once(Err(error))),
        }
    }

    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        Ok(self.read()?.named_graphs().to_vec())
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.len())
    }
}

impl FromIterator<Quad> for MemDataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        let mut content = Content::default();
        for quad in iter {
            content.insert(quad.as_ref());
        }
        Self {
            content: RwLock::new(content),
        }
    }
}
