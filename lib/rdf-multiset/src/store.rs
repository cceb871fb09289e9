//! API to query an in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
//!
//! The entry point of the module is the [`Store`] struct.
//!
//! Usage example:
//! ```
//! use rdf_multiset::engine::QueryResults;
//! use rdf_multiset::model::*;
//! use rdf_multiset::store::Store;
//!
//! let store = Store::new();
//!
//! // insertion
//! let ex = NamedNode::new("http://example.com")?;
//! let quad = Quad::new(ex.clone(), ex.clone(), ex.clone(), GraphName::DefaultGraph);
//! store.insert(&quad)?;
//!
//! // SPARQL query
//! if let QueryResults::Solutions(solutions) = store.query("SELECT ?s WHERE { ?s ?p ?o }")? {
//!     assert_eq!(solutions.column("s"), vec![Some(&Term::from(ex))]);
//! };
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use rdf_multiset_common::error::{QueryEvaluationError, StorageError};
use rdf_multiset_common::{QueryOptions, TripleSource};
use rdf_multiset_engine::{QueryEvaluator, QueryResults};
use rdf_multiset_logical::optimizer::Weightings;
use rdf_multiset_model::{Graph, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Query};
use std::sync::Arc;

/// An in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) that can
/// be queried with [SPARQL](https://www.w3.org/TR/sparql11-query).
///
/// The store owns the default [QueryOptions] and, once statistics have been loaded, the
/// [Weightings] that the optimiser uses to reorder basic graph patterns. Cloning a store is cheap
/// and the clone shares the dataset.
#[derive(Clone, Debug, Default)]
pub struct Store {
    dataset: Arc<rdf_multiset_storage::MemDataset>,
    weightings: Option<Arc<Weightings>>,
    options: QueryOptions,
}

impl Store {
    /// Creates an empty [Store] with the default [QueryOptions].
    pub fn new() -> Store {
        Self::default()
    }

    /// Creates an empty [Store] that evaluates queries with `options` unless other options are
    /// passed to [Store::query_opt].
    pub fn with_options(options: QueryOptions) -> Store {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns the underlying dataset.
    pub fn dataset(&self) -> &rdf_multiset_storage::MemDataset {
        &self.dataset
    }

    /// Returns the default options of this store.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Returns the loaded selectivity model, if any.
    pub fn weightings(&self) -> Option<&Arc<Weightings>> {
        self.weightings.as_ref()
    }

    /// Executes a [SPARQL](https://www.w3.org/TR/sparql11-query/) query with the default options
    /// of this store.
    ///
    /// Usage example:
    /// ```
    /// use rdf_multiset::engine::QueryResults;
    /// use rdf_multiset::store::Store;
    ///
    /// let store = Store::new();
    /// assert_eq!(store.query("ASK { ?s ?p ?o }")?, QueryResults::Boolean(false));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn query(
        &self,
        query: impl TryInto<Query, Error = impl Into<QueryEvaluationError>>,
    ) -> Result<QueryResults, QueryEvaluationError> {
        self.query_opt(query, self.options.clone())
    }

    /// Executes a [SPARQL](https://www.w3.org/TR/sparql11-query/) query with some options.
    pub fn query_opt(
        &self,
        query: impl TryInto<Query, Error = impl Into<QueryEvaluationError>>,
        options: QueryOptions,
    ) -> Result<QueryResults, QueryEvaluationError> {
        match query.try_into() {
            Ok(query) => self.evaluate_opt(&query, options),
            Err(err) => Err(err.into()),
        }
    }

    /// Evaluates an already parsed query with the default options of this store.
    ///
    /// This is the only way to use algebra that has no SPARQL syntax, for example custom
    /// aggregates built by hand.
    pub fn evaluate(&self, query: &Query) -> Result<QueryResults, QueryEvaluationError> {
        self.evaluate_opt(query, self.options.clone())
    }

    pub fn evaluate_opt(
        &self,
        query: &Query,
        options: QueryOptions,
    ) -> Result<QueryResults, QueryEvaluationError> {
        let mut evaluator = QueryEvaluator::new(self.dataset.as_ref(), options);
        if let Some(weightings) = &self.weightings {
            evaluator = evaluator.with_weightings(Arc::clone(weightings));
        }
        evaluator.evaluate(query)
    }

    /// Replaces the selectivity model of the optimiser with one that is built from the given
    /// statistics graph.
    ///
    /// The statistics are only used with [OptimizationLevel::Full](rdf_multiset_common::OptimizationLevel::Full).
    pub fn load_statistics(&mut self, statistics: &Graph) {
        let weightings = Weightings::from_statistics_graph(statistics);
        tracing::debug!("Replacing the weightings of the store.");
        self.weightings = Some(Arc::new(weightings));
    }

    /// Computes the statistics of the current content of the store and loads them.
    pub fn refresh_statistics(&mut self) -> Result<(), StorageError> {
        let statistics = self.dataset.statistics_graph()?;
        self.load_statistics(&statistics);
        Ok(())
    }

    /// Removes the selectivity model such that the optimiser falls back to structural heuristics.
    pub fn clear_statistics(&mut self) {
        self.weightings = None;
    }

    /// Adds a quad to this store. Returns `false` if the quad was already present.
    pub fn insert<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.dataset.insert(quad)
    }

    /// Adds the quads to this store and returns the number of new quads.
    pub fn extend(&self, quads: impl IntoIterator<Item = Quad>) -> Result<usize, StorageError> {
        self.dataset.insert_quads(quads)
    }

    /// Adds the triples of `graph` to the default graph of this store.
    pub fn extend_default_graph(&self, graph: &Graph) -> Result<usize, StorageError> {
        self.dataset.extend(graph)
    }

    /// Removes a quad from this store. Returns `false` if the quad was not present.
    pub fn remove<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.dataset.remove(quad)
    }

    pub fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.dataset.contains(quad)
    }

    /// Declares a named graph, even if it contains no quads.
    pub fn insert_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.dataset.insert_named_graph(graph_name)
    }

    /// Removes a named graph together with its quads.
    pub fn remove_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.dataset.remove_named_graph(graph_name)
    }

    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.dataset.named_graphs()
    }

    /// Returns the number of quads in the store.
    pub fn len(&self) -> Result<usize, StorageError> {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Removes all quads and named graphs. The loaded statistics are kept.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.dataset.clear()
    }
}
