use rdf_multiset_model::SparqlSyntaxError;
use std::error::Error;
use std::time::Duration;

/// An error related to storage operations (reads, writes...).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The storage was poisoned by a panicking writer.
    #[error("The storage lock has been poisoned")]
    Poisoned,
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StorageError {
    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self::Other(msg.into().into())
    }
}

/// A SPARQL evaluation error.
///
/// Errors that are *expected* during the evaluation of a single expression (e.g., a type error)
/// are not represented by this type. They are local to a single solution and handled by the
/// expression evaluator. A [QueryEvaluationError] always aborts the evaluation of the query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// An error in SPARQL parsing.
    #[error(transparent)]
    Parsing(#[from] SparqlSyntaxError),
    /// An error from the storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// An error that occurred while evaluating a sub-query.
    #[error("Error while evaluating a sub-query: {0}")]
    SubQuery(#[source] Box<QueryEvaluationError>),
    /// The evaluation exceeded its deadline.
    #[error("The query evaluation exceeded the timeout of {0:?}")]
    Timeout(Duration),
    #[error("A feature has not yet been implemented: {0}")]
    NotImplemented(String),
    #[error("An internal error that likely indicates towards a bug in RdfMultiset: {0}")]
    InternalError(String),
}

impl QueryEvaluationError {
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::InternalError(cause.into()))
    }

    pub fn not_implemented<T>(feature: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::NotImplemented(feature.into()))
    }

    /// Wraps this error to indicate that it occurred inside a sub-query.
    #[must_use]
    pub fn in_sub_query(self) -> Self {
        QueryEvaluationError::SubQuery(Box::new(self))
    }
}
