mod error;
mod term_order;
pub mod vocab;
mod xsd;

pub use error::*;
pub use term_order::*;
pub use xsd::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxsdatatypes::{DateTime, Decimal, Integer};
pub use oxrdf::{
    BlankNode, BlankNodeRef, Graph, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermParseError, TermRef, Triple, TripleRef, Variable,
    VariableNameParseError, VariableRef,
};

// Re-export the algebra of spargebra. The algebra tree is the contract between the parser and
// the engine.
pub use spargebra::algebra::{
    AggregateExpression, AggregateFunction, Expression, Function, GraphPattern, OrderExpression,
    PropertyPathExpression, QueryDataset,
};
pub use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};
pub use spargebra::{Query, SparqlSyntaxError};
