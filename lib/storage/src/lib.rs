//! Storage layers that can be queried by the evaluator of RDF Multiset.
//!
//! Each storage implements [TripleSource](rdf_multiset_common::TripleSource).

mod memory;

pub use memory::MemDataset;
