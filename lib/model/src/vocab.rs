//! Vocabularies used by the engine in addition to the ones provided by [oxrdf::vocab].

pub use oxrdf::vocab::{rdf, xsd};

/// Predicates of statistics graphs that seed the selectivity model of the optimiser.
pub mod opt {
    use oxrdf::NamedNodeRef;

    /// The namespace of the optimiser vocabulary.
    pub const NAMESPACE: &str = "http://rdf-multiset.org/optimiser#";

    /// Number of triples in which a term occurs as the subject.
    pub const SUBJECT_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/optimiser#subjectCount");
    /// Number of triples in which a term occurs as the predicate.
    pub const PREDICATE_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/optimiser#predicateCount");
    /// Number of triples in which a term occurs as the object.
    pub const OBJECT_COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/optimiser#objectCount");
    /// A count that applies to all three roles at once.
    pub const COUNT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/optimiser#count");
}

/// Custom aggregate functions that are available in addition to the SPARQL built-ins.
pub mod agg {
    use oxrdf::NamedNodeRef;

    /// The namespace of the custom aggregates.
    pub const NAMESPACE: &str = "http://rdf-multiset.org/aggregates#";

    /// True iff the expression is true for every member of the group.
    pub const ALL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/aggregates#all");
    /// True iff the expression is true for at least one member of the group.
    pub const ANY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/aggregates#any");
    /// True iff the expression is true for no member of the group.
    pub const NONE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/aggregates#none");
    /// The most frequent value of the group.
    pub const MODE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/aggregates#mode");
    /// The numeric median of the group.
    pub const MEDIAN: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdf-multiset.org/aggregates#median");
}
