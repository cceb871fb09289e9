//! Classification of triple patterns by their bound positions.

use rdf_multiset_common::BlankNodeMatchingMode;
use rdf_multiset_model::{
    NamedNodePattern, NamedNodeRef, TermPattern, TermRef, TriplePattern, VariableRef,
};

/// The shape of a triple pattern, i.e., which of its positions are bound to a term.
///
/// Each variant carries exactly the bound terms of its shape. Variables (and blank nodes, unless
/// they are matched as constants) are not part of the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternShape<'a> {
    /// `?s ?p ?o`
    AllVariables,
    /// `<s> ?p ?o`
    Subject(TermRef<'a>),
    /// `?s <p> ?o`
    Predicate(NamedNodeRef<'a>),
    /// `?s ?p <o>`
    Object(TermRef<'a>),
    /// `<s> <p> ?o`
    SubjectPredicate(TermRef<'a>, NamedNodeRef<'a>),
    /// `<s> ?p <o>`
    SubjectObject(TermRef<'a>, TermRef<'a>),
    /// `?s <p> <o>`
    PredicateObject(NamedNodeRef<'a>, TermRef<'a>),
    /// `<s> <p> <o>`
    NoVariables(TermRef<'a>, NamedNodeRef<'a>, TermRef<'a>),
}

impl<'a> PatternShape<'a> {
    /// Classifies the given `pattern`.
    pub fn of(pattern: &'a TriplePattern, blank_node_mode: BlankNodeMatchingMode) -> Self {
        let subject = bound_term(&pattern.subject, blank_node_mode);
        let predicate = match &pattern.predicate {
            NamedNodePattern::NamedNode(node) => Some(node.as_ref()),
            NamedNodePattern::Variable(_) => None,
        };
        let object = bound_term(&pattern.object, blank_node_mode);

        match (subject, predicate, object) {
            (None, None, None) => PatternShape::AllVariables,
            (Some(s), None, None) => PatternShape::Subject(s),
            (None, Some(p), None) => PatternShape::Predicate(p),
            (None, None, Some(o)) => PatternShape::Object(o),
            (Some(s), Some(p), None) => PatternShape::SubjectPredicate(s, p),
            (Some(s), None, Some(o)) => PatternShape::SubjectObject(s, o),
            (None, Some(p), Some(o)) => PatternShape::PredicateObject(p, o),
            (Some(s), Some(p), Some(o)) => PatternShape::NoVariables(s, p, o),
        }
    }

    /// Returns the number of bound positions.
    pub fn bound_count(&self) -> usize {
        match self {
            PatternShape::AllVariables => 0,
            PatternShape::Subject(_) | PatternShape::Predicate(_) | PatternShape::Object(_) => 1,
            PatternShape::SubjectPredicate(..)
            | PatternShape::SubjectObject(..)
            | PatternShape::PredicateObject(..) => 2,
            PatternShape::NoVariables(..) => 3,
        }
    }
}

/// Returns the term of a position if the position acts as a constant.
pub fn bound_term(
    pattern: &TermPattern,
    blank_node_mode: BlankNodeMatchingMode,
) -> Option<TermRef<'_>> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.as_ref().into()),
        TermPattern::Literal(literal) => Some(literal.as_ref().into()),
        TermPattern::BlankNode(node) if blank_node_mode == BlankNodeMatchingMode::Filter => {
            Some(node.as_ref().into())
        }
        _ => None,
    }
}

/// Returns the variables of a triple pattern in the order subject, predicate, object.
///
/// Blank nodes that are matched like variables are not included.
pub fn pattern_variables(pattern: &TriplePattern) -> impl Iterator<Item = VariableRef<'_>> {
    let subject = match &pattern.subject {
        TermPattern::Variable(v) => Some(v.as_ref()),
        _ => None,
    };
    let predicate = match &pattern.predicate {
        NamedNodePattern::Variable(v) => Some(v.as_ref()),
        NamedNodePattern::NamedNode(_) => None,
    };
    let object = match &pattern.object {
        TermPattern::Variable(v) => Some(v.as_ref()),
        _ => None,
    };
    [subject, predicate, object].into_iter().flatten()
}
