//! Orderings over RDF terms.
//!
//! SPARQL only defines a partial order over terms. For sorting and for deterministic tie-breaks
//! the engine needs a total order, which is defined here:
//!
//! ```text
//! unbound < blank nodes < IRIs < literals
//! ```
//!
//! Two flavors exist. [cmp_terms] compares literals by their value if both values are comparable
//! (e.g., two numerics) and falls back to the lexical order otherwise. [fast_cmp_terms] never
//! interprets literals and is therefore cheaper.

use crate::xsd::{boolean_from_literal, Numeric};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{LiteralRef, TermRef};
use oxsdatatypes::DateTime;
use std::cmp::Ordering;
use std::str::FromStr;

/// Compares two (possibly unbound) terms with the standard total order.
pub fn cmp_terms(lhs: Option<TermRef<'_>>, rhs: Option<TermRef<'_>>) -> Ordering {
    match (lhs, rhs) {
        (Some(TermRef::Literal(lhs)), Some(TermRef::Literal(rhs))) => {
            match partial_cmp_literal_values(lhs, rhs) {
                Some(ordering) if ordering.is_ne() => ordering,
                _ => cmp_literals_lexically(lhs, rhs),
            }
        }
        (lhs, rhs) => cmp_non_literals(lhs, rhs),
    }
}

/// Compares two (possibly unbound) terms without interpreting the values of literals.
///
/// Literals are ordered plain < language-tagged < typed and then by their lexical form. All other
/// comparisons are delegated to [cmp_terms].
pub fn fast_cmp_terms(lhs: Option<TermRef<'_>>, rhs: Option<TermRef<'_>>) -> Ordering {
    match (lhs, rhs) {
        (Some(TermRef::Literal(lhs)), Some(TermRef::Literal(rhs))) => {
            cmp_literals_lexically(lhs, rhs)
        }
        (lhs, rhs) => cmp_terms(lhs, rhs),
    }
}

/// Orders literals by their kind (plain < language-tagged < typed), then by their lexical form,
/// and finally by their language tag or datatype.
pub fn cmp_literals_lexically(lhs: LiteralRef<'_>, rhs: LiteralRef<'_>) -> Ordering {
    literal_kind_rank(lhs)
        .cmp(&literal_kind_rank(rhs))
        .then_with(|| lhs.value().cmp(rhs.value()))
        .then_with(|| lhs.language().cmp(&rhs.language()))
        .then_with(|| lhs.datatype().as_str().cmp(rhs.datatype().as_str()))
}

/// Compares the values of two literals. Returns [None] if the values are not comparable (e.g., a
/// string and a number).
pub fn partial_cmp_literal_values(lhs: LiteralRef<'_>, rhs: LiteralRef<'_>) -> Option<Ordering> {
    if let (Ok(lhs), Ok(rhs)) = (Numeric::from_literal(lhs), Numeric::from_literal(rhs)) {
        return lhs.partial_cmp(&rhs);
    }

    let lhs_datatype = lhs.datatype();
    let rhs_datatype = rhs.datatype();
    if lhs_datatype == xsd::STRING && rhs_datatype == xsd::STRING {
        return Some(lhs.value().cmp(rhs.value()));
    }
    if lhs_datatype == rdf::LANG_STRING && rhs_datatype == rdf::LANG_STRING {
        return (lhs.language() == rhs.language()).then(|| lhs.value().cmp(rhs.value()));
    }
    if lhs_datatype == xsd::BOOLEAN && rhs_datatype == xsd::BOOLEAN {
        let lhs = boolean_from_literal(lhs).ok()?;
        let rhs = boolean_from_literal(rhs).ok()?;
        return Some(lhs.cmp(&rhs));
    }
    if lhs_datatype == xsd::DATE_TIME && rhs_datatype == xsd::DATE_TIME {
        let lhs = DateTime::from_str(lhs.value()).ok()?;
        let rhs = DateTime::from_str(rhs.value()).ok()?;
        return lhs.partial_cmp(&rhs);
    }
    None
}

fn cmp_non_literals(lhs: Option<TermRef<'_>>, rhs: Option<TermRef<'_>>) -> Ordering {
    term_kind_rank(lhs)
        .cmp(&term_kind_rank(rhs))
        .then_with(|| match (lhs, rhs) {
            (Some(TermRef::BlankNode(lhs)), Some(TermRef::BlankNode(rhs))) => {
                lhs.as_str().cmp(rhs.as_str())
            }
            (Some(TermRef::NamedNode(lhs)), Some(TermRef::NamedNode(rhs))) => {
                lhs.as_str().cmp(rhs.as_str())
            }
            _ => Ordering::Equal,
        })
}

fn term_kind_rank(term: Option<TermRef<'_>>) -> u8 {
    match term {
        None => 0,
        Some(TermRef::BlankNode(_)) => 1,
        Some(TermRef::NamedNode(_)) => 2,
        Some(TermRef::Literal(_)) => 3,
    }
}

fn literal_kind_rank(literal: LiteralRef<'_>) -> u8 {
    if literal.language().is_some() {
        1
    } else if literal.datatype() == xsd::STRING {
        0
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode, Term};

    fn integer(value: &str) -> Term {
        Literal::new_typed_literal(value, xsd::INTEGER).into()
    }

    #[test]
    fn orders_term_kinds() {
        let blank = Term::from(BlankNode::new_unchecked("b"));
        let iri = Term::from(NamedNode::new_unchecked("http://example.com/a"));
        let literal = Term::from(Literal::new_simple_literal("a"));

        assert_eq!(cmp_terms(None, Some(blank.as_ref())), Ordering::Less);
        assert_eq!(
            cmp_terms(Some(blank.as_ref()), Some(iri.as_ref())),
            Ordering::Less
        );
        assert_eq!(
            cmp_terms(Some(literal.as_ref()), Some(iri.as_ref())),
            Ordering::Greater
        );
    }

    #[test]
    fn standard_order_compares_numeric_values() {
        let ten = integer("10");
        let nine = integer("9");
        assert_eq!(
            cmp_terms(Some(nine.as_ref()), Some(ten.as_ref())),
            Ordering::Less
        );
    }

    #[test]
    fn fast_order_compares_lexical_forms() {
        let ten = integer("10");
        let nine = integer("9");
        assert_eq!(
            fast_cmp_terms(Some(nine.as_ref()), Some(ten.as_ref())),
            Ordering::Greater
        );
    }

    #[test]
    fn fast_order_ranks_literal_kinds() {
        let plain = Term::from(Literal::new_simple_literal("z"));
        let tagged = Term::from(Literal::new_language_tagged_literal_unchecked("a", "en"));
        let typed = integer("0");

        assert_eq!(
            fast_cmp_terms(Some(plain.as_ref()), Some(tagged.as_ref())),
            Ordering::Less
        );
        assert_eq!(
            fast_cmp_terms(Some(tagged.as_ref()), Some(typed.as_ref())),
            Ordering::Less
        );
    }

    #[test]
    fn equal_values_with_different_lexical_forms_are_not_equal() {
        let one = integer("1");
        let padded = integer("01");
        assert_ne!(
            cmp_terms(Some(one.as_ref()), Some(padded.as_ref())),
            Ordering::Equal
        );
    }
}
