use crate::scalar::strings::StringArg;
use rdf_multiset_model::vocab::xsd;
use rdf_multiset_model::{
    is_numeric_datatype, BlankNode, Iri, Literal, NamedNode, Term, TermRef, ThinError, ThinResult,
};

/// [STR](https://www.w3.org/TR/sparql11-query/#func-str)
pub fn str_value(arg: &Term) -> ThinResult<Term> {
    match arg.as_ref() {
        TermRef::NamedNode(node) => Ok(Literal::new_simple_literal(node.as_str()).into()),
        TermRef::Literal(literal) => Ok(Literal::new_simple_literal(literal.value()).into()),
        _ => ThinError::expected(),
    }
}

pub fn lang(arg: &Term) -> ThinResult<Term> {
    match arg.as_ref() {
        TermRef::Literal(literal) => {
            Ok(Literal::new_simple_literal(literal.language().unwrap_or("")).into())
        }
        _ => ThinError::expected(),
    }
}

pub fn datatype(arg: &Term) -> ThinResult<Term> {
    match arg.as_ref() {
        TermRef::Literal(literal) => Ok(literal.datatype().into_owned().into()),
        _ => ThinError::expected(),
    }
}

/// [langMatches](https://www.w3.org/TR/sparql11-query/#func-langMatches) with basic filtering of
/// [RFC 4647](https://www.rfc-editor.org/rfc/rfc4647#section-3.3.1).
pub fn lang_matches(tag: &Term, range: &Term) -> ThinResult<bool> {
    let tag = StringArg::try_plain_from_term(tag)?.value;
    let range = StringArg::try_plain_from_term(range)?.value;

    if range == "*" {
        return Ok(!tag.is_empty());
    }
    if tag.len() < range.len() {
        return Ok(false);
    }
    let (prefix, rest) = tag.split_at(range.len());
    Ok(prefix.eq_ignore_ascii_case(range) && (rest.is_empty() || rest.starts_with('-')))
}

/// [IRI](https://www.w3.org/TR/sparql11-query/#func-iri) resolved against the base IRI of the
/// query.
pub fn iri(arg: &Term, base_iri: Option<&Iri<String>>) -> ThinResult<Term> {
    let value = match arg.as_ref() {
        TermRef::NamedNode(node) => return Ok(node.into_owned().into()),
        TermRef::Literal(_) => StringArg::try_plain_from_term(arg)?.value,
        _ => return ThinError::expected(),
    };
    let iri = match base_iri {
        Some(base_iri) => base_iri.resolve(value)?.into_inner(),
        None => Iri::parse(value.to_owned())?.into_inner(),
    };
    Ok(NamedNode::new_unchecked(iri).into())
}

/// [BNODE](https://www.w3.org/TR/sparql11-query/#func-bnode)
///
/// A fresh blank node is created for each call.
pub fn bnode(arg: Option<&Term>) -> ThinResult<Term> {
    if let Some(arg) = arg {
        StringArg::try_plain_from_term(arg)?;
    }
    Ok(BlankNode::default().into())
}

pub fn str_dt(value: &Term, datatype: &Term) -> ThinResult<Term> {
    let value = StringArg::try_plain_from_term(value)?.value;
    let TermRef::NamedNode(datatype) = datatype.as_ref() else {
        return ThinError::expected();
    };
    Ok(Literal::new_typed_literal(value, datatype).into())
}

pub fn str_lang(value: &Term, language: &Term) -> ThinResult<Term> {
    let value = StringArg::try_plain_from_term(value)?.value;
    let language = StringArg::try_plain_from_term(language)?.value;
    Literal::new_language_tagged_literal(value, language)
        .map(Into::into)
        .map_err(|_| ThinError::default())
}

pub fn is_iri(arg: &Term) -> bool {
    matches!(arg, Term::NamedNode(_))
}

pub fn is_blank(arg: &Term) -> bool {
    matches!(arg, Term::BlankNode(_))
}

pub fn is_literal(arg: &Term) -> bool {
    matches!(arg, Term::Literal(_))
}

pub fn is_numeric(arg: &Term) -> bool {
    match arg {
        Term::Literal(literal) => {
            is_numeric_datatype(literal.datatype())
                && rdf_multiset_model::Numeric::from_literal(literal.as_ref()).is_ok()
        }
        _ => false,
    }
}

/// Checks whether the literal is a plain string without language tag.
pub(crate) fn is_plain_string(arg: &Term) -> bool {
    matches!(arg, Term::Literal(literal) if literal.datatype() == xsd::STRING)
}
