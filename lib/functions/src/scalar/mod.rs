//! The built-in scalar functions of SPARQL.
//!
//! All functions operate on already evaluated arguments. Unbound arguments are reported as errors
//! by the caller before a function is invoked.

pub(crate) mod cast;
pub(crate) mod comparison;
mod dates;
mod hash;
pub(crate) mod numeric;
pub(crate) mod strings;
pub(crate) mod terms;

pub use comparison::effective_boolean_value;

use rdf_multiset_model::{DateTime, Function, Iri, Term, ThinError, ThinResult};

/// Invokes `function` with the evaluated `args`.
pub(crate) fn call_function(
    function: &Function,
    args: &[Term],
    base_iri: Option<&Iri<String>>,
    now: DateTime,
) -> ThinResult<Term> {
    match (function, args) {
        (Function::Str, [arg]) => terms::str_value(arg),
        (Function::Lang, [arg]) => terms::lang(arg),
        (Function::LangMatches, [tag, range]) => terms::lang_matches(tag, range).map(bool_term),
        (Function::Datatype, [arg]) => terms::datatype(arg),
        (Function::Iri, [arg]) => terms::iri(arg, base_iri),
        (Function::BNode, []) => terms::bnode(None),
        (Function::BNode, [arg]) => terms::bnode(Some(arg)),
        (Function::StrDt, [value, datatype]) => terms::str_dt(value, datatype),
        (Function::StrLang, [value, language]) => terms::str_lang(value, language),
        (Function::IsIri, [arg]) => Ok(bool_term(terms::is_iri(arg))),
        (Function::IsBlank, [arg]) => Ok(bool_term(terms::is_blank(arg))),
        (Function::IsLiteral, [arg]) => Ok(bool_term(terms::is_literal(arg))),
        (Function::IsNumeric, [arg]) => Ok(bool_term(terms::is_numeric(arg))),

        (Function::Rand, []) => Ok(numeric::rand()),
        (Function::Abs, [arg]) => numeric::abs(arg),
        (Function::Ceil, [arg]) => numeric::ceil(arg),
        (Function::Floor, [arg]) => numeric::floor(arg),
        (Function::Round, [arg]) => numeric::round(arg),

        (Function::Concat, args) => strings::concat(args),
        (Function::SubStr, [source, start]) => strings::substr(source, start, None),
        (Function::SubStr, [source, start, length]) => {
            strings::substr(source, start, Some(length))
        }
        (Function::StrLen, [arg]) => strings::str_len(arg),
        (Function::Replace, [text, pattern, replacement]) => {
            strings::replace(text, pattern, replacement, None)
        }
        (Function::Replace, [text, pattern, replacement, flags]) => {
            strings::replace(text, pattern, replacement, Some(flags))
        }
        (Function::UCase, [arg]) => strings::ucase(arg),
        (Function::LCase, [arg]) => strings::lcase(arg),
        (Function::EncodeForUri, [arg]) => strings::encode_for_uri(arg),
        (Function::Contains, [lhs, rhs]) => strings::contains(lhs, rhs).map(bool_term),
        (Function::StrStarts, [lhs, rhs]) => strings::str_starts(lhs, rhs).map(bool_term),
        (Function::StrEnds, [lhs, rhs]) => strings::str_ends(lhs, rhs).map(bool_term),
        (Function::StrBefore, [lhs, rhs]) => strings::str_before(lhs, rhs),
        (Function::StrAfter, [lhs, rhs]) => strings::str_after(lhs, rhs),
        (Function::Regex, [text, pattern]) => strings::regex(text, pattern, None).map(bool_term),
        (Function::Regex, [text, pattern, flags]) => {
            strings::regex(text, pattern, Some(flags)).map(bool_term)
        }

        (Function::Year, [arg]) => dates::year(arg),
        (Function::Month, [arg]) => dates::month(arg),
        (Function::Day, [arg]) => dates::day(arg),
        (Function::Hours, [arg]) => dates::hours(arg),
        (Function::Minutes, [arg]) => dates::minutes(arg),
        (Function::Seconds, [arg]) => dates::seconds(arg),
        (Function::Now, []) => Ok(dates::now(now)),

        (Function::Uuid, []) => Ok(hash::uuid()),
        (Function::StrUuid, []) => Ok(hash::str_uuid()),
        (Function::Md5, [arg]) => hash::md5(arg),
        (Function::Sha1, [arg]) => hash::sha1(arg),
        (Function::Sha256, [arg]) => hash::sha256(arg),
        (Function::Sha384, [arg]) => hash::sha384(arg),
        (Function::Sha512, [arg]) => hash::sha512(arg),

        (Function::Custom(name), [arg]) => {
            cast::cast(name.as_ref(), arg).unwrap_or_else(ThinError::expected)
        }
        // Timezones and unknown functions are not supported.
        _ => ThinError::expected(),
    }
}

pub(crate) fn bool_term(value: bool) -> Term {
    rdf_multiset_model::boolean_literal(value).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_multiset_model::vocab::xsd;
    use rdf_multiset_model::{integer_literal, Literal, NamedNode};

    fn call(function: &Function, args: &[Term]) -> ThinResult<Term> {
        call_function(function, args, None, DateTime::now())
    }

    #[test]
    fn dispatches_by_arity() {
        let source = Term::from(Literal::new_simple_literal("foobar"));
        let start = Term::from(integer_literal(4));
        let length = Term::from(integer_literal(2));

        let result = call(&Function::SubStr, &[source.clone(), start.clone()]);
        assert_eq!(result, Ok(Literal::new_simple_literal("bar").into()));

        let result = call(&Function::SubStr, &[source, start, length]);
        assert_eq!(result, Ok(Literal::new_simple_literal("ba").into()));
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let result = call(&Function::StrLen, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn custom_function_casts() {
        let function = Function::Custom(xsd::INTEGER.into_owned());
        let result = call(&function, &[Literal::new_simple_literal("12").into()]);
        assert_eq!(result, Ok(integer_literal(12).into()));
    }

    #[test]
    fn unknown_custom_function_is_an_error() {
        let function = Function::Custom(NamedNode::new_unchecked("http://example.com/f"));
        let result = call(&function, &[integer_literal(1).into()]);
        assert!(result.is_err());
    }

    #[test]
    fn now_uses_the_given_point_in_time() {
        let now = DateTime::now();
        let first = call_function(&Function::Now, &[], None, now);
        let second = call_function(&Function::Now, &[], None, now);
        assert_eq!(first, second);
    }
}
