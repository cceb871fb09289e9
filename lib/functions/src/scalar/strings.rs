use regex::{Regex, RegexBuilder};
use rdf_multiset_model::vocab::{rdf, xsd};
use rdf_multiset_model::{integer_literal, Literal, Numeric, Term, TermRef, ThinError, ThinResult};

/// A string literal argument (a simple literal, an `xsd:string` or a language-tagged string).
#[derive(Clone, Copy, Debug)]
pub(crate) struct StringArg<'a> {
    pub value: &'a str,
    pub language: Option<&'a str>,
}

impl<'a> StringArg<'a> {
    pub fn try_from_term(term: &'a Term) -> ThinResult<Self> {
        match term.as_ref() {
            TermRef::Literal(literal)
                if literal.datatype() == xsd::STRING || literal.datatype() == rdf::LANG_STRING =>
            {
                Ok(Self {
                    value: literal.value(),
                    language: literal.language(),
                })
            }
            _ => ThinError::expected(),
        }
    }

    /// A simple literal or `xsd:string` without language tag.
    pub fn try_plain_from_term(term: &'a Term) -> ThinResult<Self> {
        let arg = Self::try_from_term(term)?;
        if arg.language.is_some() {
            return ThinError::expected();
        }
        Ok(arg)
    }

    /// [Argument compatibility rules](https://www.w3.org/TR/sparql11-query/#func-arg-compatibility)
    pub fn is_compatible_with(&self, other: &StringArg<'_>) -> bool {
        other.language.is_none() || self.language == other.language
    }
}

/// Creates a string literal that keeps the given language tag.
pub(crate) fn string_term(value: impl Into<String>, language: Option<&str>) -> Term {
    match language {
        Some(language) => {
            Literal::new_language_tagged_literal_unchecked(value.into(), language).into()
        }
        None => Literal::new_simple_literal(value).into(),
    }
}

pub fn str_len(arg: &Term) -> ThinResult<Term> {
    let arg = StringArg::try_from_term(arg)?;
    let length = i64::try_from(arg.value.chars().count())?;
    Ok(integer_literal(length).into())
}

pub fn ucase(arg: &Term) -> ThinResult<Term> {
    let arg = StringArg::try_from_term(arg)?;
    Ok(string_term(arg.value.to_uppercase(), arg.language))
}

pub fn lcase(arg: &Term) -> ThinResult<Term> {
    let arg = StringArg::try_from_term(arg)?;
    Ok(string_term(arg.value.to_lowercase(), arg.language))
}

pub fn contains(lhs: &Term, rhs: &Term) -> ThinResult<bool> {
    let (lhs, rhs) = compatible_args(lhs, rhs)?;
    Ok(lhs.value.contains(rhs.value))
}

pub fn str_starts(lhs: &Term, rhs: &Term) -> ThinResult<bool> {
    let (lhs, rhs) = compatible_args(lhs, rhs)?;
    Ok(lhs.value.starts_with(rhs.value))
}

pub fn str_ends(lhs: &Term, rhs: &Term) -> ThinResult<bool> {
    let (lhs, rhs) = compatible_args(lhs, rhs)?;
    Ok(lhs.value.ends_with(rhs.value))
}

pub fn str_before(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    let (lhs, rhs) = compatible_args(lhs, rhs)?;
    Ok(match lhs.value.find(rhs.value) {
        Some(position) => string_term(&lhs.value[..position], lhs.language),
        None => Literal::new_simple_literal("").into(),
    })
}

pub fn str_after(lhs: &Term, rhs: &Term) -> ThinResult<Term> {
    let (lhs, rhs) = compatible_args(lhs, rhs)?;
    Ok(match lhs.value.find(rhs.value) {
        Some(position) => string_term(&lhs.value[position + rhs.value.len()..], lhs.language),
        None => Literal::new_simple_literal("").into(),
    })
}

/// Concatenates the arguments. The language tag is kept iff all arguments share it.
pub fn concat(args: &[Term]) -> ThinResult<Term> {
    let args = args
        .iter()
        .map(StringArg::try_from_term)
        .collect::<ThinResult<Vec<_>>>()?;

    let mut language = args.first().and_then(|arg| arg.language);
    let mut result = String::new();
    for arg in &args {
        if arg.language != language {
            language = None;
        }
        result.push_str(arg.value);
    }
    Ok(string_term(result, language))
}

/// [fn:substring](https://www.w3.org/TR/xpath-functions-31/#func-substring) with 1-based,
/// rounded positions.
pub fn substr(source: &Term, start: &Term, length: Option<&Term>) -> ThinResult<Term> {
    let source = StringArg::try_from_term(source)?;
    let start = rounded_position(start)?;
    let end = match length {
        Some(length) => start + rounded_position(length)?,
        None => f64::INFINITY,
    };

    let result = source
        .value
        .chars()
        .enumerate()
        .filter(|(index, _)| {
            #[allow(clippy::cast_precision_loss, reason = "Character positions")]
            let position = (index + 1) as f64;
            position >= start && position < end
        })
        .map(|(_, c)| c)
        .collect::<String>();
    Ok(string_term(result, source.language))
}

fn rounded_position(term: &Term) -> ThinResult<f64> {
    let TermRef::Literal(literal) = term.as_ref() else {
        return ThinError::expected();
    };
    let value = Numeric::from_literal(literal)?.round()?.to_f64();
    if value.is_nan() {
        return ThinError::expected();
    }
    Ok(value)
}

pub fn regex(text: &Term, pattern: &Term, flags: Option<&Term>) -> ThinResult<bool> {
    let text = StringArg::try_from_term(text)?;
    let regex = compile_regex(pattern, flags)?;
    Ok(regex.is_match(text.value))
}

pub fn replace(
    text: &Term,
    pattern: &Term,
    replacement: &Term,
    flags: Option<&Term>,
) -> ThinResult<Term> {
    let text = StringArg::try_from_term(text)?;
    let replacement = StringArg::try_plain_from_term(replacement)?;
    let regex = compile_regex(pattern, flags)?;
    let result = regex.replace_all(text.value, replacement.value);
    Ok(string_term(result.into_owned(), text.language))
}

fn compile_regex(pattern: &Term, flags: Option<&Term>) -> ThinResult<Regex> {
    let pattern = StringArg::try_plain_from_term(pattern)?;
    let mut builder = RegexBuilder::new(pattern.value);
    builder.size_limit(1_000_000);
    if let Some(flags) = flags {
        for flag in StringArg::try_plain_from_term(flags)?.value.chars() {
            match flag {
                's' => builder.dot_matches_new_line(true),
                'm' => builder.multi_line(true),
                'i' => builder.case_insensitive(true),
                'x' => builder.ignore_whitespace(true),
                'q' => return literal_regex(pattern.value),
                _ => return ThinError::expected(),
            };
        }
    }
    builder.build().map_err(|_| ThinError::default())
}

fn literal_regex(pattern: &str) -> ThinResult<Regex> {
    Regex::new(&regex::escape(pattern)).map_err(|_| ThinError::default())
}

/// [fn:encode-for-uri](https://www.w3.org/TR/xpath-functions-31/#func-encode-for-uri)
pub fn encode_for_uri(arg: &Term) -> ThinResult<Term> {
    let arg = StringArg::try_from_term(arg)?;
    let mut result = String::with_capacity(arg.value.len());
    for byte in arg.value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        } else {
            result.push_str(&format!("%{byte:02X}"));
        }
    }
    Ok(Literal::new_simple_literal(result).into())
}

fn compatible_args<'a>(
    lhs: &'a Term,
    rhs: &'a Term,
) -> ThinResult<(StringArg<'a>, StringArg<'a>)> {
    let lhs = StringArg::try_from_term(lhs)?;
    let rhs = StringArg::try_from_term(rhs)?;
    if !lhs.is_compatible_with(&rhs) {
        return ThinError::expected();
    }
    Ok((lhs, rhs))
}
