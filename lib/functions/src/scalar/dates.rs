use rdf_multiset_model::vocab::xsd;
use rdf_multiset_model::{integer_literal, DateTime, Literal, Term, TermRef, ThinError, ThinResult};
use std::str::FromStr;

fn date_time(term: &Term) -> ThinResult<DateTime> {
    match term.as_ref() {
        TermRef::Literal(literal) if literal.datatype() == xsd::DATE_TIME => {
            Ok(DateTime::from_str(literal.value())?)
        }
        _ => ThinError::expected(),
    }
}

pub fn year(arg: &Term) -> ThinResult<Term> {
    Ok(integer_literal(date_time(arg)?.year().into()).into())
}

pub fn month(arg: &Term) -> ThinResult<Term> {
    Ok(integer_literal(date_time(arg)?.month().into()).into())
}

pub fn day(arg: &Term) -> ThinResult<Term> {
    Ok(integer_literal(date_time(arg)?.day().into()).into())
}

pub fn hours(arg: &Term) -> ThinResult<Term> {
    Ok(integer_literal(date_time(arg)?.hour().into()).into())
}

pub fn minutes(arg: &Term) -> ThinResult<Term> {
    Ok(integer_literal(date_time(arg)?.minute().into()).into())
}

pub fn seconds(arg: &Term) -> ThinResult<Term> {
    let seconds = date_time(arg)?.second();
    Ok(Literal::new_typed_literal(seconds.to_string(), xsd::DECIMAL).into())
}

pub fn now(now: DateTime) -> Term {
    Literal::new_typed_literal(now.to_string(), xsd::DATE_TIME).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_time_term(value: &str) -> Term {
        Literal::new_typed_literal(value, xsd::DATE_TIME).into()
    }

    #[test]
    fn extracts_components() {
        let value = date_time_term("2011-01-10T14:45:13.815-05:00");
        assert_eq!(year(&value).unwrap(), integer_literal(2011).into());
        assert_eq!(month(&value).unwrap(), integer_literal(1).into());
        assert_eq!(day(&value).unwrap(), integer_literal(10).into());
        assert_eq!(hours(&value).unwrap(), integer_literal(14).into());
        assert_eq!(minutes(&value).unwrap(), integer_literal(45).into());
    }

    #[test]
    fn rejects_other_datatypes() {
        let value = Term::from(Literal::new_simple_literal("2011-01-10T14:45:13"));
        assert!(year(&value).is_err());
    }
}
