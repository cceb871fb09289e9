use crate::scalar::strings::StringArg;
use md5::{Digest, Md5};
use rdf_multiset_model::{Literal, NamedNode, Term, ThinResult};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use uuid::Uuid;

/// Hashes the value of a plain string and returns the lowercase hex digest.
pub fn hash<H: Digest>(arg: &Term) -> ThinResult<Term> {
    let value = StringArg::try_plain_from_term(arg)?.value;
    let digest = H::digest(value.as_bytes());
    let hex = digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    Ok(Literal::new_simple_literal(hex).into())
}

pub fn md5(arg: &Term) -> ThinResult<Term> {
    hash::<Md5>(arg)
}

pub fn sha1(arg: &Term) -> ThinResult<Term> {
    hash::<Sha1>(arg)
}

pub fn sha256(arg: &Term) -> ThinResult<Term> {
    hash::<Sha256>(arg)
}

pub fn sha384(arg: &Term) -> ThinResult<Term> {
    hash::<Sha384>(arg)
}

pub fn sha512(arg: &Term) -> ThinResult<Term> {
    hash::<Sha512>(arg)
}

pub fn uuid() -> Term {
    NamedNode::new_unchecked(format!("urn:uuid:{}", Uuid::new_v4())).into()
}

pub fn str_uuid() -> Term {
    Literal::new_simple_literal(Uuid::new_v4().to_string()).into()
}
