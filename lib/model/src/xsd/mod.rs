mod boolean;
mod numeric;

pub use boolean::*;
pub use numeric::*;
use oxrdf::vocab::xsd;
use oxrdf::NamedNodeRef;

/// Checks if the datatype is `xsd:integer` or one of the datatypes derived from it.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    static INTEGER_DATATYPES: &[NamedNodeRef<'_>; 13] = &[
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is one of the numeric datatypes of XSD.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
        || is_integer_datatype(datatype)
}
