/// How a blank node inside a basic graph pattern is evaluated.
///
/// SPARQL treats such blank nodes as variables whose bindings are not part of the result. The
/// pattern optimiser scores both modes differently: a filter blank node counts as a bound slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlankNodeMatchingMode {
    /// The blank node becomes a hidden `__bnode_` variable that projection removes.
    #[default]
    Variable,
    /// The blank node only matches the identical blank node in the dataset.
    Filter,
}
