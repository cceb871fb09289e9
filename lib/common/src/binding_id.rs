use std::fmt::{Display, Formatter};

/// Identifies a single solution within a multiset.
///
/// Ids are handed out in increasing order and are never reused within the lifetime of a multiset,
/// even if the solution is removed. Grouping and aggregation use them as stable handles into the
/// multiset that is currently evaluated.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct BindingId(usize);

impl BindingId {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns the id that follows this id.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for BindingId {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl Display for BindingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
