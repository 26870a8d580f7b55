//! Strand.

/// The strand of an alignment.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strand {
    /// Forward (`+`).
    #[default]
    Forward,
    /// Reverse (`-`).
    Reverse,
}

impl From<Strand> for i8 {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }
}
