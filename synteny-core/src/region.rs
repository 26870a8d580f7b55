//! Genomic region.

use std::{error, fmt};

/// A genomic region.
///
/// A region is a reference sequence name and a half-open interval `[start, end)` on it,
/// optionally qualified by the name of the assembly it belongs to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Region {
    name: String,
    start: u64,
    end: u64,
    assembly_name: Option<String>,
}

/// An error returned when a region fails to be created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NewError {
    /// The start is not less than the end.
    InvalidInterval {
        /// The start.
        start: u64,
        /// The end.
        end: u64,
    },
}

impl error::Error for NewError {}

impl fmt::Display for NewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterval { start, end } => {
                write!(f, "invalid interval: expected start < end, got {start}-{end}")
            }
        }
    }
}

impl Region {
    /// Creates a region.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::Region;
    /// let region = Region::new("chr1", 1000, 2000)?;
    /// assert_eq!(region.len(), 1000);
    /// # Ok::<_, synteny_core::region::NewError>(())
    /// ```
    pub fn new<N>(name: N, start: u64, end: u64) -> Result<Self, NewError>
    where
        N: Into<String>,
    {
        if start >= end {
            return Err(NewError::InvalidInterval { start, end });
        }

        Ok(Self {
            name: name.into(),
            start,
            end,
            assembly_name: None,
        })
    }

    /// Sets the assembly name.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::Region;
    /// let region = Region::new("chr1", 1000, 2000)?.with_assembly_name("grape");
    /// assert_eq!(region.assembly_name(), Some("grape"));
    /// # Ok::<_, synteny_core::region::NewError>(())
    /// ```
    pub fn with_assembly_name<N>(mut self, assembly_name: N) -> Self
    where
        N: Into<String>,
    {
        self.assembly_name = Some(assembly_name.into());
        self
    }

    /// Returns the reference sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start position (0-based, inclusive).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the end position (0-based, exclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns the assembly name, if set.
    pub fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    /// Returns the length of the interval.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns whether this region overlaps another.
    ///
    /// Two regions overlap when they are on the same reference sequence and their intervals
    /// intersect. Assembly names are not compared.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::Region;
    ///
    /// let a = Region::new("chr1", 100, 200)?;
    ///
    /// assert!(a.overlaps(&Region::new("chr1", 150, 160)?));
    /// assert!(!a.overlaps(&Region::new("chr1", 200, 300)?));
    /// assert!(!a.overlaps(&Region::new("chr2", 150, 160)?));
    /// # Ok::<_, synteny_core::region::NewError>(())
    /// ```
    pub fn overlaps(&self, other: &Self) -> bool {
        self.name == other.name && self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.name, self.start, self.end)
    }
}
