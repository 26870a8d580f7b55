//! Synteny feature.

mod metadata;

pub use self::metadata::Metadata;

use crate::{Region, Strand};

/// A synteny feature.
///
/// A feature is one side of a pairwise alignment, oriented toward the assembly it is viewed
/// from. The other side of the alignment is its mate.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    id: String,
    region: Region,
    strand: Strand,
    mate: Region,
    index: usize,
    metadata: Metadata,
}

impl Feature {
    /// Creates a feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::{feature::Metadata, Feature, Region, Strand};
    ///
    /// let feature = Feature::new(
    ///     "chr1:1000-1500_chr5:3000-3500",
    ///     Region::new("chr1", 1000, 1500)?.with_assembly_name("grape"),
    ///     Strand::Forward,
    ///     Region::new("chr5", 3000, 3500)?.with_assembly_name("peach"),
    ///     0,
    ///     Metadata::default(),
    /// );
    ///
    /// assert_eq!(feature.region().name(), "chr1");
    /// assert_eq!(feature.mate().name(), "chr5");
    /// # Ok::<_, synteny_core::region::NewError>(())
    /// ```
    pub fn new<I>(
        id: I,
        region: Region,
        strand: Strand,
        mate: Region,
        index: usize,
        metadata: Metadata,
    ) -> Self
    where
        I: Into<String>,
    {
        Self {
            id: id.into(),
            region,
            strand,
            mate,
            index,
            metadata,
        }
    }

    /// Returns the unique ID.
    ///
    /// The ID is derived from the query and target coordinates of the alignment, so the same
    /// alignment always has the same ID regardless of orientation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    ///
    /// This is the same as the ID.
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Returns the feature type.
    pub fn kind(&self) -> &'static str {
        "match"
    }

    /// Returns the primary region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Returns the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the mate region.
    pub fn mate(&self) -> &Region {
        &self.mate
    }

    /// Returns the index of the source alignment in its response batch.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the alignment metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
