//! Assembly name pair.

use std::{error, fmt};

/// The side of an alignment that becomes the primary feature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    /// The query coordinates are primary; the target coordinates are the mate.
    Query,
    /// The target coordinates are primary; the query coordinates are the mate.
    Target,
}

/// The ordered pair of assemblies being compared.
///
/// The first assembly is the query assembly; the second is the target assembly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssemblyNames([String; 2]);

impl AssemblyNames {
    /// Creates an assembly name pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::AssemblyNames;
    /// let assembly_names = AssemblyNames::new("grape", "peach");
    /// assert_eq!(assembly_names.query(), "grape");
    /// assert_eq!(assembly_names.target(), "peach");
    /// ```
    pub fn new<Q, T>(query: Q, target: T) -> Self
    where
        Q: Into<String>,
        T: Into<String>,
    {
        Self([query.into(), target.into()])
    }

    /// Returns the query assembly name.
    pub fn query(&self) -> &str {
        &self.0[0]
    }

    /// Returns the target assembly name.
    pub fn target(&self) -> &str {
        &self.0[1]
    }

    /// Returns which side of an alignment is primary when viewed from the given assembly.
    ///
    /// Only a request from the query assembly orients on the query. Any other assembly name,
    /// including an unknown one or none at all, orients on the target.
    ///
    /// # Examples
    ///
    /// ```
    /// use synteny_core::{AssemblyNames, Orientation};
    ///
    /// let assembly_names = AssemblyNames::new("grape", "peach");
    ///
    /// assert_eq!(assembly_names.orient(Some("grape")), Orientation::Query);
    /// assert_eq!(assembly_names.orient(Some("peach")), Orientation::Target);
    /// assert_eq!(assembly_names.orient(None), Orientation::Target);
    /// ```
    pub fn orient(&self, assembly_name: Option<&str>) -> Orientation {
        if assembly_name == Some(self.query()) {
            Orientation::Query
        } else {
            Orientation::Target
        }
    }

    /// Returns the assembly name of the mate for the given orientation.
    ///
    /// This is always the other side of the pair.
    pub fn mate_assembly_name(&self, orientation: Orientation) -> &str {
        match orientation {
            Orientation::Query => self.target(),
            Orientation::Target => self.query(),
        }
    }
}

/// An error returned when a list of assembly names fails to convert to a pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TryFromVecError {
    /// The number of assembly names is not 2.
    InvalidLength(usize),
}

impl error::Error for TryFromVecError {}

impl fmt::Display for TryFromVecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => {
                write!(f, "invalid assembly names length: expected 2, got {n}")
            }
        }
    }
}

impl TryFrom<Vec<String>> for AssemblyNames {
    type Error = TryFromVecError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let n = names.len();

        <[String; 2]>::try_from(names)
            .map(Self)
            .map_err(|_| TryFromVecError::InvalidLength(n))
    }
}
