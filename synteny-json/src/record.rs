//! Alignment record.

mod value;

use std::{error, fmt};

use serde_json::Value;
use synteny_core::{
    AssemblyNames, Feature, Orientation, Region, Strand, feature::Metadata, region,
};

use self::value::{as_name, parse_number_or_zero, parse_uint};
use crate::field::{Mapping, Path};

/// A side of an alignment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// The query sequence.
    Query,
    /// The target sequence.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// An interval bound.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    /// The start position.
    Start,
    /// The end position.
    End,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// An error returned when an alignment record fails to parse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The sequence name is missing or empty.
    MissingName(Side),
    /// A position is missing or is not a non-negative integer.
    InvalidPosition(Side, Bound),
    /// The start position is not less than the end position.
    InvalidRange {
        /// The side of the alignment.
        side: Side,
        /// The start position.
        start: u64,
        /// The end position.
        end: u64,
    },
}

impl error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName(side) => write!(f, "missing {side} name"),
            Self::InvalidPosition(side, bound) => write!(f, "invalid {side} {bound}"),
            Self::InvalidRange { side, start, end } => {
                write!(f, "invalid {side} range: expected start < end, got {start}-{end}")
            }
        }
    }
}

/// A validated alignment record.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    query: Region,
    target: Region,
    strand: Strand,
    metadata: Metadata,
}

impl Record {
    /// Resolves and validates an alignment record from a raw JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use synteny_core::Strand;
    /// use synteny_json::{field::Mapping, Record};
    ///
    /// let value = json!({
    ///     "query": { "name": "chr1", "start": "1000", "end": 1500 },
    ///     "target": { "name": "chr5", "start": 3000, "end": 3500 },
    ///     "strand": -1,
    /// });
    ///
    /// let record = Record::try_from_value(&value, &Mapping::default())?;
    /// assert_eq!(record.query().start(), 1000);
    /// assert_eq!(record.strand(), Strand::Reverse);
    /// assert_eq!(record.id(), "chr1:1000-1500_chr5:3000-3500");
    /// # Ok::<_, synteny_json::record::ParseError>(())
    /// ```
    pub fn try_from_value(value: &Value, mapping: &Mapping) -> Result<Self, ParseError> {
        let query = resolve_region(
            value,
            Side::Query,
            &mapping.query_name,
            &mapping.query_start,
            &mapping.query_end,
        )?;

        let target = resolve_region(
            value,
            Side::Target,
            &mapping.target_name,
            &mapping.target_start,
            &mapping.target_end,
        )?;

        let strand = mapping
            .strand
            .resolve(value)
            .map(parse_strand)
            .unwrap_or_default();

        let uint = |path: &Path| path.resolve(value).and_then(parse_uint);

        let metadata = Metadata {
            query_length: uint(&mapping.query_length),
            target_length: uint(&mapping.target_length),
            residue_match_count: uint(&mapping.residue_match_count),
            alignment_block_length: uint(&mapping.alignment_block_length),
            mapping_quality: uint(&mapping.mapping_quality),
            identity: parse_number_or_zero(mapping.identity.resolve(value)),
        };

        Ok(Self {
            query,
            target,
            strand,
            metadata,
        })
    }

    /// Returns the query region.
    pub fn query(&self) -> &Region {
        &self.query
    }

    /// Returns the target region.
    pub fn target(&self) -> &Region {
        &self.target
    }

    /// Returns the strand.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the alignment metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the unique ID of the alignment.
    ///
    /// This is the query coordinates followed by the target coordinates, e.g.,
    /// `chr1:1000-1500_chr5:3000-3500`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.query, self.target)
    }

    /// Converts the record to a feature viewed from the given assembly.
    ///
    /// A record viewed from the query assembly has the query as its primary region and the
    /// target as its mate. Viewed from any other assembly, the sides are flipped. The mate is
    /// always labeled with the other assembly of the pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use synteny_core::AssemblyNames;
    /// use synteny_json::{field::Mapping, Record};
    ///
    /// let value = json!({
    ///     "query": { "name": "chr1", "start": 1000, "end": 1500 },
    ///     "target": { "name": "chr5", "start": 3000, "end": 3500 },
    /// });
    ///
    /// let record = Record::try_from_value(&value, &Mapping::default())?;
    /// let assembly_names = AssemblyNames::new("grape", "peach");
    ///
    /// let feature = record.clone().into_feature(0, &assembly_names, Some("peach"));
    /// assert_eq!(feature.region().name(), "chr5");
    /// assert_eq!(feature.mate().name(), "chr1");
    /// assert_eq!(feature.mate().assembly_name(), Some("grape"));
    /// # Ok::<_, synteny_json::record::ParseError>(())
    /// ```
    pub fn into_feature(
        self,
        index: usize,
        assembly_names: &AssemblyNames,
        assembly_name: Option<&str>,
    ) -> Feature {
        let id = self.id();
        let orientation = assembly_names.orient(assembly_name);

        let (region, mate) = match orientation {
            Orientation::Query => (self.query, self.target),
            Orientation::Target => (self.target, self.query),
        };

        let region = match assembly_name {
            Some(name) => region.with_assembly_name(name),
            None => region,
        };

        let mate = mate.with_assembly_name(assembly_names.mate_assembly_name(orientation));

        Feature::new(id, region, self.strand, mate, index, self.metadata)
    }
}

fn resolve_region(
    value: &Value,
    side: Side,
    name: &Path,
    start: &Path,
    end: &Path,
) -> Result<Region, ParseError> {
    let name = name
        .resolve(value)
        .and_then(as_name)
        .ok_or(ParseError::MissingName(side))?;

    let start = start
        .resolve(value)
        .and_then(parse_uint)
        .ok_or(ParseError::InvalidPosition(side, Bound::Start))?;

    let end = end
        .resolve(value)
        .and_then(parse_uint)
        .ok_or(ParseError::InvalidPosition(side, Bound::End))?;

    Region::new(name, start, end).map_err(|e| match e {
        region::NewError::InvalidInterval { start, end } => {
            ParseError::InvalidRange { side, start, end }
        }
    })
}

fn parse_strand(value: &Value) -> Strand {
    let is_reverse = match value {
        Value::String(s) => s == "-" || s == "-1",
        Value::Number(n) => n.as_f64() == Some(-1.0),
        _ => false,
    };

    if is_reverse {
        Strand::Reverse
    } else {
        Strand::Forward
    }
}
