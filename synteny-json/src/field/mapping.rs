use serde::{Deserialize, Serialize};

use super::Path;

/// Paths to the logical fields of an alignment response.
///
/// The alignments path is resolved against the response body. All other paths are resolved
/// against each alignment record.
///
/// When deserialized, option names follow the host configuration (`alignmentsField`,
/// `queryNameField`, etc.), and missing options take their defaults.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Mapping {
    /// The path to the array of alignments in the response (default: `alignments`).
    #[serde(rename = "alignmentsField")]
    pub alignments: Path,

    /// The path to the query sequence name (default: `query.name`).
    #[serde(rename = "queryNameField")]
    pub query_name: Path,
    /// The path to the query start position (default: `query.start`).
    #[serde(rename = "queryStartField")]
    pub query_start: Path,
    /// The path to the query end position (default: `query.end`).
    #[serde(rename = "queryEndField")]
    pub query_end: Path,
    /// The path to the query sequence length (default: `query.length`).
    #[serde(rename = "queryLengthField")]
    pub query_length: Path,

    /// The path to the target sequence name (default: `target.name`).
    #[serde(rename = "targetNameField")]
    pub target_name: Path,
    /// The path to the target start position (default: `target.start`).
    #[serde(rename = "targetStartField")]
    pub target_start: Path,
    /// The path to the target end position (default: `target.end`).
    #[serde(rename = "targetEndField")]
    pub target_end: Path,
    /// The path to the target sequence length (default: `target.length`).
    #[serde(rename = "targetLengthField")]
    pub target_length: Path,

    /// The path to the strand (default: `strand`).
    #[serde(rename = "strandField")]
    pub strand: Path,
    /// The path to the number of matching residues (default: `numResidueMatches`).
    #[serde(rename = "numResidueMatchesField")]
    pub residue_match_count: Path,
    /// The path to the alignment block length (default: `alignmentBlockLength`).
    #[serde(rename = "alignmentBlockLengthField")]
    pub alignment_block_length: Path,
    /// The path to the identity score (default: `identity`).
    #[serde(rename = "identityField")]
    pub identity: Path,
    /// The path to the mapping quality (default: `mappingQuality`).
    #[serde(rename = "mappingQualityField")]
    pub mapping_quality: Path,
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            alignments: Path::from("alignments"),
            query_name: Path::from("query.name"),
            query_start: Path::from("query.start"),
            query_end: Path::from("query.end"),
            query_length: Path::from("query.length"),
            target_name: Path::from("target.name"),
            target_start: Path::from("target.start"),
            target_end: Path::from("target.end"),
            target_length: Path::from("target.length"),
            strand: Path::from("strand"),
            residue_match_count: Path::from("numResidueMatches"),
            alignment_block_length: Path::from("alignmentBlockLength"),
            identity: Path::from("identity"),
            mapping_quality: Path::from("mappingQuality"),
        }
    }
}
