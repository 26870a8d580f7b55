/// Alignment metadata carried by a feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    /// The length of the query sequence.
    pub query_length: Option<u64>,
    /// The length of the target sequence.
    pub target_length: Option<u64>,
    /// The number of matching residues.
    pub residue_match_count: Option<u64>,
    /// The alignment block length.
    pub alignment_block_length: Option<u64>,
    /// The mapping quality.
    pub mapping_quality: Option<u64>,
    /// The identity score.
    ///
    /// This is 0 when the source does not provide one.
    pub identity: f64,
}
