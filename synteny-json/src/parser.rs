use std::{error, fmt};

use serde_json::Value;
use synteny_core::{AssemblyNames, Feature};
use tracing::warn;

use crate::{
    Record,
    field::{Mapping, Path},
};

/// An error returned when the alignments in a response are not an array.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MalformedResponseError(Path);

impl MalformedResponseError {
    /// Returns the path to the alignments.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl error::Error for MalformedResponseError {}

impl fmt::Display for MalformedResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" is not an array in response", self.0)
    }
}

/// Returns the raw alignment records in a response body.
///
/// A missing or `null` alignments value is an empty list.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use synteny_json::field::Mapping;
///
/// let mapping = Mapping::default();
///
/// let body = json!({ "alignments": [{}, {}] });
/// assert_eq!(synteny_json::alignments(&body, &mapping).map(|a| a.len()), Ok(2));
///
/// assert!(synteny_json::alignments(&json!({}), &mapping)?.is_empty());
///
/// let body = json!({ "alignments": { "count": 0 } });
/// assert!(synteny_json::alignments(&body, &mapping).is_err());
/// # Ok::<_, synteny_json::MalformedResponseError>(())
/// ```
pub fn alignments<'v>(
    body: &'v Value,
    mapping: &Mapping,
) -> Result<&'v [Value], MalformedResponseError> {
    match mapping.alignments.resolve(body) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(MalformedResponseError(mapping.alignments.clone())),
    }
}

/// Parses the alignments in a response body into features viewed from the given assembly.
///
/// Parsing is tolerant: a malformed response yields no features, and invalid records are
/// skipped. Both are reported as warnings. Each feature is tagged with the index of its
/// record in the response.
pub fn parse(
    body: &Value,
    mapping: &Mapping,
    assembly_names: &AssemblyNames,
    assembly_name: Option<&str>,
) -> Vec<Feature> {
    let values = match alignments(body, mapping) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "malformed alignment response");
            return Vec::new();
        }
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| match Record::try_from_value(value, mapping) {
            Ok(record) => Some(record.into_feature(i, assembly_names, assembly_name)),
            Err(e) => {
                warn!(index = i, error = %e, "skipping invalid alignment");
                None
            }
        })
        .collect()
}
