//! Dotted field paths.

mod mapping;

pub use self::mapping::Mapping;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const SEPARATOR: char = '.';

/// A dotted path to a value in a JSON document, e.g., `query.name`.
///
/// Each segment is an object key. A segment that is a decimal integer also indexes into an
/// array.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub struct Path(String);

impl Path {
    /// Creates a path.
    pub fn new<P>(path: P) -> Self
    where
        P: Into<String>,
    {
        Self(path.into())
    }

    /// Returns the path as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the value at this path.
    ///
    /// This returns `None` if any segment is missing or if an intermediate value is not a
    /// container.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use synteny_json::field::Path;
    ///
    /// let record = json!({ "query": { "name": "chr1" }, "strand": "-" });
    ///
    /// assert_eq!(Path::new("query.name").resolve(&record), Some(&json!("chr1")));
    /// assert_eq!(Path::new("strand").resolve(&record), Some(&json!("-")));
    /// assert!(Path::new("query.name.first").resolve(&record).is_none());
    /// assert!(Path::new("target.name").resolve(&record).is_none());
    /// ```
    pub fn resolve<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.0
            .split(SEPARATOR)
            .try_fold(value, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(values) => segment.parse::<usize>().ok().and_then(|i| values.get(i)),
                _ => None,
            })
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
