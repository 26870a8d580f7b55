//! **synteny-json** parses schema-flexible JSON alignment records into synteny features.
//!
//! Responses are expected to hold an array of alignments, each with a query and a target
//! coordinate group. Where each value lives is described by a [`field::Mapping`] of dotted
//! paths, so endpoints with different layouts can be read without code changes.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use synteny_core::AssemblyNames;
//! use synteny_json::field::Mapping;
//!
//! let body = json!({
//!     "alignments": [{
//!         "query": { "name": "chr1", "start": 1000, "end": 1500, "length": 50000 },
//!         "target": { "name": "chr5", "start": 3000, "end": 3500, "length": 60000 },
//!         "strand": "+",
//!     }],
//! });
//!
//! let assembly_names = AssemblyNames::new("grape", "peach");
//! let features = synteny_json::parse(&body, &Mapping::default(), &assembly_names, Some("grape"));
//!
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].region().name(), "chr1");
//! assert_eq!(features[0].mate().name(), "chr5");
//! ```

pub mod field;
mod parser;
pub mod record;

pub use self::{
    parser::{MalformedResponseError, alignments, parse},
    record::Record,
};
