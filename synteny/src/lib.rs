//! **synteny** is a collection of libraries for fetching and parsing pairwise genomic
//! alignments as synteny features.
//!
//! Each library is behind a feature of the same name:
//!
//!   * `core`: shared region and feature types
//!   * `json`: the schema-flexible JSON alignment record parser
//!   * `http`: the cached, deduplicated HTTP feature adapter

#[cfg(feature = "core")]
pub use synteny_core as core;

#[cfg(feature = "http")]
pub use synteny_http as http;

#[cfg(feature = "json")]
pub use synteny_json as json;
