//! **synteny-http** fetches synteny features from alignment endpoints.
//!
//! An [`Adapter`] turns region queries into HTTP requests, parses the JSON responses into
//! features, and caches them. Requests for the same cache key that arrive while a fetch is in
//! flight wait on that fetch instead of issuing their own.
//!
//! # Examples
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use futures::TryStreamExt;
//! use synteny_core::Region;
//! use synteny_http::{Builder, Config, Options};
//!
//! let config: Config = serde_json::from_str(
//!     r#"{
//!         "url": "https://example.com/alignments",
//!         "assemblyNames": ["grape", "peach"]
//!     }"#,
//! )?;
//!
//! let adapter = Builder::from(config).build()?;
//!
//! let region = Region::new("chr1", 1000, 2000)?.with_assembly_name("grape");
//! let mut features = adapter.features(&region, Options::default());
//!
//! while let Some(feature) = features.try_next().await? {
//!     println!("{} -> {}", feature.region(), feature.mate());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
mod builder;
pub mod client;
pub mod config;
mod error;
mod source;

pub use self::{
    adapter::{Adapter, Options},
    builder::{BuildError, Builder},
    client::Client,
    config::Config,
    error::Error,
    source::Source,
};
