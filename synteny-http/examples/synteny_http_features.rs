//! Prints the synteny features in a region fetched from an alignment endpoint.
//!
//! The result is tab-delimited: feature region, strand, mate region, and mate assembly.
//!
//! # Examples
//!
//! ```text
//! cargo run --example synteny_http_features -- \
//!     https://example.com/alignments grape peach chr1:1000-2000
//! ```
//!
//! The first assembly is the viewing assembly. Set `RUST_LOG=synteny_http=debug` to trace
//! cache and fetch activity.

use std::{env, io};

use futures::TryStreamExt;
use synteny_core::Region;
use synteny_http::{Builder, Options};
use tracing_subscriber::EnvFilter;

fn parse_region(s: &str, assembly_name: &str) -> io::Result<Region> {
    let invalid_region = || io::Error::new(io::ErrorKind::InvalidInput, "invalid region");

    let (name, interval) = s.rsplit_once(':').ok_or_else(invalid_region)?;
    let (start, end) = interval.split_once('-').ok_or_else(invalid_region)?;
    let start = start.parse().map_err(|_| invalid_region())?;
    let end = end.parse().map_err(|_| invalid_region())?;

    Region::new(name, start, end)
        .map(|region| region.with_assembly_name(assembly_name))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);

    let url = args.next().expect("missing url");
    let query_assembly_name = args.next().expect("missing query assembly name");
    let target_assembly_name = args.next().expect("missing target assembly name");
    let raw_region = args.next().expect("missing region");

    let region = parse_region(&raw_region, &query_assembly_name)?;

    let adapter = Builder::default()
        .set_url(url)
        .set_assembly_names(vec![query_assembly_name, target_assembly_name])
        .build()?;

    let mut features = adapter.features(&region, Options::default());

    while let Some(feature) = features.try_next().await? {
        let mate = feature.mate();

        println!(
            "{}\t{}\t{}\t{}",
            feature.region(),
            i8::from(feature.strand()),
            mate,
            mate.assembly_name().unwrap_or_default()
        );
    }

    Ok(())
}
