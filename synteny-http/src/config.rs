//! Adapter configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use synteny_json::field::Mapping;

pub(crate) const DEFAULT_METHOD: &str = "GET";
pub(crate) const DEFAULT_CACHE_TIMEOUT_MS: u64 = 60_000;

/// The adapter configuration as supplied by a host.
///
/// Keys are camelCase, and missing keys take their defaults. Unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use synteny_http::Config;
///
/// let config: Config = serde_json::from_str(
///     r#"{
///         "url": "https://example.com/macro-synteny-paf?genome1=a&genome2=b",
///         "assemblyNames": ["grape", "peach"],
///         "appendRegionParams": false,
///         "clientSideFilter": true,
///         "cacheTimeout": 300000
///     }"#,
/// )?;
///
/// assert_eq!(config.method, "GET");
/// assert_eq!(config.refresh_interval, 0);
/// assert!(config.client_side_filter);
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// The base URL of the endpoint.
    pub url: Option<String>,
    /// The HTTP method, `GET` or `POST` (default: `GET`).
    pub method: String,
    /// Additional request headers, e.g., `Authorization`.
    pub request_headers: BTreeMap<String, String>,
    /// The paths to the alignment fields in the response.
    #[serde(flatten)]
    pub field_mapping: Mapping,
    /// The query and target assembly names, in that order.
    pub assembly_names: Vec<String>,
    /// The period, in milliseconds, at which the cache is cleared (default: 0, disabled).
    pub refresh_interval: u64,
    /// The maximum age, in milliseconds, of a cached response (default: 60000; 0 disables
    /// caching).
    pub cache_timeout: u64,
    /// Whether to append the region as query parameters to the URL (default: `true`).
    pub append_region_params: bool,
    /// Whether the endpoint returns the full dataset to be filtered locally (default: `false`).
    pub client_side_filter: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            method: String::from(DEFAULT_METHOD),
            request_headers: BTreeMap::new(),
            field_mapping: Mapping::default(),
            assembly_names: Vec::new(),
            refresh_interval: 0,
            cache_timeout: DEFAULT_CACHE_TIMEOUT_MS,
            append_region_params: true,
            client_side_filter: false,
        }
    }
}
