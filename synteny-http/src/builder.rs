use std::{collections::BTreeMap, error, fmt, time::Duration};

use reqwest::{
    Method,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use synteny_core::{AssemblyNames, assembly_names};
use synteny_json::field::Mapping;
use tokio::runtime::{self, Handle};
use url::Url;

use crate::{Adapter, Client, Config, Source};

/// A synteny adapter builder.
#[derive(Clone, Debug)]
pub struct Builder {
    url: Option<String>,
    method: String,
    request_headers: BTreeMap<String, String>,
    field_mapping: Mapping,
    assembly_names: Vec<String>,
    refresh_interval: Duration,
    cache_timeout: Duration,
    append_region_params: bool,
    client_side_filter: bool,
}

/// An error returned when an adapter fails to build.
#[derive(Debug)]
pub enum BuildError {
    /// The URL is not set.
    MissingUrl,
    /// The URL is invalid.
    InvalidUrl(url::ParseError),
    /// The HTTP method is not `GET` or `POST`.
    InvalidMethod(String),
    /// A request header name or value is invalid.
    InvalidHeader(String),
    /// The assembly names are not a pair.
    InvalidAssemblyNames(assembly_names::TryFromVecError),
    /// The HTTP client failed to initialize.
    Client(reqwest::Error),
    /// A refresh interval is set, but there is no runtime to run the refresh task on.
    MissingRuntime(runtime::TryCurrentError),
}

impl error::Error for BuildError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::InvalidUrl(e) => Some(e),
            Self::InvalidAssemblyNames(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::MissingRuntime(e) => Some(e),
            Self::MissingUrl | Self::InvalidMethod(_) | Self::InvalidHeader(_) => None,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl => f.write_str("missing URL"),
            Self::InvalidUrl(_) => f.write_str("invalid URL"),
            Self::InvalidMethod(method) => {
                write!(f, "invalid method: expected GET or POST, got {method}")
            }
            Self::InvalidHeader(name) => write!(f, "invalid request header: {name}"),
            Self::InvalidAssemblyNames(_) => f.write_str("invalid assembly names"),
            Self::Client(_) => f.write_str("failed to initialize HTTP client"),
            Self::MissingRuntime(_) => f.write_str("missing runtime for refresh task"),
        }
    }
}

impl Builder {
    /// Sets the base URL of the endpoint.
    ///
    /// This is required when building an HTTP adapter.
    pub fn set_url<U>(mut self, url: U) -> Self
    where
        U: Into<String>,
    {
        self.url = Some(url.into());
        self
    }

    /// Sets the HTTP method.
    ///
    /// This must be `GET` or `POST`. The default is `GET`.
    pub fn set_method<M>(mut self, method: M) -> Self
    where
        M: Into<String>,
    {
        self.method = method.into();
        self
    }

    /// Sets additional request headers.
    ///
    /// These are merged with a default `Content-Type: application/json` header, which they
    /// can override.
    pub fn set_request_headers(mut self, request_headers: BTreeMap<String, String>) -> Self {
        self.request_headers = request_headers;
        self
    }

    /// Sets the paths to the alignment fields in a response.
    pub fn set_field_mapping(mut self, field_mapping: Mapping) -> Self {
        self.field_mapping = field_mapping;
        self
    }

    /// Sets the query and target assembly names, in that order.
    ///
    /// Exactly two names are required.
    pub fn set_assembly_names(mut self, assembly_names: Vec<String>) -> Self {
        self.assembly_names = assembly_names;
        self
    }

    /// Sets the period at which the entire cache is cleared.
    ///
    /// A zero interval disables periodic clearing. This is the default.
    pub fn set_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Sets the maximum age of a cached response.
    ///
    /// A zero timeout disables caching. The default is 60 s.
    pub fn set_cache_timeout(mut self, cache_timeout: Duration) -> Self {
        self.cache_timeout = cache_timeout;
        self
    }

    /// Sets whether to append the region as query parameters to the URL.
    ///
    /// If `false`, the URL is requested as is, e.g., when it already carries its query. The
    /// default is `true`.
    pub fn append_region_params(mut self, value: bool) -> Self {
        self.append_region_params = value;
        self
    }

    /// Sets whether the endpoint returns the full dataset to be filtered locally.
    ///
    /// If `true`, one response is fetched and cached per assembly, and features are filtered
    /// by overlap with each requested region. Otherwise, each region is fetched and cached
    /// separately. The default is `false`.
    pub fn client_side_filter(mut self, value: bool) -> Self {
        self.client_side_filter = value;
        self
    }

    /// Builds an adapter that fetches from the configured URL.
    ///
    /// # Examples
    ///
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), synteny_http::BuildError> {
    /// use synteny_http::Builder;
    ///
    /// let adapter = Builder::default()
    ///     .set_url("https://example.com/alignments")
    ///     .set_assembly_names(vec![String::from("grape"), String::from("peach")])
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Adapter<Client>, BuildError> {
        let url = self
            .url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(BuildError::MissingUrl)
            .and_then(|s| Url::parse(s).map_err(BuildError::InvalidUrl))?;

        let method = parse_method(&self.method)?;
        let headers = build_headers(&self.request_headers)?;
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(BuildError::Client)?;

        let client = Client::new(
            http_client,
            url,
            method,
            headers,
            self.append_region_params,
        );

        self.build_from_source(client)
    }

    /// Builds an adapter from a source.
    ///
    /// The URL, method, request headers, and region parameter settings only apply to
    /// [`Self::build`] and are ignored here.
    pub fn build_from_source<S>(self, source: S) -> Result<Adapter<S>, BuildError>
    where
        S: Source,
    {
        let assembly_names = AssemblyNames::try_from(self.assembly_names)
            .map_err(BuildError::InvalidAssemblyNames)?;

        let refresh = if self.refresh_interval.is_zero() {
            None
        } else {
            let handle = Handle::try_current().map_err(BuildError::MissingRuntime)?;
            Some((handle, self.refresh_interval))
        };

        Ok(Adapter::new(
            source,
            self.field_mapping,
            assembly_names,
            self.cache_timeout,
            self.client_side_filter,
            refresh,
        ))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::from(Config::default())
    }
}

impl From<Config> for Builder {
    fn from(config: Config) -> Self {
        Self {
            url: config.url,
            method: config.method,
            request_headers: config.request_headers,
            field_mapping: config.field_mapping,
            assembly_names: config.assembly_names,
            refresh_interval: Duration::from_millis(config.refresh_interval),
            cache_timeout: Duration::from_millis(config.cache_timeout),
            append_region_params: config.append_region_params,
            client_side_filter: config.client_side_filter,
        }
    }
}

fn parse_method(s: &str) -> Result<Method, BuildError> {
    if s.eq_ignore_ascii_case("GET") {
        Ok(Method::GET)
    } else if s.eq_ignore_ascii_case("POST") {
        Ok(Method::POST)
    } else {
        Err(BuildError::InvalidMethod(s.into()))
    }
}

fn build_headers(request_headers: &BTreeMap<String, String>) -> Result<HeaderMap, BuildError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in request_headers {
        let key = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BuildError::InvalidHeader(name.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| BuildError::InvalidHeader(name.clone()))?;

        headers.insert(key, value);
    }

    Ok(headers)
}
