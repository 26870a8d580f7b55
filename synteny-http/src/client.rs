//! HTTP alignment source.

use futures::{FutureExt, future::BoxFuture};
use reqwest::{Method, header::HeaderMap};
use serde_json::Value;
use synteny_core::Region;
use tracing::debug;
use url::Url;

use crate::{Error, Source};

/// An HTTP alignment source.
///
/// A client is created by [`crate::Builder::build`].
#[derive(Clone, Debug)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: Url,
    method: Method,
    headers: HeaderMap,
    append_region_params: bool,
}

impl Client {
    pub(crate) fn new(
        http_client: reqwest::Client,
        base_url: Url,
        method: Method,
        headers: HeaderMap,
        append_region_params: bool,
    ) -> Self {
        Self {
            http_client,
            base_url,
            method,
            headers,
            append_region_params,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the request URL for the given region.
    ///
    /// When region parameters are enabled, `refName`, `start`, `end`, and, if the region has
    /// one, `assemblyName` are appended to the query string. Otherwise, the base URL is used
    /// as is.
    pub fn request_url(&self, region: &Region) -> Url {
        build_url(&self.base_url, region, self.append_region_params)
    }
}

impl Source for Client {
    fn fetch(&self, region: &Region) -> BoxFuture<'static, Result<Value, Error>> {
        let url = self.request_url(region);

        let request = self
            .http_client
            .request(self.method.clone(), url.clone())
            .headers(self.headers.clone());

        async move {
            debug!(%url, "sending request");

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(Error::Status { status, url });
            }

            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(Error::from)
        }
        .boxed()
    }
}

fn build_url(base_url: &Url, region: &Region, append_region_params: bool) -> Url {
    let mut url = base_url.clone();

    if append_region_params {
        let mut query_pairs = url.query_pairs_mut();

        query_pairs
            .append_pair("refName", region.name())
            .append_pair("start", &region.start().to_string())
            .append_pair("end", &region.end().to_string());

        if let Some(assembly_name) = region.assembly_name() {
            query_pairs.append_pair("assemblyName", assembly_name);
        }
    }

    url
}
