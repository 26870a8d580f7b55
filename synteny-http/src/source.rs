use futures::future::BoxFuture;
use serde_json::Value;
use synteny_core::Region;

use crate::Error;

/// A source of alignment responses.
///
/// A source fetches the raw response body for a region. [`crate::Client`] is the HTTP
/// source; other implementations can serve responses from elsewhere.
pub trait Source: Send + Sync + 'static {
    /// Fetches the response body for the given region.
    ///
    /// Dropping the returned future cancels the fetch.
    fn fetch(&self, region: &Region) -> BoxFuture<'static, Result<Value, Error>>;
}
