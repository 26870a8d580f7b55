use std::{error, fmt, sync::Arc};

use reqwest::StatusCode;
use url::Url;

/// An error returned when features fail to be fetched.
///
/// A single fetch can be shared by several callers, so every caller receives a clone of the
/// same error.
#[derive(Clone, Debug)]
pub enum Error {
    /// The request failed to send or its body failed to be read.
    Request(Arc<reqwest::Error>),
    /// The server responded with a non-success status.
    Status {
        /// The response status.
        status: StatusCode,
        /// The request URL.
        url: Url,
    },
    /// The response body is not valid JSON.
    Decode(Arc<serde_json::Error>),
    /// The request was aborted.
    Aborted,
    /// A custom source failed.
    Other(Arc<dyn error::Error + Send + Sync>),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e.as_ref()),
            Self::Decode(e) => Some(e.as_ref()),
            Self::Other(e) => Some(e.as_ref()),
            Self::Status { .. } | Self::Aborted => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => match e.url() {
                Some(url) => write!(f, "request to {url} failed"),
                None => f.write_str("request failed"),
            },
            Self::Status { status, url } => write!(f, "HTTP {status}: failed to fetch from {url}"),
            Self::Decode(_) => f.write_str("invalid response body"),
            Self::Aborted => f.write_str("request aborted"),
            Self::Other(_) => f.write_str("source failed"),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(Arc::new(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(Arc::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt() -> Result<(), url::ParseError> {
        let url = Url::parse("https://example.com/alignments")?;

        let error = Error::Status {
            status: StatusCode::NOT_FOUND,
            url,
        };

        assert_eq!(
            error.to_string(),
            "HTTP 404 Not Found: failed to fetch from https://example.com/alignments"
        );

        assert_eq!(Error::Aborted.to_string(), "request aborted");

        Ok(())
    }
}
