use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum VebraError {
    /// A transport-level failure (connection, DNS, timeout). Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A resource URL could not be assembled or parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Both the initial attempt and the forced-credentials retry were
    /// rejected with 401. Terminal; no further retries are made.
    #[error("authentication failed after credential retry: {url}")]
    AuthenticationFailed {
        /// The URL that rejected both attempts.
        url: String,
    },

    /// The server returned 304: nothing has changed since the supplied
    /// `If-Modified-Since` watermark. Distinct from real failures so callers
    /// can special-case "no new data".
    #[error("not modified since the supplied watermark: {url}")]
    NotModified {
        /// The URL that reported no changes.
        url: String,
    },

    /// The server returned an unexpected non-success status code.
    #[error("unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The response body was not well-formed XML.
    #[error("malformed XML response: {0}")]
    MalformedResponse(String),

    /// A dependent call was made without the context it needs, or the
    /// builder was misconfigured.
    #[error("usage error: {0}")]
    Usage(String),

    /// A Unix timestamp was outside the representable calendar range.
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}
