//! Error types for the curl logging pipeline.

use thiserror::Error;

/// Errors that can occur while turning a request into a curl command.
///
/// Only [`CurlError::InvalidBodyType`] aborts a proxied call before the
/// request is sent. JSON payload failures are recovered inside the logger
/// and only ever reach the diagnostic stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurlError {
    /// The request carries a body that is not text.
    ///
    /// Structured, binary and streaming bodies cannot be rendered as a
    /// `-d` argument, so they are rejected instead of being coerced.
    #[error("Body must be a string, got {kind}")]
    InvalidBodyType {
        /// Short name of the body variant that was supplied.
        kind: &'static str,
    },

    /// The URL given to the url+options form could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The method is not a valid HTTP token.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A header name or value cannot be carried by an HTTP request.
    #[error("Invalid header: {name}")]
    InvalidHeader {
        /// Name of the offending header.
        name: String,
    },

    /// The `-d` payload is not valid JSON.
    #[error("Request body is not valid JSON: {0}")]
    JsonPayload(#[from] serde_json::Error),

    /// The default HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl CurlError {
    /// Check if this error is a rejected non-text body.
    pub const fn is_invalid_body(&self) -> bool {
        matches!(self, Self::InvalidBodyType { .. })
    }

    /// Extract a `CurlError` from a middleware error, if that is what it wraps.
    pub fn from_middleware(error: &reqwest_middleware::Error) -> Option<&Self> {
        match error {
            reqwest_middleware::Error::Middleware(inner) => inner.downcast_ref::<Self>(),
            reqwest_middleware::Error::Reqwest(_) => None,
        }
    }
}
