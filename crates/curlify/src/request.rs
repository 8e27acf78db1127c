//! Request descriptors: the input side of the curl formatter.
//!
//! A [`RequestDescriptor`] is an owned snapshot of the parts of an HTTP
//! request that appear in a curl command line. It can be captured from a
//! [`reqwest::Request`] or assembled from a URL plus [`RequestOptions`].

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Method, Request};
use typed_builder::TypedBuilder;

use crate::error::CurlError;

/// Method used when none is given.
pub const DEFAULT_METHOD: &str = "GET";

/// Body of an outgoing request.
///
/// Only [`RequestBody::Text`] can be rendered as curl data. The other
/// variants exist so callers can hand over what they actually have and get
/// an explicit [`CurlError::InvalidBodyType`] back.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// UTF-8 text, sent as-is.
    Text(String),
    /// Raw bytes that are not valid UTF-8.
    Bytes(Vec<u8>),
    /// A structured value that was never serialized.
    Json(serde_json::Value),
    /// A streaming body whose contents are not available up front.
    Stream,
}

impl RequestBody {
    /// Short name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "object",
            Self::Stream => "stream",
        }
    }

    /// The body text, if this is a text body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Everything about a request that ends up on the curl command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Target URL, exactly as it will be printed.
    pub url: String,
    /// Upper-cased HTTP method.
    pub method: String,
    /// Headers in insertion order. Duplicates are kept.
    pub headers: Vec<(String, String)>,
    /// Optional request body.
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    /// Create a `GET` descriptor for `url` with no headers and no body.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: DEFAULT_METHOD.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set the method. It is upper-cased, and an empty method means `GET`.
    #[must_use]
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = normalize_method(method);
        self
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Capture a descriptor from a built `reqwest` request.
    ///
    /// Buffered bodies that decode as UTF-8 become [`RequestBody::Text`];
    /// other buffered bodies become [`RequestBody::Bytes`] and streaming
    /// bodies become [`RequestBody::Stream`]. Header values that are not
    /// valid UTF-8 are converted lossily.
    pub fn from_request(request: &Request) -> Self {
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = request.body().map(|body| match body.as_bytes() {
            Some(bytes) => std::str::from_utf8(bytes).map_or_else(
                |_| RequestBody::Bytes(bytes.to_vec()),
                |text| RequestBody::Text(text.to_string()),
            ),
            None => RequestBody::Stream,
        });

        Self {
            url: request.url().to_string(),
            method: normalize_method(request.method().as_str()),
            headers,
            body,
        }
    }

    /// Build a `reqwest` request carrying the same method, URL, headers and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, method or a header is invalid, or if the
    /// body is not text.
    pub fn to_request(&self) -> Result<Request, CurlError> {
        let url = url::Url::parse(&self.url)
            .map_err(|e| CurlError::InvalidUrl(format!("{}: {e}", self.url)))?;
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| CurlError::InvalidMethod(self.method.clone()))?;

        let mut request = Request::new(method, url);

        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|_| CurlError::InvalidHeader {
                    name: name.clone(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| CurlError::InvalidHeader {
                name: name.clone(),
            })?;
            request.headers_mut().append(header_name, header_value);
        }

        match &self.body {
            None => {}
            Some(RequestBody::Text(text)) => *request.body_mut() = Some(text.clone().into()),
            Some(other) => return Err(CurlError::InvalidBodyType { kind: other.kind() }),
        }

        Ok(request)
    }
}

/// Options for the url+options form of a proxied call.
///
/// # Examples
///
/// ```
/// use curlify::RequestOptions;
///
/// let options = RequestOptions::builder()
///     .method("post")
///     .headers(vec![("Content-Type".to_string(), "application/json".to_string())])
///     .body(r#"{"a":1}"#)
///     .build();
///
/// let descriptor = options.into_descriptor("https://api.example.com/v1");
/// assert_eq!(descriptor.method, "POST");
/// ```
#[derive(Debug, Clone, Default, PartialEq, TypedBuilder)]
pub struct RequestOptions {
    /// HTTP method, `GET` when absent.
    #[builder(default, setter(strip_option, into))]
    pub method: Option<String>,
    /// Headers in the order they should be sent.
    #[builder(default)]
    pub headers: Vec<(String, String)>,
    /// Request body.
    #[builder(default, setter(strip_option, into))]
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    /// Combine these options with a URL.
    pub fn into_descriptor(self, url: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor {
            url: url.into(),
            method: normalize_method(self.method.as_deref().unwrap_or_default()),
            headers: self.headers,
            body: self.body,
        }
    }
}

fn normalize_method(method: &str) -> String {
    let method = method.trim();
    if method.is_empty() {
        DEFAULT_METHOD.to_string()
    } else {
        method.to_ascii_uppercase()
    }
}
