//! Curl command fragments and the request formatter.
//!
//! A request becomes an ordered list of fragments:
//!
//! ```text
//! curl -X POST 'https://api.example.com/v1/chat'   <- invocation
//! -H 'Content-Type: application/json'              <- one per header
//! -d '{"a":1}'                                     <- body, if any
//! ```
//!
//! The formatter does no redaction or pretty-printing. That is left to the
//! [`FragmentLogger`](crate::FragmentLogger) that receives the fragments.

use std::fmt;

use crate::error::CurlError;
use crate::request::{RequestBody, RequestDescriptor};
use crate::shell::{quote_if_needed, single_quote, unquote};

/// Prefix of a data fragment.
pub const DATA_FLAG: &str = "-d ";

/// Prefix of a header fragment.
pub const HEADER_FLAG: &str = "-H ";

/// One shell-argument group of a curl command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandFragment(String);

impl CommandFragment {
    /// Wrap an already rendered fragment.
    pub fn new(fragment: impl Into<String>) -> Self {
        Self(fragment.into())
    }

    /// The base `curl -X <METHOD> '<url>'` fragment.
    pub fn invocation(method: &str, url: &str) -> Self {
        Self(format!("curl -X {method} {}", single_quote(url)))
    }

    /// A `-H '<name>: <value>'` fragment.
    pub fn header(name: &str, value: &str) -> Self {
        Self(format!("{HEADER_FLAG}{}", single_quote(&format!("{name}: {value}"))))
    }

    /// A `-d '<body>'` fragment with the body shell-escaped.
    pub fn data(body: &str) -> Self {
        Self(format!("{DATA_FLAG}{}", single_quote(body)))
    }

    /// A `-d @<path>` fragment that reads the body from a file.
    pub fn data_file(path: &str) -> Self {
        Self(format!("{DATA_FLAG}@{}", quote_if_needed(path)))
    }

    /// The rendered fragment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the fragment, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Recover the original body from a `-d '<body>'` fragment.
    ///
    /// Returns `None` for any other fragment, including `-d @file`.
    pub fn data_payload(&self) -> Option<String> {
        let quoted = self.0.strip_prefix(DATA_FLAG)?;
        if !quoted.starts_with('\'') {
            return None;
        }
        unquote(quoted)
    }

    /// Split a `-H '<name>: <value>'` fragment into its name and value.
    pub fn header_parts(&self) -> Option<(String, String)> {
        let quoted = self.0.strip_prefix(HEADER_FLAG)?;
        let header = unquote(quoted)?;
        let (name, value) = header.split_once(':')?;
        Some((name.trim().to_string(), value.trim_start().to_string()))
    }

    /// Check whether this is a header fragment for `name`, ignoring case.
    pub fn is_header(&self, name: &str) -> bool {
        self.header_parts()
            .is_some_and(|(header, _)| header.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CommandFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommandFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convert a request into curl command fragments.
///
/// Fragments are ordered `[invocation, header…, data?]`, with headers in
/// insertion order and no deduplication. An empty text body produces no
/// data fragment.
///
/// # Errors
///
/// Returns [`CurlError::InvalidBodyType`] if the body is not text. No
/// fragments are produced in that case.
///
/// # Examples
///
/// ```
/// use curlify::{RequestDescriptor, format_request};
///
/// let request = RequestDescriptor::new("https://api.example.com")
///     .with_method("post")
///     .with_header("Accept", "application/json")
///     .with_body("it's");
///
/// let fragments = format_request(&request)?;
/// assert_eq!(fragments[0].as_str(), "curl -X POST 'https://api.example.com'");
/// assert_eq!(fragments[1].as_str(), "-H 'Accept: application/json'");
/// assert_eq!(fragments[2].as_str(), r"-d 'it'\''s'");
/// # Ok::<(), curlify::CurlError>(())
/// ```
pub fn format_request(request: &RequestDescriptor) -> Result<Vec<CommandFragment>, CurlError> {
    let body = match &request.body {
        None => None,
        Some(RequestBody::Text(text)) => Some(text.as_str()).filter(|text| !text.is_empty()),
        Some(other) => return Err(CurlError::InvalidBodyType { kind: other.kind() }),
    };

    let mut fragments = Vec::with_capacity(request.headers.len() + 2);
    fragments.push(CommandFragment::invocation(&request.method, &request.url));
    fragments.extend(
        request
            .headers
            .iter()
            .map(|(name, value)| CommandFragment::header(name, value)),
    );
    if let Some(body) = body {
        fragments.push(CommandFragment::data(body));
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn as_strs(fragments: &[CommandFragment]) -> Vec<&str> {
        fragments.iter().map(CommandFragment::as_str).collect()
    }

    #[test]
    fn test_format_get_without_headers() {
        let fragments = format_request(&RequestDescriptor::new("https://example.com")).unwrap();
        assert_eq!(as_strs(&fragments), vec!["curl -X GET 'https://example.com'"]);
    }

    #[test]
    fn test_format_full_request() {
        let request = RequestDescriptor::new("https://api.openai.com/v1/chat/completions")
            .with_method("post")
            .with_header("Content-Type", "application/json")
            .with_header("Authorization", "Bearer sk-abc123")
            .with_body(r#"{"model":"gpt-4o-mini"}"#);

        let fragments = format_request(&request).unwrap();

        assert_eq!(
            as_strs(&fragments),
            vec![
                "curl -X POST 'https://api.openai.com/v1/chat/completions'",
                "-H 'Content-Type: application/json'",
                "-H 'Authorization: Bearer sk-abc123'",
                r#"-d '{"model":"gpt-4o-mini"}'"#,
            ]
        );
    }

    #[test]
    fn test_format_keeps_duplicate_headers() {
        let request = RequestDescriptor::new("https://example.com")
            .with_header("X-Tag", "a")
            .with_header("X-Tag", "a");

        let fragments = format_request(&request).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[1], fragments[2]);
    }

    #[test]
    fn test_format_escapes_quotes_in_body() {
        let request = RequestDescriptor::new("https://example.com").with_body("it's 'quoted'");
        let fragments = format_request(&request).unwrap();

        let data = fragments.last().unwrap();
        assert_eq!(data.as_str(), r"-d 'it'\''s '\''quoted'\'''");
        assert_eq!(data.data_payload().as_deref(), Some("it's 'quoted'"));
    }

    #[test]
    fn test_format_skips_empty_body() {
        let request = RequestDescriptor::new("https://example.com").with_body("");
        let fragments = format_request(&request).unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_format_rejects_non_text_bodies() {
        for body in [
            RequestBody::Json(json!({"a": 1})),
            RequestBody::Bytes(vec![0xff]),
            RequestBody::Stream,
        ] {
            let request = RequestDescriptor::new("https://example.com").with_body(body);
            let result = format_request(&request);
            assert!(result.unwrap_err().is_invalid_body());
        }
    }

    #[test]
    fn test_data_payload_ignores_other_fragments() {
        assert_eq!(CommandFragment::header("A", "b").data_payload(), None);
        assert_eq!(CommandFragment::data_file("fetch_payload.json").data_payload(), None);
        assert_eq!(
            CommandFragment::data_file("fetch_payload.json").as_str(),
            "-d @fetch_payload.json"
        );
    }

    #[test]
    fn test_header_parts() {
        let fragment = CommandFragment::header("Authorization", "Bearer a:b");
        assert_eq!(
            fragment.header_parts(),
            Some(("Authorization".to_string(), "Bearer a:b".to_string()))
        );
        assert!(fragment.is_header("authorization"));
        assert!(!fragment.is_header("content-length"));
        assert_eq!(CommandFragment::data("x").header_parts(), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn header_order_mirrors_input(
            headers in proptest::collection::vec(("[A-Za-z-]{1,12}", "[ -~]{0,24}"), 0..8)
        ) {
            let mut request = RequestDescriptor::new("https://example.com");
            for (name, value) in &headers {
                request = request.with_header(name.as_str(), value.as_str());
            }

            let fragments = format_request(&request)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(fragments.len(), headers.len() + 1);
            for (fragment, (name, value)) in fragments[1..].iter().zip(&headers) {
                prop_assert_eq!(fragment, &CommandFragment::header(name, value));
            }
        }

        #[test]
        fn data_fragment_recovers_body(body in ".+") {
            let fragment = CommandFragment::data(&body);
            prop_assert_eq!(fragment.data_payload(), Some(body));
        }
    }
}
