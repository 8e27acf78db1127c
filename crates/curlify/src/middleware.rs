//! `reqwest-middleware` integration.
//!
//! Adding [`CurlLoggerMiddleware`] to a [`reqwest_middleware::ClientBuilder`]
//! makes every request sent through the resulting client print a curl
//! command first. This is the usual way to intercept the traffic of an SDK
//! that accepts a `ClientWithMiddleware`.
//!
//! ```no_run
//! use curlify::CurlLoggerMiddleware;
//!
//! let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
//!     .with(CurlLoggerMiddleware::default())
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

use crate::logger::{FragmentLogger, PrettyJsonLogger};
use crate::proxy::log_request;
use crate::request::RequestDescriptor;

/// Middleware that logs each request as a curl command before forwarding it.
///
/// Requests with a non-text body are rejected with
/// [`CurlError::InvalidBodyType`](crate::CurlError::InvalidBodyType) and
/// never reach the rest of the chain. Responses and downstream errors are
/// returned untouched.
#[derive(Clone)]
pub struct CurlLoggerMiddleware {
    logger: Arc<dyn FragmentLogger>,
}

impl CurlLoggerMiddleware {
    /// Create middleware that logs through `logger`.
    pub fn new(logger: impl FragmentLogger + 'static) -> Self {
        Self {
            logger: Arc::new(logger),
        }
    }

    /// Create middleware sharing an existing logger.
    pub fn from_shared(logger: Arc<dyn FragmentLogger>) -> Self {
        Self { logger }
    }
}

impl Default for CurlLoggerMiddleware {
    fn default() -> Self {
        Self::new(PrettyJsonLogger::from_process_env())
    }
}

impl fmt::Debug for CurlLoggerMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlLoggerMiddleware").finish_non_exhaustive()
    }
}

#[async_trait]
impl Middleware for CurlLoggerMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let descriptor = RequestDescriptor::from_request(&req);
        log_request(self.logger.as_ref(), &descriptor)
            .map_err(reqwest_middleware::Error::middleware)?;

        next.run(req, extensions).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use std::sync::Mutex;

    use super::*;
    use crate::environment::Environment;
    use crate::error::CurlError;
    use crate::fragment::CommandFragment;
    use crate::logger::LINE_CONTINUATION;
    use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_with(logger: impl FragmentLogger + 'static) -> ClientWithMiddleware {
        ClientBuilder::new(reqwest::Client::new())
            .with(CurlLoggerMiddleware::new(logger))
            .build()
    }

    #[tokio::test]
    async fn test_middleware_logs_and_forwards() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let client = client_with(move |fragments: &[CommandFragment]| {
            sink.lock().unwrap().extend(fragments.iter().cloned());
        });

        let response = client
            .post(format!("{}/v1/chat/completions", mock_server.uri()))
            .header("Content-Type", "application/json")
            .body(r#"{"a":1}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        assert_eq!(response.text().await.unwrap(), "created");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].as_str().starts_with("curl -X POST 'http://"));
        assert_eq!(seen[1].as_str(), "-H 'content-type: application/json'");
        assert_eq!(seen[2].data_payload().as_deref(), Some(r#"{"a":1}"#));
    }

    #[tokio::test]
    async fn test_middleware_rejects_streaming_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_with(|_: &[CommandFragment]| {});
        let stream = futures_stream();

        let error = client
            .post(mock_server.uri())
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .unwrap_err();

        let curl_error = CurlError::from_middleware(&error).expect("curl error");
        assert!(curl_error.is_invalid_body());
    }

    #[tokio::test]
    async fn test_middleware_with_pretty_logger_renders_redacted_command() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let pretty =
            PrettyJsonLogger::new(Environment::default().with_var("OPENAI_KEY", "sk-abc123"));
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&rendered);
        let client = client_with(move |fragments: &[CommandFragment]| {
            sink.lock().unwrap().push(pretty.render(fragments).to_string());
        });

        client
            .post(mock_server.uri())
            .header("Authorization", "Bearer sk-abc123")
            .header("Content-Length", "7")
            .body(r#"{"a":1}"#)
            .send()
            .await
            .unwrap();

        let rendered = rendered.lock().unwrap();
        let expected_command = [
            format!("curl -X POST '{}/'", mock_server.uri()),
            r#"-H "Authorization: Bearer $OPENAI_KEY""#.to_string(),
            "-d @fetch_payload.json".to_string(),
        ]
        .join(LINE_CONTINUATION);

        assert_eq!(
            rendered[0],
            format!("cat > fetch_payload.json <<'EOF'\n{{\n  \"a\": 1\n}}\nEOF\n{expected_command}")
        );
    }

    fn futures_stream() -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> + Send {
        futures::stream::iter(vec![Ok(b"chunk".to_vec())])
    }
}
