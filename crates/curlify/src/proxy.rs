//! Request-sender proxy that logs a curl command before every request.
//!
//! [`CurlProxy`] wraps a [`RequestSender`] and is used in its place. Each
//! call formats the request, hands the fragments to the configured
//! [`FragmentLogger`], and only then delegates to the sender. Whatever the
//! sender returns is passed back unchanged.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::{Request, Response};
use reqwest_middleware::ClientWithMiddleware;

use crate::error::CurlError;
use crate::fragment::format_request;
use crate::logger::{FragmentLogger, PrettyJsonLogger};
use crate::request::{RequestDescriptor, RequestOptions};

/// Something that can send a built HTTP request.
#[async_trait]
pub trait RequestSender: Send + Sync {
    /// Send `request` and return the response.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying transport reports.
    async fn send(&self, request: Request) -> reqwest_middleware::Result<Response>;
}

#[async_trait]
impl RequestSender for reqwest::Client {
    async fn send(&self, request: Request) -> reqwest_middleware::Result<Response> {
        Ok(self.execute(request).await?)
    }
}

#[async_trait]
impl RequestSender for ClientWithMiddleware {
    async fn send(&self, request: Request) -> reqwest_middleware::Result<Response> {
        self.execute(request).await
    }
}

/// Format `request` and hand the fragments to `logger`.
///
/// Nothing is logged when formatting fails.
pub(crate) fn log_request(
    logger: &dyn FragmentLogger,
    request: &RequestDescriptor,
) -> Result<(), CurlError> {
    let fragments = format_request(request)?;
    debug!(
        "Logging {} {} as {} curl fragments",
        request.method,
        request.url,
        fragments.len()
    );
    logger.log(&fragments);
    Ok(())
}

/// Configuration for a [`CurlProxy`].
///
/// Both fields are optional. A missing logger becomes a
/// [`PrettyJsonLogger`] over the process environment, and a missing sender
/// becomes a default `reqwest::Client`.
#[derive(Clone, Default)]
pub struct CurlProxyConfig {
    /// Sink for the generated fragments.
    pub logger: Option<Arc<dyn FragmentLogger>>,
    /// Sender the proxy delegates to.
    pub fetch: Option<Arc<dyn RequestSender>>,
}

impl CurlProxyConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom logger.
    #[must_use]
    pub fn with_logger(mut self, logger: impl FragmentLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Delegate to a custom sender.
    #[must_use]
    pub fn with_fetch(mut self, fetch: impl RequestSender + 'static) -> Self {
        self.fetch = Some(Arc::new(fetch));
        self
    }
}

impl fmt::Debug for CurlProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlProxyConfig")
            .field("logger", &self.logger.as_ref().map(|_| "custom"))
            .field("fetch", &self.fetch.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Drop-in request sender that logs every request as a curl command.
///
/// The proxy is cheaply cloneable and keeps no per-call state, so it can be
/// shared across tasks.
///
/// # Examples
///
/// ```no_run
/// use curlify::{CurlProxy, CurlProxyConfig, PlainLogger, RequestOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let proxy = CurlProxy::new(CurlProxyConfig::new().with_logger(PlainLogger::new()))?;
///
/// let options = RequestOptions::builder()
///     .method("POST")
///     .headers(vec![("Content-Type".to_string(), "application/json".to_string())])
///     .body(r#"{"model":"gpt-4o-mini"}"#)
///     .build();
///
/// let response = proxy
///     .fetch_url("https://api.openai.com/v1/chat/completions", options)
///     .await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CurlProxy {
    logger: Arc<dyn FragmentLogger>,
    sender: Arc<dyn RequestSender>,
}

impl CurlProxy {
    /// Build a proxy, resolving missing configuration to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP client cannot be built.
    pub fn new(config: CurlProxyConfig) -> Result<Self, CurlError> {
        let logger = match config.logger {
            Some(logger) => logger,
            None => Arc::new(PrettyJsonLogger::from_process_env()),
        };
        let sender = match config.fetch {
            Some(sender) => sender,
            None => Arc::new(reqwest::Client::builder().build()?),
        };

        Ok(Self { logger, sender })
    }

    /// Log and send a pre-built request.
    ///
    /// # Errors
    ///
    /// Returns [`CurlError::InvalidBodyType`] (wrapped in a middleware error)
    /// if the body is not text, in which case nothing is logged or sent.
    /// Otherwise returns the sender's result unchanged.
    pub async fn fetch(&self, request: Request) -> reqwest_middleware::Result<Response> {
        let descriptor = RequestDescriptor::from_request(&request);
        log_request(self.logger.as_ref(), &descriptor)
            .map_err(reqwest_middleware::Error::middleware)?;

        self.sender.send(request).await
    }

    /// Log and send a request described by a URL and options.
    ///
    /// # Errors
    ///
    /// Returns [`CurlError::InvalidBodyType`] before logging if the body is
    /// not text. Returns other [`CurlError`]s after logging if the URL,
    /// method or headers cannot form a valid request. Otherwise returns the
    /// sender's result unchanged.
    pub async fn fetch_url(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> reqwest_middleware::Result<Response> {
        let descriptor = options.into_descriptor(url);
        log_request(self.logger.as_ref(), &descriptor)
            .map_err(reqwest_middleware::Error::middleware)?;

        let request = descriptor
            .to_request()
            .map_err(reqwest_middleware::Error::middleware)?;
        self.sender.send(request).await
    }
}

impl fmt::Debug for CurlProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlProxy").finish_non_exhaustive()
    }
}
