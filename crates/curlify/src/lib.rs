//! # curlify
//!
//! Debugging aid that prints every outgoing HTTP request as an equivalent
//! `curl` command before the request is sent, so API calls (for example to
//! LLM providers) can be replayed outside the program.
//!
//! The pipeline has two halves:
//! - [`format_request`] turns a [`RequestDescriptor`] into ordered
//!   [`CommandFragment`]s: the invocation, one `-H` per header, and `-d`
//!   for the body.
//! - A [`FragmentLogger`] renders those fragments. The default
//!   [`PrettyJsonLogger`] moves JSON bodies into a heredoc that writes
//!   `fetch_payload.json`, swaps credentials found in the environment for
//!   `$VAR` references and drops stale `Content-Length` headers.
//!
//! Requests are intercepted either by [`CurlProxy`], a standalone sender
//! wrapper, or by [`CurlLoggerMiddleware`] inside a
//! `reqwest_middleware::ClientWithMiddleware`. Either way the log is written
//! before the request is sent and the response is returned untouched.
//!
//! ## Example
//!
//! ```no_run
//! use curlify::{CurlLoggerMiddleware, Environment, PrettyJsonLogger};
//!
//! # async fn example() -> Result<(), reqwest_middleware::Error> {
//! let logger = PrettyJsonLogger::new(Environment::from_process());
//! let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
//!     .with(CurlLoggerMiddleware::new(logger))
//!     .build();
//!
//! // Prints the heredoc and curl command to stderr, then sends the request.
//! client
//!     .post("https://api.openai.com/v1/chat/completions")
//!     .header("Content-Type", "application/json")
//!     .body(r#"{"model":"gpt-4o-mini","messages":[]}"#)
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! Only the `Authorization` header is redacted, and only when its value is
//! found in the environment table. Other credentials are printed in clear.

pub mod environment;
pub mod error;
pub mod fragment;
pub mod logger;
pub mod middleware;
pub mod proxy;
pub mod redact;
pub mod request;
pub mod shell;

pub use environment::Environment;
pub use error::CurlError;
pub use fragment::{CommandFragment, format_request};
pub use logger::{
    DEFAULT_PAYLOAD_FILE, FragmentLogger, LINE_CONTINUATION, PlainLogger, PrettyJsonLogger,
    RenderedCommand,
};
pub use middleware::CurlLoggerMiddleware;
pub use proxy::{CurlProxy, CurlProxyConfig, RequestSender};
pub use request::{RequestBody, RequestDescriptor, RequestOptions};
