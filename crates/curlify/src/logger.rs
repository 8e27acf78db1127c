//! Fragment loggers: sinks that turn curl fragments into diagnostic text.
//!
//! A [`FragmentLogger`] receives the fragments of every request before it is
//! sent. Any `Fn(&[CommandFragment]) + Send + Sync` closure is a logger, and
//! two are provided:
//!
//! - [`PlainLogger`] joins the fragments with a line continuation.
//! - [`PrettyJsonLogger`] also moves JSON bodies into a heredoc, redacts
//!   `Authorization` credentials found in the environment and drops stale
//!   `Content-Length` headers.
//!
//! Both write to stderr.

use std::fmt;

use log::warn;

use crate::environment::Environment;
use crate::error::CurlError;
use crate::fragment::CommandFragment;
use crate::redact::redact_authorization;
use crate::shell::quote_if_needed;

/// Separator placed between fragments: backslash, newline, indentation.
pub const LINE_CONTINUATION: &str = " \\\n  ";

/// File the pretty logger externalizes JSON payloads to.
pub const DEFAULT_PAYLOAD_FILE: &str = "fetch_payload.json";

/// Terminator of the generated heredoc.
pub const HEREDOC_DELIMITER: &str = "EOF";

const CONTENT_LENGTH: &str = "Content-Length";

/// A sink for the curl fragments of one request.
pub trait FragmentLogger: Send + Sync {
    /// Consume the fragments of a single request.
    fn log(&self, fragments: &[CommandFragment]);
}

impl<F> FragmentLogger for F
where
    F: Fn(&[CommandFragment]) + Send + Sync,
{
    fn log(&self, fragments: &[CommandFragment]) {
        self(fragments);
    }
}

fn join(fragments: &[CommandFragment], separator: &str) -> String {
    fragments
        .iter()
        .map(CommandFragment::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Logger that prints the fragments as they are.
#[derive(Debug, Clone)]
pub struct PlainLogger {
    separator: String,
}

impl PlainLogger {
    /// Create a logger using [`LINE_CONTINUATION`].
    pub fn new() -> Self {
        Self {
            separator: LINE_CONTINUATION.to_string(),
        }
    }

    /// Use a different separator between fragments.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Render the fragments without emitting them.
    pub fn render(&self, fragments: &[CommandFragment]) -> String {
        join(fragments, &self.separator)
    }
}

impl Default for PlainLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentLogger for PlainLogger {
    fn log(&self, fragments: &[CommandFragment]) {
        eprintln!("{}", self.render(fragments));
    }
}

/// Output of [`PrettyJsonLogger::render`].
///
/// `Display` produces the text written to the diagnostic stream: the heredoc
/// (if any) followed by the command line. The JSON error is reported
/// separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    /// Shell snippet writing the pretty-printed JSON payload to disk.
    pub heredoc: Option<String>,
    /// The curl command line.
    pub command: String,
    /// Why the body could not be parsed as JSON, if it could not.
    pub json_error: Option<String>,
}

impl RenderedCommand {
    /// Check if a JSON payload was externalized.
    pub const fn has_json_body(&self) -> bool {
        self.heredoc.is_some()
    }
}

impl fmt::Display for RenderedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(heredoc) = &self.heredoc {
            writeln!(f, "{heredoc}")?;
        }
        f.write_str(&self.command)
    }
}

/// Logger that pretty-prints JSON bodies and redacts credentials.
///
/// For every request it:
///
/// 1. Parses the `-d` payload as JSON. On success the payload is written to
///    a heredoc targeting the payload file and the data fragment becomes
///    `-d @fetch_payload.json`. On failure the fragment is kept and the parse
///    error is reported.
/// 2. Replaces `Authorization` credentials that match an environment
///    variable with a reference to it.
/// 3. Drops `Content-Length` headers when the payload was externalized.
/// 4. Prints the heredoc followed by the command line.
///
/// # Examples
///
/// ```
/// use curlify::{Environment, PrettyJsonLogger, RequestDescriptor, format_request};
///
/// let logger = PrettyJsonLogger::new(Environment::default());
/// let request = RequestDescriptor::new("https://example.com")
///     .with_method("POST")
///     .with_body(r#"{"a":1}"#);
///
/// let rendered = logger.render(&format_request(&request)?);
/// assert!(rendered.has_json_body());
/// assert!(rendered.command.ends_with("-d @fetch_payload.json"));
/// # Ok::<(), curlify::CurlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PrettyJsonLogger {
    environment: Environment,
    payload_file: String,
    separator: String,
}

impl PrettyJsonLogger {
    /// Create a logger that redacts against `environment`.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            payload_file: DEFAULT_PAYLOAD_FILE.to_string(),
            separator: LINE_CONTINUATION.to_string(),
        }
    }

    /// Create a logger that redacts against the process environment.
    pub fn from_process_env() -> Self {
        Self::new(Environment::from_process())
    }

    /// Replace the environment used for redaction.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Externalize payloads to a different file name.
    #[must_use]
    pub fn with_payload_file(mut self, payload_file: impl Into<String>) -> Self {
        self.payload_file = payload_file.into();
        self
    }

    /// Use a different separator between fragments.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Name of the file JSON payloads are externalized to.
    pub fn payload_file(&self) -> &str {
        &self.payload_file
    }

    /// Render the fragments without emitting them.
    pub fn render(&self, fragments: &[CommandFragment]) -> RenderedCommand {
        let mut heredoc = None;
        let mut json_error = None;
        let mut parts = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            if let Some(payload) = fragment.data_payload() {
                match pretty_json(&payload) {
                    Ok(pretty) => {
                        heredoc = Some(self.heredoc(&pretty));
                        parts.push(CommandFragment::data_file(&self.payload_file));
                    }
                    Err(e) => {
                        warn!("Leaving request body inline: {e}");
                        json_error = Some(e.to_string());
                        parts.push(fragment.clone());
                    }
                }
                continue;
            }

            parts.push(
                redact_authorization(fragment, &self.environment)
                    .unwrap_or_else(|| fragment.clone()),
            );
        }

        if heredoc.is_some() {
            parts.retain(|part| !part.is_header(CONTENT_LENGTH));
        }

        RenderedCommand {
            heredoc,
            command: join(&parts, &self.separator),
            json_error,
        }
    }

    fn heredoc(&self, pretty: &str) -> String {
        format!(
            "cat > {} <<'{HEREDOC_DELIMITER}'\n{pretty}\n{HEREDOC_DELIMITER}",
            quote_if_needed(&self.payload_file)
        )
    }
}

impl Default for PrettyJsonLogger {
    fn default() -> Self {
        Self::from_process_env()
    }
}

impl FragmentLogger for PrettyJsonLogger {
    fn log(&self, fragments: &[CommandFragment]) {
        let rendered = self.render(fragments);
        if let Some(error) = &rendered.json_error {
            eprintln!("{error}");
        }
        eprintln!("{rendered}");
    }
}

fn pretty_json(payload: &str) -> Result<String, CurlError> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
