//! `Authorization` header redaction.
//!
//! A credential that matches the value of an environment variable is
//! replaced with a reference to that variable, double-quoted so the shell
//! expands it when the logged command is run. Credentials that match no
//! variable are left in clear text, and no other header is redacted.

use log::trace;

use crate::environment::Environment;
use crate::fragment::CommandFragment;

const AUTHORIZATION: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// Replace a matching `Authorization` fragment with a variable reference.
///
/// Returns `None` when `fragment` is not an `Authorization` header or its
/// credential is not found in `env`.
///
/// # Examples
///
/// ```
/// use curlify::{CommandFragment, Environment};
/// use curlify::redact::redact_authorization;
///
/// let env = Environment::default().with_var("OPENAI_KEY", "sk-abc123");
/// let header = CommandFragment::header("Authorization", "Bearer sk-abc123");
///
/// let redacted = redact_authorization(&header, &env).map(CommandFragment::into_string);
/// assert_eq!(redacted.as_deref(), Some(r#"-H "Authorization: Bearer $OPENAI_KEY""#));
/// ```
pub fn redact_authorization(
    fragment: &CommandFragment,
    env: &Environment,
) -> Option<CommandFragment> {
    let (name, value) = fragment.header_parts()?;
    if !name.eq_ignore_ascii_case(AUTHORIZATION) {
        return None;
    }

    let (scheme, candidate) = value
        .strip_prefix(BEARER_PREFIX)
        .map_or(("", value.as_str()), |token| (BEARER_PREFIX, token));

    let key = env.key_for_value(candidate)?;
    trace!("Redacted Authorization header as ${key}");

    Some(CommandFragment::new(format!(
        "-H \"{AUTHORIZATION}: {scheme}${key}\""
    )))
}
