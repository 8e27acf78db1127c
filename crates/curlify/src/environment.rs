//! Read-only environment table used for credential redaction.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Key/value table consulted when redacting `Authorization` headers.
///
/// Values are held as [`SecretString`] so the table can be logged or
/// debug-printed without exposing credentials. Lookups scan keys in sorted
/// order, so when several variables hold the same value the
/// lexicographically first name wins.
///
/// # Examples
///
/// ```
/// use curlify::Environment;
///
/// let env = Environment::default().with_var("OPENAI_KEY", "sk-abc123");
/// assert_eq!(env.key_for_value("sk-abc123"), Some("OPENAI_KEY"));
/// assert_eq!(env.key_for_value("sk-other"), None);
/// ```
#[derive(Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, SecretString>,
}

impl Environment {
    /// Snapshot the variables of the current process.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Add or replace a variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars
            .insert(key.into(), SecretString::new(value.into().into_boxed_str()));
    }

    /// Number of variables in the table.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the table has no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Find the name of the variable whose value equals `candidate`.
    ///
    /// Empty candidates never match.
    pub fn key_for_value(&self, candidate: &str) -> Option<&str> {
        if candidate.is_empty() {
            return None;
        }

        self.vars
            .iter()
            .find(|(_, value)| value.expose_secret() == candidate)
            .map(|(key, _)| key.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::default();
        for (key, value) in iter {
            env.insert(key, value);
        }
        env
    }
}

// Only variable names are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}
