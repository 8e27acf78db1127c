//! POSIX shell quoting for generated command fragments.
//!
//! Every quoted value is wrapped in single quotes. An embedded `'` closes the
//! quoted run, emits an escaped literal quote and reopens quoting, so `'`
//! becomes `'\''`. [`unquote`] is the exact inverse of [`single_quote`].

/// Quote `value` as a single shell word.
///
/// # Examples
///
/// ```
/// use curlify::shell::single_quote;
///
/// assert_eq!(single_quote("it's"), r"'it'\''s'");
/// ```
pub fn single_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push_str(r"'\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Quote `value` only when it contains characters a shell would interpret.
pub fn quote_if_needed(value: &str) -> String {
    let is_plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | ':' | '+' | ','));

    if is_plain {
        value.to_string()
    } else {
        single_quote(value)
    }
}

/// Recover the literal value of a shell word.
///
/// Understands single-quoted runs and backslash escapes outside quotes,
/// which covers everything [`single_quote`] produces. Returns `None` for an
/// unterminated quote or a trailing backslash.
///
/// # Examples
///
/// ```
/// use curlify::shell::unquote;
///
/// assert_eq!(unquote(r"'it'\''s'").as_deref(), Some("it's"));
/// assert_eq!(unquote("'open"), None);
/// ```
pub fn unquote(word: &str) -> Option<String> {
    let mut value = String::with_capacity(word.len());
    let mut chars = word.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => loop {
                match chars.next()? {
                    '\'' => break,
                    inner => value.push(inner),
                }
            },
            '\\' => value.push(chars.next()?),
            other => value.push(other),
        }
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quote_plain() {
        assert_eq!(single_quote("hello world"), "'hello world'");
        assert_eq!(single_quote(""), "''");
    }

    #[test]
    fn test_single_quote_embedded_quotes() {
        assert_eq!(single_quote("'"), r"''\'''");
        assert_eq!(single_quote("a'b'c"), r"'a'\''b'\''c'");
    }

    #[test]
    fn test_unquote_embedded_quotes() {
        assert_eq!(unquote(r"'a'\''b'\''c'").as_deref(), Some("a'b'c"));
    }

    #[test]
    fn test_unquote_preserves_literal_escape_sequence() {
        // A body that itself contains the escape sequence must survive.
        let body = r"x'\''y";
        assert_eq!(unquote(&single_quote(body)).as_deref(), Some(body));
    }

    #[test]
    fn test_unquote_rejects_malformed_words() {
        assert_eq!(unquote("'unterminated"), None);
        assert_eq!(unquote("trailing\\"), None);
    }

    #[test]
    fn test_unquote_double_quotes_are_literal() {
        assert_eq!(unquote("\"abc\"").as_deref(), Some("\"abc\""));
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("fetch_payload.json"), "fetch_payload.json");
        assert_eq!(quote_if_needed("my payload.json"), "'my payload.json'");
        assert_eq!(quote_if_needed(""), "''");
    }
}
