//! Sensitive attribute payload marker
//!
//! Schema fields flagged as sensitive (passwords, tokens, private keys)
//! still flow through the readers as plain strings. Wrapping the payload in
//! `Sensitive<T>` before it reaches a log line keeps it out of the output.

use std::fmt;

/// Placeholder written in place of a redacted payload
pub const REDACTED: &str = "***REDACTED***";

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use flatstate_core_types::Sensitive;
///
/// let password = Sensitive::new("secret123");
/// assert_eq!(format!("{}", password), "***REDACTED***");
/// assert_eq!(password.expose(), &"secret123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// A payload that is shown in clear text unless its field is sensitive
///
/// Used by the readers to log flat attribute payloads without deciding at
/// every call site whether a redaction applies.
pub enum Payload<'a> {
    Clear(&'a str),
    Redacted(Sensitive<&'a str>),
}

impl<'a> Payload<'a> {
    /// Build a payload, redacting it when `sensitive` is set
    pub fn new(raw: &'a str, sensitive: bool) -> Self {
        if sensitive {
            Payload::Redacted(Sensitive::new(raw))
        } else {
            Payload::Clear(raw)
        }
    }
}

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Clear(raw) => f.write_str(raw),
            Payload::Redacted(s) => fmt::Display::fmt(s, f),
        }
    }
}
