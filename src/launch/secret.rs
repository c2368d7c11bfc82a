//! Secret values.
//!
//! # Security
//! - `Debug` and `Display` are redacted
//! - Not serializable
//! - Only `expose` hands out the raw value

use std::fmt;

/// Values commonly left in sample deployments.
const PLACEHOLDERS: &[&str] = &["changeme", "change_me", "change_me_in_production", "sk-1234", "secret", "password"];

/// A secret string that never prints its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value. Only for handing to the runtime's environment.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Matches a well-known sample value.
    pub fn is_placeholder(&self) -> bool {
        let value = self.0.trim().to_ascii_lowercase();
        PLACEHOLDERS.contains(&value.as_str())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
