//! Launch profile validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Image reference present, container path absolute
//! - Secret variable names are usable environment variable names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LaunchProfile → Result<(), Vec<ValidationError>>
//! - Host path existence is NOT checked here; the launcher owns that check
//!   so it is reported as `ConfigNotFound` at launch time

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::LaunchProfile;

/// A single semantic problem in a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a profile, collecting every error found.
pub fn validate_profile(profile: &LaunchProfile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if profile.container.image.trim().is_empty() {
        errors.push(ValidationError::new("container.image", "image reference is required"));
    }

    if let Some(name) = &profile.container.name {
        if !is_valid_container_name(name) {
            errors.push(ValidationError::new(
                "container.name",
                format!("'{}' must match [a-zA-Z0-9][a-zA-Z0-9_.-]*", name),
            ));
        }
    }

    if profile.mount.host_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("mount.host_path", "host path is required"));
    }

    if !profile.mount.container_path.starts_with('/') {
        errors.push(ValidationError::new(
            "mount.container_path",
            format!("'{}' must be an absolute path", profile.mount.container_path),
        ));
    }

    if profile.secrets.env.is_empty() {
        errors.push(ValidationError::new("secrets.env", "at least one secret variable is required"));
    }

    let mut seen = HashSet::new();
    for name in &profile.secrets.env {
        if !is_valid_env_name(name) {
            errors.push(ValidationError::new(
                "secrets.env",
                format!("'{}' is not a valid environment variable name", name),
            ));
        }
        if !seen.insert(name.as_str()) {
            errors.push(ValidationError::new("secrets.env", format!("'{}' listed twice", name)));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_valid_container_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
