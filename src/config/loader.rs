//! Launch profile loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::LaunchProfile;
use crate::config::validation::{validate_profile, ValidationError};

/// Error type for profile loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML profile without validating it.
///
/// The binary applies CLI overrides before validation, so the two steps are
/// exposed separately.
pub fn read_profile(path: &Path) -> Result<LaunchProfile, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate a launch profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<LaunchProfile, ConfigError> {
    let profile = read_profile(path)?;
    validate_profile(&profile).map_err(ConfigError::Validation)?;
    Ok(profile)
}
