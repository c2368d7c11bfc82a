//! Launch error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

use crate::runtime::RuntimeError;

/// Errors that end a launch. All are terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The configuration file to mount is missing or not a regular file.
    #[error("configuration file {} not found: {reason}", path.display())]
    ConfigNotFound { path: PathBuf, reason: String },

    /// A required secret is unset or empty.
    #[error("secret {name} is missing or empty")]
    MissingSecret { name: String },

    /// The container runtime cannot be reached.
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// The image is neither present locally nor pullable.
    #[error("image {image} could not be obtained: {reason}")]
    ImagePullFailed { image: String, reason: String },

    /// The runtime rejected the create-and-start call.
    #[error("container failed to start: {0}")]
    StartFailed(String),
}

impl LaunchError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::ConfigNotFound { .. } => 3,
            LaunchError::MissingSecret { .. } => 4,
            LaunchError::RuntimeUnavailable(_) => 5,
            LaunchError::ImagePullFailed { .. } => 6,
            LaunchError::StartFailed(_) => 7,
        }
    }

    /// Map a runtime failure that happened while starting the container.
    pub(crate) fn from_start(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Unavailable(msg) => LaunchError::RuntimeUnavailable(msg),
            RuntimeError::ImagePull { image, reason } => LaunchError::ImagePullFailed { image, reason },
            // The runtime process could not be spawned at all.
            RuntimeError::Io(e) => LaunchError::RuntimeUnavailable(format!("failed to execute runtime: {}", e)),
            other => LaunchError::StartFailed(other.to_string()),
        }
    }
}
