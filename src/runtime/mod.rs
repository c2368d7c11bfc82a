//! Container runtime seam.
//!
//! # Data Flow
//! ```text
//! Launcher
//!     → ContainerRuntime::ping          (daemon reachable?)
//!     → ContainerRuntime::ensure_image  (inspect, pull on miss)
//!     → ContainerRuntime::run           (single create-and-start)
//!     ← ContainerId
//! ```
//!
//! # Design Decisions
//! - The trait is the only place the launcher touches the outside world,
//!   so tests swap in a recording mock
//! - Secret values travel in `RunRequest::env` and are never rendered into
//!   argv; the CLI backend passes them through the child environment

pub mod cli;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::config::NetworkMode;
use crate::launch::Secret;

pub use cli::CliRuntime;

/// Identifier reported by the runtime for a started container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(pub String);

impl ContainerId {
    /// Short form used by `docker ps` (first 12 characters).
    ///
    /// Only for log fields; names match exactly, so runtime commands take
    /// the full id.
    pub fn short(&self) -> &str {
        self.0
            .char_indices()
            .nth(12)
            .map_or(self.0.as_str(), |(end, _)| &self.0[..end])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A read-only bind mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    /// Absolute host path.
    pub host: PathBuf,
    pub container: String,
    pub read_only: bool,
}

impl BindMount {
    /// `host:container[:ro]` as understood by `-v`.
    pub fn volume_arg(&self) -> String {
        let mut arg = format!("{}:{}", self.host.display(), self.container);
        if self.read_only {
            arg.push_str(":ro");
        }
        arg
    }
}

/// Everything the runtime needs for one create-and-start call.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub image: String,
    pub name: Option<String>,
    pub mounts: Vec<BindMount>,
    /// Environment entries injected into the container.
    pub env: Vec<(String, Secret)>,
    pub network: NetworkMode,
    pub detached: bool,
    pub auto_remove: bool,
    pub read_only: bool,
    pub args: Vec<String>,
}

/// Subset of the runtime's `State` object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerState {
    #[serde(rename = "Running")]
    pub running: bool,

    #[serde(rename = "Status", default)]
    pub status: String,
}

/// Errors reported by a container runtime backend.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Binary missing or daemon unreachable.
    #[error("container runtime unavailable: {0}")]
    Unavailable(String),

    /// Image not present locally and the pull failed.
    #[error("image {image} could not be pulled: {reason}")]
    ImagePull { image: String, reason: String },

    /// A runtime command exited non-zero.
    #[error("{command} failed: {stderr}")]
    Command { command: String, stderr: String },

    /// Spawning the runtime process failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime output could not be understood.
    #[error("unexpected runtime output: {0}")]
    Parse(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Operations the launcher needs from a container runtime.
pub trait ContainerRuntime: Send + Sync {
    /// Check that the runtime can be reached.
    fn ping(&self) -> impl Future<Output = RuntimeResult<()>> + Send;

    /// Make sure `image` is available locally, pulling it if needed.
    fn ensure_image(&self, image: &str) -> impl Future<Output = RuntimeResult<()>> + Send;

    /// Create and start a container. Called exactly once per launch.
    fn run(&self, request: &RunRequest) -> impl Future<Output = RuntimeResult<ContainerId>> + Send;

    /// Inspect a container's state.
    fn state(&self, id: &ContainerId) -> impl Future<Output = RuntimeResult<ContainerState>> + Send;

    /// Stop a running container.
    fn stop(&self, id: &ContainerId) -> impl Future<Output = RuntimeResult<()>> + Send;
}
