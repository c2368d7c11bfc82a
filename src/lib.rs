//! Config-driven container launcher.
//!
//! Starts a pre-built proxy service image with its configuration file
//! bind-mounted read-only and its secrets injected from the environment,
//! then leaves it running detached.

pub mod config;
pub mod launch;
pub mod observability;
pub mod runtime;

pub use config::LaunchProfile;
pub use launch::{LaunchError, LaunchSpec, Launcher, ProcessHandle};
pub use runtime::{CliRuntime, ContainerRuntime};
