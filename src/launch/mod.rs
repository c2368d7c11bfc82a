//! Launch subsystem.
//!
//! # Data Flow
//! ```text
//! LaunchProfile + environment
//!     → LaunchSpec::resolve (secrets looked up, fail closed)
//!     → Launcher::launch
//!         NotStarted → Starting → Running | Failed
//!     → ProcessHandle (container id)
//! ```
//!
//! # Design Decisions
//! - Local checks (config file, secrets) run before the runtime is contacted
//! - Exactly one start call per launch; no dedup, no retry
//! - Nothing to clean up on failure: nothing exists before the start call

pub mod error;
pub mod launcher;
pub mod secret;
pub mod spec;

pub use error::LaunchError;
pub use launcher::{LaunchState, Launcher, ProcessHandle};
pub use secret::Secret;
pub use spec::LaunchSpec;
