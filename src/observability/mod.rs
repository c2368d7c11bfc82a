//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / runtime / launch
//!     → tracing events with structured fields
//!     → logging.rs (subscriber on stderr)
//! ```
//!
//! # Design Decisions
//! - stdout is reserved for command results (container ids, JSON state)
//! - Secret values are never recorded; only their variable names
//! - Log level configurable via `-v` and `RUST_LOG`

pub mod logging;
