//! Launch profile subsystem.
//!
//! # Data Flow
//! ```text
//! profile file (TOML, optional)
//!     → loader.rs (read & deserialize)
//!     → CLI overrides applied by the binary
//!     → validation.rs (semantic checks)
//!     → LaunchProfile (validated)
//!     → LaunchSpec::resolve (secrets pulled from the environment)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an empty profile plus CLI flags is enough
//! - Secret *values* never live in the profile, only the variable names
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_profile, read_profile, ConfigError};
pub use schema::{ContainerSection, LaunchProfile, MountSection, NetworkMode, RuntimeKind, SecretsSection};
pub use validation::{validate_profile, ValidationError};
