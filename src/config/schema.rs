//! Launch profile schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML profiles.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default container-side location of the mounted configuration file.
pub const DEFAULT_CONTAINER_CONFIG_PATH: &str = "/app/config.yaml";

/// Environment variable carrying the service master key.
pub const MASTER_KEY_ENV: &str = "MASTER_KEY";

/// Environment variable carrying the salt used to encrypt stored credentials.
pub const SALT_KEY_ENV: &str = "SALT_KEY";

/// Root launch profile.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LaunchProfile {
    /// Which container runtime CLI to drive.
    pub runtime: RuntimeKind,

    /// Container settings (image, network, lifecycle flags).
    pub container: ContainerSection,

    /// The configuration file bind mount.
    pub mount: MountSection,

    /// Secret variable names forwarded into the container.
    pub secrets: SecretsSection,
}

/// Container settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerSection {
    /// Image reference. Opaque; the runtime resolves it.
    pub image: String,

    /// Optional container name (`--name`).
    pub name: Option<String>,

    /// Network namespace mode.
    pub network: NetworkMode,

    /// Start in the background and return immediately.
    pub detached: bool,

    /// Remove the container's resources when it exits (`--rm`).
    pub auto_remove: bool,

    /// Mount the container root filesystem read-only.
    pub read_only: bool,

    /// Arguments appended after the image reference.
    pub args: Vec<String>,
}

impl Default for ContainerSection {
    fn default() -> Self {
        Self {
            image: String::new(),
            name: None,
            network: NetworkMode::Host,
            detached: true,
            auto_remove: true,
            read_only: false,
            args: Vec::new(),
        }
    }
}

/// Configuration file mount.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MountSection {
    /// Host path of the configuration file.
    pub host_path: PathBuf,

    /// Where the file appears inside the container.
    pub container_path: String,
}

impl Default for MountSection {
    fn default() -> Self {
        Self {
            host_path: PathBuf::from("config.yaml"),
            container_path: DEFAULT_CONTAINER_CONFIG_PATH.to_string(),
        }
    }
}

/// Secret forwarding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecretsSection {
    /// Names of environment variables read from the caller and injected
    /// into the container under the same name.
    pub env: Vec<String>,
}

impl Default for SecretsSection {
    fn default() -> Self {
        Self {
            env: vec![MASTER_KEY_ENV.to_string(), SALT_KEY_ENV.to_string()],
        }
    }
}

/// Network namespace mode requested from the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Share the host network namespace (no port remapping).
    #[default]
    Host,
    /// Runtime-managed bridge network.
    Bridge,
    /// No networking.
    None,
}

impl NetworkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkMode::Host => "host",
            NetworkMode::Bridge => "bridge",
            NetworkMode::None => "none",
        }
    }
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "host" => Ok(NetworkMode::Host),
            "bridge" => Ok(NetworkMode::Bridge),
            "none" => Ok(NetworkMode::None),
            other => Err(format!("unknown network mode '{}' (expected host, bridge or none)", other)),
        }
    }
}

/// Container runtime CLI flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    #[default]
    Docker,
    Podman,
}

impl RuntimeKind {
    /// Executable name looked up on `PATH`.
    pub fn binary(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "docker",
            RuntimeKind::Podman => "podman",
        }
    }
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for RuntimeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docker" => Ok(RuntimeKind::Docker),
            "podman" => Ok(RuntimeKind::Podman),
            other => Err(format!("unknown runtime '{}' (expected docker or podman)", other)),
        }
    }
}
