//! Runtime backend that drives the `docker` or `podman` command line.
//!
//! # Responsibilities
//! - Locate the runtime binary on `PATH`
//! - Translate a `RunRequest` into `run` arguments
//! - Interpret exit status and output of each runtime command
//!
//! # Design Decisions
//! - Secrets are passed as `-e NAME` with the value set on the child's
//!   environment, so they never show up in `ps` output or logs
//! - Foreground runs inherit stdio and are identified by container name

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::RuntimeKind;
use crate::runtime::{ContainerId, ContainerRuntime, ContainerState, RunRequest, RuntimeError, RuntimeResult};

/// `docker`/`podman` CLI backend.
#[derive(Debug, Clone)]
pub struct CliRuntime {
    kind: RuntimeKind,
    binary: PathBuf,
}

impl CliRuntime {
    /// Runtime resolved from `PATH` when first used.
    ///
    /// The lookup happens in `ping`, so launches report local problems
    /// (config file, secrets) before a missing binary.
    pub fn new(kind: RuntimeKind) -> Self {
        Self {
            kind,
            binary: PathBuf::from(kind.binary()),
        }
    }

    /// Locate the runtime binary on `PATH`.
    pub fn locate(kind: RuntimeKind) -> RuntimeResult<Self> {
        let binary = which::which(kind.binary())
            .map_err(|e| RuntimeError::Unavailable(format!("{} not found on PATH: {}", kind.binary(), e)))?;

        tracing::debug!(runtime = %kind, binary = %binary.display(), "Container runtime located");
        Ok(Self { kind, binary })
    }

    /// Use an explicit binary path.
    pub fn with_binary(kind: RuntimeKind, binary: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            binary: binary.into(),
        }
    }

    pub fn kind(&self) -> RuntimeKind {
        self.kind
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.kill_on_drop(true);
        cmd
    }

    /// Run a runtime subcommand to completion and return trimmed stdout.
    async fn output(&self, args: &[&str]) -> RuntimeResult<String> {
        let out = self
            .command()
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !out.status.success() {
            return Err(RuntimeError::Command {
                command: format!("{} {}", self.kind, args.join(" ")),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

/// Build the arguments for `<runtime> run`, excluding the binary itself.
///
/// The returned list never contains secret values.
pub fn run_args(request: &RunRequest) -> Vec<String> {
    let mut args = vec!["run".to_string()];

    if request.detached {
        args.push("-d".into());
    }
    if request.auto_remove {
        args.push("--rm".into());
    }
    if let Some(name) = &request.name {
        args.push("--name".into());
        args.push(name.clone());
    }
    if request.read_only {
        args.push("--read-only".into());
    }

    args.push("--network".into());
    args.push(request.network.as_str().into());

    for mount in &request.mounts {
        args.push("-v".into());
        args.push(mount.volume_arg());
    }
    for (name, _) in &request.env {
        args.push("-e".into());
        args.push(name.clone());
    }

    args.push(request.image.clone());
    args.extend(request.args.iter().cloned());
    args
}

/// Arguments for `<runtime> inspect`. The id is passed whole: names only
/// match exactly.
pub fn state_args(id: &ContainerId) -> [&str; 4] {
    ["inspect", "--format", "{{json .State}}", id.as_str()]
}

/// Arguments for `<runtime> stop`.
pub fn stop_args(id: &ContainerId) -> [&str; 2] {
    ["stop", id.as_str()]
}

/// Foreground runs need a stable handle; generate a name when none is set.
fn foreground_name(request: &RunRequest) -> String {
    request.name.clone().unwrap_or_else(|| {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!("proxy-launcher-{}", &id[..12])
    })
}

impl ContainerRuntime for CliRuntime {
    async fn ping(&self) -> RuntimeResult<()> {
        let binary = which::which(&self.binary).map_err(|e| {
            RuntimeError::Unavailable(format!("{} not found: {}", self.binary.display(), e))
        })?;
        tracing::debug!(runtime = %self.kind, binary = %binary.display(), "Container runtime located");

        let status = self
            .command()
            .arg("info")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RuntimeError::Unavailable(format!("failed to execute {}: {}", self.kind, e)))?;

        if !status.status.success() {
            let stderr = String::from_utf8_lossy(&status.stderr).trim().to_string();
            return Err(RuntimeError::Unavailable(stderr));
        }
        Ok(())
    }

    async fn ensure_image(&self, image: &str) -> RuntimeResult<()> {
        if self.output(&["image", "inspect", image]).await.is_ok() {
            tracing::debug!(image = %image, "Image present locally");
            return Ok(());
        }

        tracing::info!(image = %image, "Pulling image");
        self.output(&["pull", image])
            .await
            .map(|_| ())
            .map_err(|e| match e {
                RuntimeError::Command { stderr, .. } => RuntimeError::ImagePull {
                    image: image.to_string(),
                    reason: stderr,
                },
                other => other,
            })
    }

    async fn run(&self, request: &RunRequest) -> RuntimeResult<ContainerId> {
        let mut request = request.clone();
        if !request.detached {
            request.name = Some(foreground_name(&request));
        }
        let args = run_args(&request);

        let mut cmd = self.command();
        cmd.args(&args).stdin(Stdio::null());
        for (name, value) in &request.env {
            cmd.env(name, value.expose());
        }

        if !request.detached {
            // Foreground: the caller sees the service output and waits for it.
            let status = cmd.status().await?;
            let name = request.name.unwrap_or_default();
            tracing::info!(container = %name, status = ?status.code(), "Foreground container exited");
            if !status.success() {
                return Err(RuntimeError::Command {
                    command: format!("{} run", self.kind),
                    stderr: format!("container exited with {:?}", status.code()),
                });
            }
            return Ok(ContainerId(name));
        }

        let out = cmd.output().await?;
        if !out.status.success() {
            return Err(RuntimeError::Command {
                command: format!("{} run", self.kind),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        // Pull progress may precede the id on stdout; the id is the last line.
        let stdout = String::from_utf8_lossy(&out.stdout);
        stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .map(|id| ContainerId(id.to_string()))
            .ok_or_else(|| RuntimeError::Parse("run printed no container id".into()))
    }

    async fn state(&self, id: &ContainerId) -> RuntimeResult<ContainerState> {
        let raw = self.output(&state_args(id)).await?;
        serde_json::from_str(&raw).map_err(|e| RuntimeError::Parse(format!("inspect output: {}", e)))
    }

    async fn stop(&self, id: &ContainerId) -> RuntimeResult<()> {
        self.output(&stop_args(id)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkMode;
    use crate::launch::Secret;
    use crate::runtime::BindMount;

    fn request() -> RunRequest {
        RunRequest {
            image: "ghcr.io/example/llm-proxy:main-stable".into(),
            name: None,
            mounts: vec![BindMount {
                host: PathBuf::from("/srv/proxy/config.yaml"),
                container: "/app/config.yaml".into(),
                read_only: true,
            }],
            env: vec![
                ("MASTER_KEY".into(), Secret::new("sk-live-very-secret")),
                ("SALT_KEY".into(), Secret::new("salt-value-42")),
            ],
            network: NetworkMode::Host,
            detached: true,
            auto_remove: true,
            read_only: false,
            args: vec!["--config".into(), "/app/config.yaml".into()],
        }
    }

    #[test]
    fn test_run_args_layout() {
        let args = run_args(&request());
        assert_eq!(
            args,
            vec![
                "run", "-d", "--rm", "--network", "host",
                "-v", "/srv/proxy/config.yaml:/app/config.yaml:ro",
                "-e", "MASTER_KEY", "-e", "SALT_KEY",
                "ghcr.io/example/llm-proxy:main-stable", "--config", "/app/config.yaml",
            ]
        );
    }

    #[test]
    fn test_run_args_never_contain_secret_values() {
        let joined = run_args(&request()).join(" ");
        assert!(!joined.contains("sk-live-very-secret"));
        assert!(!joined.contains("salt-value-42"));
    }

    #[test]
    fn test_run_args_optional_flags() {
        let mut req = request();
        req.detached = false;
        req.auto_remove = false;
        req.read_only = true;
        req.name = Some("llm-proxy".into());
        req.network = NetworkMode::None;

        let args = run_args(&req);
        assert!(!args.contains(&"-d".to_string()));
        assert!(!args.contains(&"--rm".to_string()));
        assert!(args.contains(&"--read-only".to_string()));
        assert_eq!(&args[1..3], &["--name", "llm-proxy"]);
        let net = args.iter().position(|a| a == "--network").unwrap();
        assert_eq!(args[net + 1], "none");
    }

    #[test]
    fn test_foreground_name_generated() {
        let name = foreground_name(&request());
        assert!(name.starts_with("proxy-launcher-"));
        assert_eq!(name.len(), "proxy-launcher-".len() + 12);

        let mut named = request();
        named.name = Some("fixed".into());
        assert_eq!(foreground_name(&named), "fixed");
    }

    #[test]
    fn test_state_and_stop_use_full_id() {
        let id = ContainerId("proxy-launcher-0123456789ab".into());
        assert_eq!(state_args(&id)[3], "proxy-launcher-0123456789ab");
        assert_eq!(stop_args(&id), ["stop", "proxy-launcher-0123456789ab"]);
    }

    #[tokio::test]
    async fn test_binary_not_on_path_is_unavailable() {
        let runtime = CliRuntime::with_binary(RuntimeKind::Docker, "no-such-container-runtime-binary");
        assert!(matches!(runtime.ping().await, Err(RuntimeError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let runtime = CliRuntime::with_binary(RuntimeKind::Docker, "/nonexistent/bin/docker");
        assert!(matches!(runtime.ping().await, Err(RuntimeError::Unavailable(_))));
    }
}
