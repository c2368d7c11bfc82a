//! The launcher: local checks, then one create-and-start call.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::launch::{LaunchError, LaunchSpec};
use crate::runtime::{BindMount, ContainerId, ContainerRuntime, ContainerState, RunRequest, RuntimeResult};

/// Launch progress. `Running` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    NotStarted,
    Starting,
    Running,
    Failed,
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LaunchState::NotStarted => "not_started",
            LaunchState::Starting => "starting",
            LaunchState::Running => "running",
            LaunchState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Handle to a started container. The launcher does not track it further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pub id: ContainerId,
    pub name: Option<String>,
    pub detached: bool,
}

/// Starts containers through a `ContainerRuntime`.
pub struct Launcher<R> {
    runtime: R,
}

impl<R: ContainerRuntime> Launcher<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Launch the container described by `spec`.
    ///
    /// Reported as started only when the runtime's start call succeeds;
    /// no readiness probe follows.
    pub async fn launch(&self, spec: LaunchSpec) -> Result<ProcessHandle, LaunchError> {
        tracing::debug!(image = %spec.image, state = %LaunchState::NotStarted, "Launch requested");

        let result = self.try_launch(spec).await;
        match &result {
            Ok(handle) => tracing::info!(
                container = %handle.id.short(),
                state = %LaunchState::Running,
                "Container started"
            ),
            Err(e) => tracing::error!(error = %e, state = %LaunchState::Failed, "Launch failed"),
        }
        result
    }

    /// Inspect a previously launched container by id or name.
    pub async fn status(&self, id: &str) -> RuntimeResult<ContainerState> {
        let id = ContainerId(id.trim().to_string());
        let state = self.runtime.state(&id).await?;
        tracing::debug!(container = %id.short(), running = state.running, "Container inspected");
        Ok(state)
    }

    /// Stop a previously launched container by id or name.
    pub async fn stop(&self, id: &str) -> RuntimeResult<()> {
        let id = ContainerId(id.trim().to_string());
        self.runtime.stop(&id).await?;
        tracing::info!(container = %id.short(), "Container stopped");
        Ok(())
    }

    async fn try_launch(&self, spec: LaunchSpec) -> Result<ProcessHandle, LaunchError> {
        let request = prepare(spec)?;

        tracing::info!(
            image = %request.image,
            network = %request.network,
            detached = request.detached,
            secrets = request.env.len(),
            state = %LaunchState::Starting,
            "Starting container"
        );

        self.runtime.ping().await.map_err(LaunchError::from_start)?;
        self.runtime
            .ensure_image(&request.image)
            .await
            .map_err(|e| match LaunchError::from_start(e) {
                LaunchError::StartFailed(reason) => LaunchError::ImagePullFailed {
                    image: request.image.clone(),
                    reason,
                },
                other => other,
            })?;

        let id = self.runtime.run(&request).await.map_err(LaunchError::from_start)?;

        Ok(ProcessHandle {
            id,
            name: request.name,
            detached: request.detached,
        })
    }
}

/// Run every local check and build the runtime request.
///
/// Never touches the runtime.
pub fn prepare(spec: LaunchSpec) -> Result<RunRequest, LaunchError> {
    let host = check_config_file(&spec.config_host_path)?;

    if spec.env_secrets.is_empty() {
        return Err(LaunchError::MissingSecret {
            name: "<none configured>".into(),
        });
    }
    if let Some((name, _)) = spec.env_secrets.iter().find(|(_, v)| v.is_blank()) {
        return Err(LaunchError::MissingSecret { name: name.clone() });
    }

    Ok(RunRequest {
        image: spec.image,
        name: spec.name,
        mounts: vec![BindMount {
            host,
            container: spec.config_container_path,
            read_only: true,
        }],
        env: spec.env_secrets,
        network: spec.network,
        detached: spec.detached,
        auto_remove: spec.auto_remove,
        read_only: spec.read_only,
        args: spec.args,
    })
}

/// Ensure `path` is an existing regular file and return its absolute form.
fn check_config_file(path: &Path) -> Result<PathBuf, LaunchError> {
    let not_found = |reason: String| LaunchError::ConfigNotFound {
        path: path.to_path_buf(),
        reason,
    };

    let meta = fs::metadata(path).map_err(|e| not_found(e.to_string()))?;
    if !meta.is_file() {
        return Err(not_found("not a regular file".into()));
    }

    fs::canonicalize(path).map_err(|e| not_found(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkMode;
    use crate::launch::Secret;

    fn spec_for(path: PathBuf) -> LaunchSpec {
        LaunchSpec {
            image: "ghcr.io/example/llm-proxy:latest".into(),
            config_host_path: path,
            config_container_path: "/app/config.yaml".into(),
            env_secrets: vec![
                ("MASTER_KEY".into(), Secret::new("sk-abc")),
                ("SALT_KEY".into(), Secret::new("salt")),
            ],
            network: NetworkMode::Host,
            detached: true,
            auto_remove: true,
            read_only: false,
            name: None,
            args: Vec::new(),
        }
    }

    #[test]
    fn test_prepare_rejects_directory() {
        let err = prepare(spec_for(std::env::temp_dir())).unwrap_err();
        assert!(matches!(err, LaunchError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_prepare_makes_mount_absolute_and_read_only() {
        let path = std::env::temp_dir().join(format!("proxy-config-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, "model_list: []\n").unwrap();

        let request = prepare(spec_for(path.clone())).unwrap();
        assert_eq!(request.mounts.len(), 1);
        assert!(request.mounts[0].host.is_absolute());
        assert!(request.mounts[0].read_only);
        assert_eq!(request.mounts[0].container, "/app/config.yaml");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_prepare_requires_at_least_one_secret() {
        let path = std::env::temp_dir().join(format!("proxy-config-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, "").unwrap();

        let mut spec = spec_for(path.clone());
        spec.env_secrets.clear();
        assert!(matches!(prepare(spec), Err(LaunchError::MissingSecret { .. })));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LaunchState::Running.to_string(), "running");
        assert_eq!(LaunchState::NotStarted.to_string(), "not_started");
    }
}
