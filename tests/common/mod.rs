//! Shared utilities for launcher integration tests.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use proxy_launcher::config::NetworkMode;
use proxy_launcher::launch::{LaunchSpec, Secret};
use proxy_launcher::runtime::{
    ContainerId, ContainerRuntime, ContainerState, RunRequest, RuntimeError, RuntimeResult,
};

/// How the mock runtime should behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum MockBehavior {
    Succeed,
    DaemonUnreachable,
    PullFails,
    RunFails,
}

/// Calls recorded by the mock.
#[derive(Debug, Default)]
pub struct Calls {
    pub pings: usize,
    pub images: Vec<String>,
    pub runs: Vec<RunRequest>,
    pub inspected: Vec<String>,
    pub stopped: Vec<String>,
}

/// A container runtime that records every call and never spawns anything.
#[derive(Clone)]
pub struct MockRuntime {
    behavior: MockBehavior,
    calls: Arc<Mutex<Calls>>,
}

#[allow(dead_code)]
impl MockRuntime {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    pub fn pings(&self) -> usize {
        self.calls.lock().unwrap().pings
    }

    pub fn runs(&self) -> Vec<RunRequest> {
        self.calls.lock().unwrap().runs.clone()
    }

    pub fn inspected(&self) -> Vec<String> {
        self.calls.lock().unwrap().inspected.clone()
    }

    pub fn stopped(&self) -> Vec<String> {
        self.calls.lock().unwrap().stopped.clone()
    }

    pub fn images(&self) -> Vec<String> {
        self.calls.lock().unwrap().images.clone()
    }

    /// True when the runtime was never contacted.
    pub fn untouched(&self) -> bool {
        let calls = self.calls.lock().unwrap();
        calls.pings == 0 && calls.images.is_empty() && calls.runs.is_empty()
    }
}

impl ContainerRuntime for MockRuntime {
    async fn ping(&self) -> RuntimeResult<()> {
        self.calls.lock().unwrap().pings += 1;
        if self.behavior == MockBehavior::DaemonUnreachable {
            return Err(RuntimeError::Unavailable(
                "Cannot connect to the Docker daemon at unix:///var/run/docker.sock".into(),
            ));
        }
        Ok(())
    }

    async fn ensure_image(&self, image: &str) -> RuntimeResult<()> {
        self.calls.lock().unwrap().images.push(image.to_string());
        if self.behavior == MockBehavior::PullFails {
            return Err(RuntimeError::ImagePull {
                image: image.to_string(),
                reason: "manifest unknown".into(),
            });
        }
        Ok(())
    }

    async fn run(&self, request: &RunRequest) -> RuntimeResult<ContainerId> {
        let mut calls = self.calls.lock().unwrap();
        calls.runs.push(request.clone());
        if self.behavior == MockBehavior::RunFails {
            return Err(RuntimeError::Command {
                command: "docker run".into(),
                stderr: "port is already allocated".into(),
            });
        }
        Ok(ContainerId(format!("{:064x}", calls.runs.len())))
    }

    async fn state(&self, id: &ContainerId) -> RuntimeResult<ContainerState> {
        self.calls.lock().unwrap().inspected.push(id.0.clone());
        Ok(ContainerState {
            running: true,
            status: "running".into(),
        })
    }

    async fn stop(&self, id: &ContainerId) -> RuntimeResult<()> {
        self.calls.lock().unwrap().stopped.push(id.0.clone());
        Ok(())
    }
}

/// Write a throwaway service config and return its path.
pub fn temp_config() -> PathBuf {
    let path = std::env::temp_dir().join(format!("proxy-config-{}.yaml", uuid::Uuid::new_v4()));
    fs::write(&path, "model_list:\n  - model_name: gpt-4o\n").unwrap();
    path
}

/// A valid spec pointing at `config`.
pub fn spec(config: PathBuf) -> LaunchSpec {
    LaunchSpec {
        image: "ghcr.io/example/llm-proxy:main-stable".into(),
        config_host_path: config,
        config_container_path: "/app/config.yaml".into(),
        env_secrets: vec![
            ("MASTER_KEY".into(), Secret::new("sk-master-7f3a")),
            ("SALT_KEY".into(), Secret::new("salt-91bc")),
        ],
        network: NetworkMode::Host,
        detached: true,
        auto_remove: true,
        read_only: false,
        name: None,
        args: vec!["--config".into(), "/app/config.yaml".into()],
    }
}
