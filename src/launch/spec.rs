//! The resolved launch parameters.

use std::path::PathBuf;

use crate::config::{LaunchProfile, NetworkMode};
use crate::launch::{LaunchError, Secret};

/// Everything needed to start the proxied service, resolved once per
/// invocation and consumed by a single launch.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Opaque image reference; validated by the runtime.
    pub image: String,

    /// Host path of the configuration file.
    pub config_host_path: PathBuf,

    /// Mount point of the configuration file inside the container.
    pub config_container_path: String,

    /// Secrets injected as environment variables, in declaration order.
    pub env_secrets: Vec<(String, Secret)>,

    pub network: NetworkMode,
    pub detached: bool,
    pub auto_remove: bool,
    pub read_only: bool,
    pub name: Option<String>,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// Resolve a spec from a validated profile, reading secret values
    /// through `lookup`.
    ///
    /// Unset or empty variables fail with `MissingSecret`; there are no
    /// default secret values.
    pub fn resolve<F>(profile: &LaunchProfile, lookup: F) -> Result<Self, LaunchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_secrets = Vec::with_capacity(profile.secrets.env.len());
        for name in &profile.secrets.env {
            let secret = lookup(name)
                .map(Secret::new)
                .filter(|s| !s.is_blank())
                .ok_or_else(|| LaunchError::MissingSecret { name: name.clone() })?;

            if secret.is_placeholder() {
                tracing::warn!(secret = %name, "Secret holds a well-known placeholder value");
            }
            env_secrets.push((name.clone(), secret));
        }

        Ok(Self {
            image: profile.container.image.clone(),
            config_host_path: profile.mount.host_path.clone(),
            config_container_path: profile.mount.container_path.clone(),
            env_secrets,
            network: profile.container.network,
            detached: profile.container.detached,
            auto_remove: profile.container.auto_remove,
            read_only: profile.container.read_only,
            name: profile.container.name.clone(),
            args: profile.container.args.clone(),
        })
    }

    /// Resolve secrets from the process environment.
    pub fn from_env(profile: &LaunchProfile) -> Result<Self, LaunchError> {
        Self::resolve(profile, |name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn profile() -> LaunchProfile {
        let mut profile = LaunchProfile::default();
        profile.container.image = "ghcr.io/example/llm-proxy:latest".into();
        profile.container.args = vec!["--port".into(), "4000".into()];
        profile
    }

    #[test]
    fn test_resolve_reads_secrets_in_order() {
        let env: HashMap<&str, &str> = [("MASTER_KEY", "sk-abc"), ("SALT_KEY", "salt")].into();
        let spec = LaunchSpec::resolve(&profile(), |k| env.get(k).map(|v| v.to_string())).unwrap();

        let names: Vec<_> = spec.env_secrets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["MASTER_KEY", "SALT_KEY"]);
        assert_eq!(spec.env_secrets[0].1.expose(), "sk-abc");
        assert_eq!(spec.config_container_path, "/app/config.yaml");
        assert_eq!(spec.network, NetworkMode::Host);
        assert_eq!(spec.args, vec!["--port", "4000"]);
    }

    #[test]
    fn test_resolve_fails_closed_on_unset_secret() {
        let err = LaunchSpec::resolve(&profile(), |k| (k == "MASTER_KEY").then(|| "sk-abc".to_string())).unwrap_err();
        match err {
            LaunchError::MissingSecret { name } => assert_eq!(name, "SALT_KEY"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolve_rejects_blank_secret() {
        let err = LaunchSpec::resolve(&profile(), |_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, LaunchError::MissingSecret { .. }));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let spec = LaunchSpec::resolve(&profile(), |_| Some("top-secret-value".to_string())).unwrap();
        assert!(!format!("{:?}", spec).contains("top-secret-value"));
    }
}
