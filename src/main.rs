//! proxy-launcher
//!
//! Launches a pre-built proxy service container:
//!
//! ```text
//!   profile (TOML) ─┐
//!   CLI flags ──────┼─▶ LaunchProfile ─▶ validate ─▶ LaunchSpec ─▶ Launcher ─▶ docker/podman run -d
//!   environment ────┘                     (secrets)
//! ```
//!
//! Exit codes: 0 started, 2 profile error, 3 config file missing,
//! 4 secret missing, 5 runtime unavailable, 6 image pull failed,
//! 7 start failed, 1 anything else.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use proxy_launcher::config::{read_profile, validate_profile, ConfigError, LaunchProfile, NetworkMode, RuntimeKind};
use proxy_launcher::launch::{launcher, LaunchError, LaunchSpec, Launcher};
use proxy_launcher::observability::logging::init_logging;
use proxy_launcher::runtime::{cli::run_args, CliRuntime};

#[derive(Parser)]
#[command(name = "proxy-launcher")]
#[command(about = "Launch the proxy service container with its config and secrets", long_about = None)]
struct Cli {
    /// Launch profile (TOML). CLI flags override its values.
    #[arg(short, long, global = true)]
    profile: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the container and return its id
    Launch(LaunchArgs),
    /// Validate the profile, config file and secrets without contacting the runtime
    Check(LaunchArgs),
    /// Show the state of a launched container
    Status {
        id: String,
        #[arg(long)]
        runtime: Option<RuntimeKind>,
    },
    /// Stop a launched container
    Stop {
        id: String,
        #[arg(long)]
        runtime: Option<RuntimeKind>,
    },
}

#[derive(Args)]
struct LaunchArgs {
    /// Host path of the service configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image reference
    #[arg(short, long)]
    image: Option<String>,

    /// Network mode: host, bridge or none
    #[arg(short, long)]
    network: Option<NetworkMode>,

    /// Mount point of the configuration file inside the container
    #[arg(long)]
    container_config: Option<String>,

    /// Container name
    #[arg(long)]
    name: Option<String>,

    /// Container runtime: docker or podman
    #[arg(long)]
    runtime: Option<RuntimeKind>,

    /// Run attached instead of detached
    #[arg(long)]
    foreground: bool,

    /// Keep the container's resources after it exits (no --rm)
    #[arg(long)]
    keep: bool,

    /// Read-only container root filesystem
    #[arg(long)]
    read_only: bool,

    /// Print the runtime command instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Arguments passed to the image entrypoint
    #[arg(last = true)]
    args: Vec<String>,
}

impl LaunchArgs {
    fn apply(&self, profile: &mut LaunchProfile) {
        if let Some(config) = &self.config {
            profile.mount.host_path = config.clone();
        }
        if let Some(image) = &self.image {
            profile.container.image = image.clone();
        }
        if let Some(network) = self.network {
            profile.container.network = network;
        }
        if let Some(path) = &self.container_config {
            profile.mount.container_path = path.clone();
        }
        if let Some(name) = &self.name {
            profile.container.name = Some(name.clone());
        }
        if let Some(runtime) = self.runtime {
            profile.runtime = runtime;
        }
        if self.foreground {
            profile.container.detached = false;
        }
        if self.keep {
            profile.container.auto_remove = false;
        }
        if self.read_only {
            profile.container.read_only = true;
        }
        if !self.args.is_empty() {
            profile.container.args = self.args.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code(e.as_ref()))
        }
    }
}

fn exit_code(err: &(dyn std::error::Error + 'static)) -> u8 {
    if let Some(e) = err.downcast_ref::<LaunchError>() {
        return e.exit_code() as u8;
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return 2;
    }
    1
}

fn load_profile(path: Option<&PathBuf>) -> Result<LaunchProfile, ConfigError> {
    match path {
        Some(path) => {
            tracing::debug!(profile = %path.display(), "Reading launch profile");
            read_profile(path)
        }
        None => Ok(LaunchProfile::default()),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = load_profile(cli.profile.as_ref())?;

    match cli.command {
        Commands::Launch(args) | Commands::Check(args) if args.dry_run => {
            args.apply(&mut profile);
            validate_profile(&profile).map_err(ConfigError::Validation)?;
            let request = launcher::prepare(LaunchSpec::from_env(&profile)?)?;

            let mut line = vec![profile.runtime.binary().to_string()];
            line.extend(run_args(&request));
            println!("{}", line.join(" "));
        }
        Commands::Launch(args) => {
            args.apply(&mut profile);
            validate_profile(&profile).map_err(ConfigError::Validation)?;
            tracing::info!(
                runtime = %profile.runtime,
                image = %profile.container.image,
                config = %profile.mount.host_path.display(),
                "Launch profile loaded"
            );

            let spec = LaunchSpec::from_env(&profile)?;
            let handle = Launcher::new(CliRuntime::new(profile.runtime)).launch(spec).await?;
            println!("{}", handle.id);
        }
        Commands::Check(args) => {
            args.apply(&mut profile);
            validate_profile(&profile).map_err(ConfigError::Validation)?;
            launcher::prepare(LaunchSpec::from_env(&profile)?)?;
            println!("ok");
        }
        Commands::Status { id, runtime } => {
            let launcher = Launcher::new(CliRuntime::locate(runtime.unwrap_or(profile.runtime))?);
            let state = launcher.status(&id).await?;
            println!("{}", serde_json::json!({ "running": state.running, "status": state.status }));
        }
        Commands::Stop { id, runtime } => {
            let launcher = Launcher::new(CliRuntime::locate(runtime.unwrap_or(profile.runtime))?);
            launcher.stop(&id).await?;
        }
    }

    Ok(())
}
