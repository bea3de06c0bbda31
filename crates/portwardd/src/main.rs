//! portwardd — keeps exactly one instance of the service on its port.
//!
//! # Usage
//!
//! ```text
//! portwardd supervise --config /etc/portward.toml
//! portwardd probe --host localhost --port 5555
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use portward_core::SupervisorConfig;
use portward_probe::NetProber;
use portward_service::{AirflowRuns, ServeLauncher, ServiceState};
use portward_supervisor::{Decision, Supervisor, decide};

#[derive(Parser)]
#[command(name = "portwardd", about = "Singleton service supervisor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start or adopt the service, then fail when it is lost.
    Supervise(Target),

    /// Probe the endpoint once and print what `supervise` would do.
    Probe(Target),
}

#[derive(Args)]
struct Target {
    /// TOML config file, layered under the environment.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the supervised host.
    #[arg(long)]
    host: Option<String>,

    /// Override the supervised port.
    #[arg(long)]
    port: Option<u16>,
}

impl Target {
    fn resolve(&self) -> anyhow::Result<SupervisorConfig> {
        let mut config = SupervisorConfig::load(self.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(host) = &self.host {
            config.service.host = host.clone();
        }
        if let Some(port) = self.port {
            config.service.port = port;
        }
        config.validate().context("invalid command-line override")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(
                    "info,portwardd=debug,portward=debug",
                )),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Supervise(target) => run_supervise(target.resolve()?).await,
        Command::Probe(target) => run_probe(target.resolve()?).await,
    }
}

async fn run_supervise(config: SupervisorConfig) -> anyhow::Result<()> {
    let endpoint = config.endpoint();
    let runs = AirflowRuns::new(&config.orchestrator);
    info!(%endpoint, api = runs.url(), "portward daemon starting");

    let launcher = ServeLauncher::new(config.service.bind_host.clone(), ServiceState::new(runs));
    let supervisor = Supervisor::new(
        endpoint,
        NetProber::from_config(&config.probe),
        launcher,
        config.probe.monitor_interval(),
    );

    tokio::select! {
        err = supervisor.run() => Err(anyhow::Error::new(err)),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            warn!("shutdown signal received");
            Ok(())
        }
    }
}

async fn run_probe(config: SupervisorConfig) -> anyhow::Result<()> {
    let endpoint = config.endpoint();
    let prober = NetProber::from_config(&config.probe);

    let verdict = match decide(&prober, &endpoint).await {
        Decision::Start => "start: port is free".to_string(),
        Decision::Adopt => "adopt: a healthy instance already serves it".to_string(),
        Decision::Conflict(observed) => {
            format!("conflict: occupied by another process (health probe: {observed})")
        }
    };
    println!("{endpoint}: {verdict}");
    Ok(())
}
