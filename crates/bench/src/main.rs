use std::time::Duration;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mb_bench::cli::{self, Cli, Command, ConfigCommand};
use mb_domain::config::{LogFormat, ObservabilityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = cli::load_config(&cli)?;
    init_tracing(&config.observability);

    tracing::debug!(config_path = %config_path.display(), url = %config.mcp.url, "config loaded");

    match cli.command {
        Command::Check { detail_timeout } => {
            let passed = cli::check::run(&config, Duration::from_secs(detail_timeout)).await?;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Tools => cli::tools::run(&config).await,
        Command::Call { tool, args } => cli::call::run(&config, &tool, args.as_deref()).await,
        Command::Config(ConfigCommand::Validate) => {
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Config(ConfigCommand::Show) => cli::config::show(&config),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `log_filter`.
fn init_tracing(obs: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&obs.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match obs.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
