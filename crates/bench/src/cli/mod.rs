pub mod call;
pub mod check;
pub mod config;
pub mod tools;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mb_domain::config::Config;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "mcp-bench.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MCP_BENCH_CONFIG";

/// mcp-bench: exercise and time an MCP server over JSON-RPC/HTTP.
#[derive(Debug, Parser)]
#[command(name = "mcp-bench", version, about)]
pub struct Cli {
    /// Config file (defaults to $MCP_BENCH_CONFIG, then mcp-bench.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// MCP server URL, overriding `mcp.url`.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Per-exchange timeout in seconds, overriding `mcp.timeout_secs`.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Test the connection, list tools and try the first one.
    Check {
        /// Timeout in seconds for the detailed pass after the quick check.
        #[arg(long, default_value_t = 30)]
        detail_timeout: u64,
    },
    /// List the server's tools.
    Tools,
    /// Invoke one tool and print its rendered output.
    Call {
        /// Tool name.
        tool: String,
        /// Arguments as a JSON object.
        #[arg(long)]
        args: Option<String>,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any issues.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Pick the config path: explicit flag, then `MCP_BENCH_CONFIG`, then the
/// default file name.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load the configuration at `path`. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    Ok(Config::load(path)?)
}

/// Resolve and load the config for `cli`, then apply the flag overrides.
/// Returns the config and the path that was used.
pub fn load_config(cli: &Cli) -> anyhow::Result<(Config, PathBuf)> {
    let path = config_path(cli.config.as_deref());
    let mut config = load_config_from(&path)?;
    apply_overrides(&mut config, cli.url.as_deref(), cli.timeout);
    Ok((config, path))
}

pub fn apply_overrides(config: &mut Config, url: Option<&str>, timeout_secs: Option<u64>) {
    if let Some(url) = url {
        config.mcp.url = url.to_owned();
    }
    if let Some(secs) = timeout_secs {
        config.mcp.timeout_secs = secs;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
