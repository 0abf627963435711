use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use mb_domain::config::Config;
use mb_mcp_client::{ClientOptions, McpClient, ToolAdapter, ToolDescriptor};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::timer::StepTimer;

/// Invoke `tool` through a [`ToolAdapter`] and print what it renders.
///
/// Tools missing from `tools/list` are still called by name; the server
/// decides whether they exist.
pub async fn run(config: &Config, tool: &str, args: Option<&str>) -> anyhow::Result<()> {
    let arguments = parse_args(args)?;
    let mut timer = StepTimer::start(format!("MCP call {tool}"));

    let started = Instant::now();
    let mut client = McpClient::new(ClientOptions::from(&config.mcp)).await?;
    timer.log_step("create_client", started, true, format!("session {}", client.session_id()));

    let started = Instant::now();
    let tools = client.list_tools().await;
    let descriptor = match tools.into_iter().find(|t| t.name == tool) {
        Some(d) => {
            timer.log_step("discover", started, true, "listed");
            d
        }
        None => {
            timer.log_step("discover", started, false, "not listed, calling by name");
            ToolDescriptor::named(tool)
        }
    };

    let adapter = ToolAdapter::new(Arc::new(Mutex::new(client)), descriptor);
    let started = Instant::now();
    let output = adapter.invoke(arguments).await;
    let ok = !output.starts_with(&format!("Error executing {tool}:"));
    timer.log_step("invoke", started, ok, format!("{} chars", output.chars().count()));
    timer.finish();

    println!("{output}");
    Ok(())
}

fn parse_args(raw: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--args must be a JSON object, got {other}"),
    }
}
