use std::time::{Duration, Instant};

use mb_domain::config::Config;
use mb_mcp_client::tools::check_with_options;
use mb_mcp_client::{render_result, ClientOptions, McpClient, ToolDescriptor};
use serde_json::Map;

use crate::timer::StepTimer;

/// Characters of the first tool's output shown in the report.
const PREVIEW_CHARS: usize = 200;

/// Run the connection check and, when it succeeds, a detailed pass with
/// `detail_timeout`: handshake, tool listing and a trial call of the first
/// tool with no arguments.
///
/// Returns `Ok(false)` when the server could not be reached.
pub async fn run(config: &Config, detail_timeout: Duration) -> anyhow::Result<bool> {
    let opts = ClientOptions::from(&config.mcp);
    let mut timer = StepTimer::start("MCP connection test");
    println!("Testing connection to: {}", config.mcp.url);

    let started = Instant::now();
    match check_with_options(opts.clone()).await {
        Ok(tools) => {
            timer.log_step("connection_check", started, true, format!("{} tool(s)", tools.len()));
            println!("[PASS] Connection successful");
        }
        Err(e) => {
            timer.log_step("connection_check", started, false, e.to_string());
            println!("[FAIL] Connection failed: {e}");
            print_troubleshooting();
            timer.finish();
            return Ok(false);
        }
    }

    println!("\nGetting server details...");
    let started = Instant::now();
    let mut client = McpClient::new(opts.timeout(detail_timeout)).await?;
    timer.log_step("create_client", started, true, format!("session {}", client.session_id()));

    let started = Instant::now();
    match client.initialize().await {
        Ok(_) => timer.log_step("initialize", started, true, ""),
        Err(e) => timer.log_step("initialize", started, false, e.to_string()),
    }

    let started = Instant::now();
    let tools = client.list_tools().await;
    timer.log_step("list_tools", started, true, format!("{} tool(s)", tools.len()));
    print_tools(&tools);

    if let Some(first) = tools.first() {
        println!("\nTesting first tool: {}", first.name);
        let started = Instant::now();
        match client.call_tool(&first.name, Some(Map::new())).await {
            Ok(result) => {
                timer.log_step("call_first_tool", started, true, first.name.clone());
                println!("[PASS] Tool execution successful");
                println!("Result: {}...", preview(&render_result(&result)));
            }
            Err(e) => {
                timer.log_step("call_first_tool", started, false, first.name.clone());
                println!("[FAIL] Tool execution failed: {e}");
            }
        }
    }

    timer.finish();
    Ok(true)
}

fn print_tools(tools: &[ToolDescriptor]) {
    println!("\nAvailable Tools ({}):", tools.len());
    for (i, tool) in tools.iter().enumerate() {
        println!("  {}. {}", i + 1, tool.name);
        println!(
            "     {}",
            tool.description.as_deref().unwrap_or("No description")
        );
    }
}

fn print_troubleshooting() {
    println!("\nTroubleshooting:");
    println!("1. Check that mcp.url (or --url) points at the MCP server");
    println!("2. Verify network connectivity to the server");
    println!("3. Check that the server is running and accessible");
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(PREVIEW_CHARS + 10);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
