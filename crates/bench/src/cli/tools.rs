use std::time::Instant;

use mb_domain::config::Config;
use mb_mcp_client::{ClientOptions, McpClient, ToolDescriptor};

use crate::timer::StepTimer;

/// Widest description shown before truncating with an ellipsis.
const MAX_DESCRIPTION_CHARS: usize = 72;

/// List the server's tools as a table. Discovery errors are reported,
/// not swallowed.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let mut timer = StepTimer::start("MCP tools");

    let started = Instant::now();
    let mut client = McpClient::new(ClientOptions::from(&config.mcp)).await?;
    timer.log_step("create_client", started, true, format!("session {}", client.session_id()));

    let started = Instant::now();
    let listed = client.try_list_tools().await;
    match &listed {
        Ok(tools) => timer.log_step("list_tools", started, true, format!("{} tool(s)", tools.len())),
        Err(e) => timer.log_step("list_tools", started, false, e.to_string()),
    }
    timer.finish();

    let tools = listed?;
    print!("{}", render_table(&tools));
    Ok(())
}

fn render_table(tools: &[ToolDescriptor]) -> String {
    if tools.is_empty() {
        return "No tools found.\n".into();
    }

    let width = tools
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!("{:<width$}  DESCRIPTION\n", "NAME");
    for tool in tools {
        let description = tool.description.as_deref().unwrap_or("").trim();
        out.push_str(&format!("{:<width$}  {}\n", tool.name, truncate(description)));
    }
    out
}

fn truncate(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() <= MAX_DESCRIPTION_CHARS {
        return first_line.to_owned();
    }
    let cut: String = first_line.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, description: Option<&str>) -> ToolDescriptor {
        ToolDescriptor {
            description: description.map(str::to_owned),
            ..ToolDescriptor::named(name)
        }
    }

    #[test]
    fn table_aligns_names() {
        let table = render_table(&[
            tool("pods_list", Some("List pods")),
            tool("ns", None),
        ]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "NAME       DESCRIPTION");
        assert_eq!(lines[1], "pods_list  List pods");
        assert_eq!(lines[2], "ns         ");
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(render_table(&[]), "No tools found.\n");
    }

    #[test]
    fn long_descriptions_are_cut_to_one_line() {
        let long = "x".repeat(MAX_DESCRIPTION_CHARS + 5);
        let cut = truncate(&format!("{long}\nsecond line"));
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("one\ntwo"), "one");
    }
}
