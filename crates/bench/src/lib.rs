//! `mcp-bench`: command-line front end for the MCP session client.

pub mod cli;
pub mod timer;
