//! `mb-domain`: types shared by every mcp-bench crate. The workspace-wide
//! error type, the TOML configuration model and structured trace events.

pub mod config;
pub mod error;
pub mod trace;
