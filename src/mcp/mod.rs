//! MCP server for forum access and community discovery

pub mod server;

pub use server::{run_mcp_server, AgoraService};
