//! MCP (Model Context Protocol) surface over the citation service.

pub mod server;
mod tools;

pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
