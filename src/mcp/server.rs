//! MCP server implementation using pmcp.
//!
//! Exposes the citation tools over stdio JSON-RPC. Logging must stay on
//! stderr while this runs, stdout carries the protocol.

use async_trait::async_trait;
use pmcp::{Error, RequestHandlerExtra, Server, ServerCapabilities, ToolHandler, ToolInfo};
use serde_json::Value;
use std::sync::Arc;

use crate::mcp::tools::ToolRegistry;
use crate::service::CitationService;

/// The MCP server for papervista
pub struct McpServer {
    server: Server,
    tool_count: usize,
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("tool_count", &self.tool_count)
            .finish()
    }
}

impl McpServer {
    /// Create an MCP server whose tools share `service`
    pub fn new(service: CitationService) -> Result<Self, Error> {
        let tools = ToolRegistry::new(service);
        let tool_count = tools.len();

        let mut builder = Server::builder()
            .name("papervista")
            .version(env!("CARGO_PKG_VERSION"))
            .capabilities(ServerCapabilities::default());

        for tool in tools.all() {
            let wrapper = ToolWrapper {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: tool.input_schema.clone(),
                handler: tool.handler.clone(),
            };
            builder = builder.tool(wrapper.name.clone(), wrapper);
        }

        Ok(Self {
            server: builder.build()?,
            tool_count,
        })
    }

    pub fn tool_count(&self) -> usize {
        self.tool_count
    }

    /// Serve MCP over stdio until the client disconnects
    pub async fn run(self) -> Result<(), Error> {
        tracing::info!(tools = self.tool_count, "Starting MCP server in stdio mode");
        self.server.run_stdio().await
    }
}

/// Adapts a registry tool to pmcp's ToolHandler
#[derive(Clone)]
struct ToolWrapper {
    name: String,
    description: Option<String>,
    input_schema: Value,
    handler: Arc<dyn crate::mcp::tools::ToolHandler>,
}

#[async_trait]
impl ToolHandler for ToolWrapper {
    async fn handle(&self, args: Value, _extra: RequestHandlerExtra) -> Result<Value, Error> {
        tracing::debug!(tool = %self.name, "MCP tool call");
        self.handler
            .execute(args)
            .await
            .map_err(|e| Error::internal(&e))
    }

    fn metadata(&self) -> Option<ToolInfo> {
        Some(ToolInfo::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        ))
    }
}
