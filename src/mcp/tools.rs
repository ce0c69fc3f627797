//! Tool registry for MCP tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{SearchQuery, DEFAULT_MAX_RESULTS};
use crate::service::CitationService;
use crate::utils::CitationStyle;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "search_papers")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    /// Register the citation tools over a shared service
    pub fn new(service: CitationService) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
        };

        registry.register(Tool {
            name: "search_papers".to_string(),
            description: format!(
                "Search {} for papers. Each result carries a short id for cite_paper.",
                service.source_name()
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search query"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results",
                        "default": DEFAULT_MAX_RESULTS
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchPapersHandler {
                service: service.clone(),
            }),
        });

        registry.register(Tool {
            name: "cite_paper".to_string(),
            description: "Format a citation for a paper id returned by search_papers".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Short paper id, e.g. p1"
                    },
                    "style": {
                        "type": "string",
                        "description": "Citation style",
                        "enum": CitationStyle::ALL.iter().map(|s| s.name()).collect::<Vec<_>>(),
                        "default": "apa"
                    }
                },
                "required": ["id"]
            }),
            handler: Arc::new(CitePaperHandler {
                service: service.clone(),
            }),
        });

        registry.register(Tool {
            name: "get_paper".to_string(),
            description: "Return the stored metadata for a paper id".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Short paper id, e.g. p1"
                    }
                },
                "required": ["id"]
            }),
            handler: Arc::new(GetPaperHandler { service }),
        });

        registry
    }

    fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// All tools, ordered by name
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[derive(Debug)]
struct SearchPapersHandler {
    service: CitationService,
}

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
}

#[async_trait]
impl ToolHandler for SearchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: SearchArgs = parse_args(args)?;
        let mut query = SearchQuery::new(args.query);
        if let Some(max) = args.max_results {
            query = query.max_results(max);
        }

        let response = self.service.search(&query).await.map_err(|e| e.to_string())?;
        serde_json::to_value(response).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
struct CitePaperHandler {
    service: CitationService,
}

#[derive(Deserialize)]
struct CiteArgs {
    id: String,
    #[serde(default)]
    style: Option<String>,
}

#[async_trait]
impl ToolHandler for CitePaperHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: CiteArgs = parse_args(args)?;
        let style = args.style.as_deref().unwrap_or(CitationStyle::default().name());

        let response = self
            .service
            .cite(&args.id, style)
            .map_err(|e| e.to_string())?;
        serde_json::to_value(response).map_err(|e| e.to_string())
    }
}

#[derive(Debug)]
struct GetPaperHandler {
    service: CitationService,
}

#[derive(Deserialize)]
struct PaperArgs {
    id: String,
}

#[async_trait]
impl ToolHandler for GetPaperHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: PaperArgs = parse_args(args)?;
        let record = self.service.paper(&args.id).map_err(|e| e.to_string())?;
        serde_json::to_value(&*record).map_err(|e| e.to_string())
    }
}
