use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};

use super::SERVER_NAME;
use crate::gateway::MemoryGateway;

// ============================================================================
// Tool Parameter Types
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMemoryArgs {
    #[schemars(description = "The memory or information to store")]
    #[serde(default)]
    pub text: String,
    #[schemars(description = "Priority level: 'low', 'med' or 'high' (default: 'med')")]
    pub priority: Option<String>,
    #[schemars(description = "Optional list of tags to categorize the memory")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchMemoryArgs {
    #[schemars(description = "Natural language question or search term, e.g. 'where are my keys?'")]
    #[serde(default)]
    pub query: String,
}

/// Payload of the `server_info` tool.
#[derive(Debug, Serialize)]
pub struct ServerDescription {
    pub server_name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub backend_url: String,
    pub tenant_id: String,
    pub features: [&'static str; 2],
}

// ============================================================================
// MCP Server
// ============================================================================

#[derive(Clone)]
pub struct MemoryServer {
    gateway: MemoryGateway,
    backend_url: String,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for MemoryServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryServer")
            .field("gateway", &self.gateway)
            .field("backend_url", &self.backend_url)
            .finish_non_exhaustive()
    }
}

impl MemoryServer {
    pub fn new(gateway: MemoryGateway, backend_url: impl Into<String>) -> Self {
        Self {
            gateway,
            backend_url: backend_url.into(),
            tool_router: Self::tool_router(),
        }
    }

    pub fn describe(&self) -> ServerDescription {
        ServerDescription {
            server_name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            description: "Memory assistant: save and recall notes through a messaging app",
            backend_url: self.backend_url.clone(),
            tenant_id: self.gateway.tenant_id().to_string(),
            features: ["add_memory", "search_memory"],
        }
    }
}

#[tool_router]
impl MemoryServer {
    #[tool(
        description = "Add a memory or note. Use this when the user wants to remember something important like where items are, appointments, or any information they want to keep."
    )]
    pub async fn add_memory(
        &self,
        Parameters(args): Parameters<AddMemoryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self
            .gateway
            .add_memory(&args.text, args.priority.as_deref(), args.tags)
            .await;
        Ok(CallToolResult::success(vec![Content::text(reply)]))
    }

    #[tool(
        description = "Search saved memories. Use this when the user asks things like 'where are my keys?', 'when did I...?', or wants to recall anything they stored."
    )]
    pub async fn search_memory(
        &self,
        Parameters(args): Parameters<SearchMemoryArgs>,
    ) -> Result<CallToolResult, McpError> {
        let reply = self.gateway.search_memory(&args.query).await;
        Ok(CallToolResult::success(vec![Content::text(reply)]))
    }

    #[tool(description = "Get information about this memory server: version, backend and tenant.")]
    pub async fn server_info(&self) -> Result<CallToolResult, McpError> {
        let body = serde_json::to_string_pretty(&self.describe()).map_err(|e| {
            McpError::internal_error(format!("Failed to encode server info: {e}"), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(body)]))
    }
}

#[tool_handler]
impl ServerHandler for MemoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Memory assistant for saving and recalling personal notes.\n\n\
                 Tools available:\n\
                 - add_memory: Save something the user wants to remember\n\
                 - search_memory: Recall saved memories with a natural language question\n\
                 - server_info: Describe this server"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, MemoryBackend, MemoryRecord, SearchRequest, SearchResult,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedBackend;

    #[async_trait]
    impl MemoryBackend for FixedBackend {
        async fn store(&self, _record: &MemoryRecord) -> Result<String, BackendError> {
            Ok("n-7".to_string())
        }

        async fn search(&self, _req: &SearchRequest) -> Result<Vec<SearchResult>, BackendError> {
            Ok(Vec::new())
        }
    }

    fn server() -> MemoryServer {
        let backend: Arc<dyn MemoryBackend> = Arc::new(FixedBackend);
        MemoryServer::new(
            MemoryGateway::new(backend, "default_user"),
            "http://localhost:9000",
        )
    }

    fn reply_text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn advertises_tools_capability() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, SERVER_NAME);
    }

    #[test]
    fn registers_all_tools() {
        let names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        for expected in ["add_memory", "search_memory", "server_info"] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn add_memory_returns_plain_text() {
        let args = AddMemoryArgs {
            text: "Pills are in the blue box".into(),
            priority: Some("high".into()),
            tags: None,
        };
        let result = server().add_memory(Parameters(args)).await.unwrap();
        assert!(reply_text(&result).contains("n-7"));
    }

    #[tokio::test]
    async fn empty_search_is_a_reply_not_an_error() {
        let args = SearchMemoryArgs {
            query: "   ".into(),
        };
        let result = server().search_memory(Parameters(args)).await.unwrap();
        assert!(!reply_text(&result).is_empty());
    }

    #[tokio::test]
    async fn server_info_reports_configuration() {
        let result = server().server_info().await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&reply_text(&result)).unwrap();
        assert_eq!(body["server_name"], SERVER_NAME);
        assert_eq!(body["tenant_id"], "default_user");
        assert_eq!(body["backend_url"], "http://localhost:9000");
    }
}
