use crate::tools::{SearchTool, TOOL_NAME};
use crate::{Config, Result, UnsplashClient};
use rmcp::{
    model::*,
    service::{RequestContext, RoleServer},
    ErrorData, ServerHandler,
};
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tracing::{debug, info, instrument};

/// Name reported to MCP hosts during initialization
pub const SERVER_NAME: &str = "unsplash-mcp-server";

const INSTRUCTIONS: &str =
    "An MCP server for Unsplash. Use the search_photos tool to find photos by keyword.";

/// Main MCP server handler implementing rmcp
#[derive(Debug, Clone)]
pub struct UnsplashServerHandler {
    config: Arc<Config>,
    search_tool: SearchTool,
}

impl UnsplashServerHandler {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Initializing Unsplash MCP server handler");

        let client = Arc::new(UnsplashClient::new(&config)?);
        let search_tool = SearchTool::new(client, Arc::clone(&config));

        Ok(Self {
            config,
            search_tool,
        })
    }

    /// Tool catalog advertised by `tools/list`
    pub fn tools(&self) -> Result<Vec<Tool>> {
        Ok(vec![Tool::new(
            TOOL_NAME,
            self.search_tool.description(),
            SearchTool::input_schema()?,
        )])
    }

    /// Route a tool invocation by name
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        match name {
            TOOL_NAME => {
                let arguments = Value::Object(arguments.unwrap_or_default());
                Ok(self.search_tool.call(arguments).await.into_call_result())
            }
            other => Err(ErrorData::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ServerHandler for UnsplashServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.into()),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_ {
        debug!("Listing available tools");

        async move {
            let tools = self
                .tools()
                .map_err(|e| ErrorData::internal_error(format!("Tool schema error: {e}"), None))?;

            Ok(ListToolsResult {
                tools,
                next_cursor: None,
            })
        }
    }

    #[instrument(skip(self, request, _context))]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_ {
        info!("Tool called: {}", request.name);

        async move { self.dispatch(&request.name, request.arguments).await }
    }
}
