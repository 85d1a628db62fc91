use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rmcp::{Error as McpError, model::*, service::*, transport::io};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::tools;

fn create_schema_object(
    properties: Vec<(&str, Value)>,
    required: Vec<&str>,
) -> Arc<Map<String, Value>> {
    let props_map: Map<String, Value> = properties
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let req_vec: Vec<Value> = required
        .into_iter()
        .map(|s| Value::String(s.to_string()))
        .collect();

    let schema = json!({
        "type": "object",
        "properties": props_map,
        "required": req_vec
    });
    let map = match schema {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Arc::new(map)
}

fn text_result(text: String) -> CallToolResult {
    let raw = RawContent::Text(RawTextContent { text });

    CallToolResult {
        content: vec![Annotated {
            raw,
            annotations: None,
        }],
        // Failures are already rendered into the text by the tool layer.
        is_error: Some(false),
    }
}

/// MCP server exposing the two CI query tools over stdio.
#[derive(Debug, Clone)]
pub struct CiServer {
    peer: Arc<Mutex<Option<Peer<RoleServer>>>>,
    tools: Arc<HashMap<String, Tool>>,
}

impl CiServer {
    pub fn new() -> Self {
        let mut tools = HashMap::new();

        let commit_jobs_schema = create_schema_object(vec![], vec![]);
        tools.insert(
            "get_current_commit_jobs".to_string(),
            Tool {
                name: "get_current_commit_jobs".into(),
                description:
                    "Lists the GitLab CI jobs for the current commit of the working tree.".into(),
                input_schema: commit_jobs_schema,
            },
        );

        let job_log_schema = create_schema_object(
            vec![(
                "job_id",
                json!({ "type": "integer", "description": "Id of the job whose console log to fetch." }),
            )],
            vec!["job_id"],
        );
        tools.insert(
            "get_job_log".to_string(),
            Tool {
                name: "get_job_log".into(),
                description: "Fetches the console log of a GitLab CI job by id.".into(),
                input_schema: job_log_schema,
            },
        );

        Self {
            peer: Arc::new(Mutex::new(None)),
            tools: Arc::new(tools),
        }
    }

    async fn handle_commit_jobs(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(tools::get_current_commit_jobs().await))
    }

    async fn handle_job_log(
        &self,
        args_map: Map<String, Value>,
    ) -> Result<CallToolResult, McpError> {
        let job_id = args_map
            .get("job_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                McpError::invalid_params("Missing or non-integer argument: job_id", None)
            })?;

        Ok(text_result(tools::get_job_log(job_id).await))
    }

    fn handle_tool_call(
        &self,
        params: CallToolRequestParam,
    ) -> Pin<Box<dyn Future<Output = Result<CallToolResult, McpError>> + Send + '_>> {
        let args_map = params.arguments.unwrap_or_default();
        match params.name.as_ref() {
            "get_current_commit_jobs" => Box::pin(self.handle_commit_jobs()),
            "get_job_log" => Box::pin(self.handle_job_log(args_map)),
            _ => Box::pin(async { Err(McpError::method_not_found::<CallToolRequestMethod>()) }),
        }
    }
}

impl Default for CiServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<RoleServer> for CiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(true),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "gitlab-ci-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: None,
        }
    }

    fn get_peer(&self) -> Option<Peer<RoleServer>> {
        self.peer.lock().unwrap().clone()
    }

    fn set_peer(&mut self, peer: Peer<RoleServer>) {
        *self.peer.lock().unwrap() = Some(peer);
    }

    #[allow(refining_impl_trait)]
    fn handle_request(
        &self,
        request: ClientRequest,
        _context: RequestContext<RoleServer>,
    ) -> Pin<Box<dyn Future<Output = Result<ServerResult, McpError>> + Send + '_>> {
        let server = self.clone();
        Box::pin(async move {
            match request {
                ClientRequest::ListToolsRequest(Request { .. }) => {
                    Ok(ServerResult::ListToolsResult(ListToolsResult {
                        tools: server.tools.values().cloned().collect(),
                        next_cursor: None,
                    }))
                }
                ClientRequest::CallToolRequest(Request { params, .. }) => server
                    .handle_tool_call(params)
                    .await
                    .map(ServerResult::CallToolResult),
                _ => Err(McpError::method_not_found::<InitializeResultMethod>()),
            }
        })
    }

    #[allow(refining_impl_trait)]
    fn handle_notification(
        &self,
        _notification: ClientNotification,
    ) -> Pin<Box<dyn Future<Output = Result<(), McpError>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}

/// Runs the MCP server over stdio, blocking until cancellation.
pub async fn serve() -> Result<()> {
    let server = CiServer::new();
    let transport = io::stdio();
    let ct = CancellationToken::new();

    eprintln!("Starting gitlab-ci-mcp server...");

    if let Err(e) = server.serve_with_ct(transport, ct.clone()).await {
        eprintln!("Server loop failed: {e}");
    }

    // Keep the process alive until cancellation is requested; the client may
    // disconnect and reconnect after initialization.
    ct.cancelled().await;

    eprintln!("gitlab-ci-mcp server stopped.");

    Ok(())
}
