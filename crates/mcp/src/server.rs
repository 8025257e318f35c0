// MCP server: JSON-RPC 2.0 over a line-delimited duplex channel

use crate::codec::{Frame, LineCodec, MAX_LINE_LENGTH};
use crate::error::{McpError, McpResult};
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability, DEFAULT_PROTOCOL_VERSION,
    JSONRPC_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info};

pub struct McpServer {
    name: String,
    version: String,
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry,
        }
    }

    /// Serve on stdin/stdout until EOF or Ctrl-C.
    pub async fn serve_stdio(self: Arc<Self>) -> Result<()> {
        let interrupt = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Interrupt received, shutting down"),
                Err(e) => {
                    error!("[MCP Error] unable to listen for interrupt: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        self.serve(tokio::io::stdin(), tokio::io::stdout(), interrupt)
            .await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Each request runs on its own task so a slow tool call does not hold up
    /// `tools/list` or `ping`. All responses pass through one writer task, so
    /// lines never interleave. Returns once the peer closes `reader` (after
    /// in-flight calls finish) or `shutdown` resolves (in-flight calls are
    /// abandoned). Either way the writer is flushed and closed first.
    pub async fn serve<R, W, S>(self: Arc<Self>, reader: R, writer: W, shutdown: S) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = ()>,
    {
        let mut lines = FramedRead::new(reader, LineCodec::new());
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            let mut sink = FramedWrite::new(writer, LineCodec::new());
            while let Some(response) = rx.recv().await {
                let line = serde_json::to_string(&response)?;
                sink.send(line).await?;
            }
            SinkExt::<String>::close(&mut sink).await?;
            Ok::<(), anyhow::Error>(())
        });

        let mut in_flight = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    in_flight.shutdown().await;
                    break;
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_task_outcome(joined);
                }
                line = lines.next() => match line {
                    Some(Ok(Frame::Line(line))) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let server = Arc::clone(&self);
                        let tx = tx.clone();
                        in_flight.spawn(async move {
                            if let Some(response) = server.handle_message(&line).await {
                                // The writer only goes away during shutdown.
                                let _ = tx.send(response);
                            }
                        });
                    }
                    Some(Ok(Frame::Oversized)) => {
                        let err = McpError::ParseError(format!(
                            "message exceeds {} bytes",
                            MAX_LINE_LENGTH
                        ));
                        error!("[MCP Error] {}", err);
                        let _ = tx.send(JsonRpcResponse::error(Value::Null, err.into()));
                    }
                    Some(Err(e)) => {
                        error!("[MCP Error] failed to read from transport: {}", e);
                        break;
                    }
                    None => {
                        debug!("Transport closed by peer");
                        while let Some(joined) = in_flight.join_next().await {
                            log_task_outcome(joined);
                        }
                        break;
                    }
                }
            }
        }

        drop(tx);
        writer_task.await??;
        info!("Transport closed");
        Ok(())
    }

    /// Handle one raw line. Returns `None` for notifications.
    pub async fn handle_message(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let err = if e.is_data() {
                    McpError::InvalidRequest(e.to_string())
                } else {
                    McpError::ParseError(e.to_string())
                };
                error!("[MCP Error] {}", err);
                return Some(JsonRpcResponse::error(Value::Null, err.into()));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let err = McpError::InvalidRequest(format!(
                "unsupported jsonrpc version {:?}",
                request.jsonrpc
            ));
            return request
                .id
                .map(|id| JsonRpcResponse::error(id, err.into()));
        }

        let id = match request.id {
            None => {
                debug!(method = %request.method, "Notification received");
                return None;
            }
            Some(Value::Null) => {
                let err = McpError::InvalidRequest("request id must not be null".to_string());
                return Some(JsonRpcResponse::error(Value::Null, err.into()));
            }
            Some(id) => id,
        };

        debug!(method = %request.method, "Request received");

        match self.dispatch(&request.method, request.params).await {
            Ok(result) => Some(JsonRpcResponse::success(id, result)),
            Err(e) => {
                match &e {
                    McpError::Serialization(_) | McpError::Internal(_) => {
                        error!(method = %request.method, error = %e, "Request failed");
                    }
                    _ => debug!(method = %request.method, error = %e, "Request rejected"),
                }
                Some(JsonRpcResponse::error(id, e.into()))
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> McpResult<Value> {
        match method {
            "initialize" => self.handle_initialize(params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.list_schemas(),
                };
                Ok(serde_json::to_value(result)?)
            }
            "tools/call" => self.handle_tools_call(params).await,
            other => Err(McpError::unknown_method(other)),
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let params: InitializeParams = match params {
            Some(params) => serde_json::from_value(params)
                .map_err(|e| McpError::InvalidParams(format!("Invalid initialize params: {}", e)))?,
            None => InitializeParams::default(),
        };

        if let Some(ref client) = params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        let result = InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: self.version.clone(),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let params: CallToolParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|e| McpError::InvalidParams(format!("Invalid tools/call params: {}", e)))?;

        debug!(tool = %params.name, "Calling tool");

        let result = self
            .registry
            .call(&params.name, params.arguments.unwrap_or(Value::Null))
            .await?;

        Ok(serde_json::to_value(result)?)
    }
}

fn log_task_outcome(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!("[MCP Error] request handler panicked: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CallToolResult, ToolSchema};
    use crate::tools::{json_schema_object, Tool};
    use serde_json::json;

    struct StaticTool;

    #[async_trait::async_trait]
    impl Tool for StaticTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "static".to_string(),
                description: "Always answers the same".to_string(),
                input_schema: json_schema_object(json!({}), vec![]),
            }
        }

        async fn execute(&self, _arguments: Value) -> McpResult<CallToolResult> {
            Ok(CallToolResult::text("same"))
        }
    }

    fn server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool));
        McpServer::new(registry)
    }

    async fn roundtrip(server: &McpServer, request: Value) -> Value {
        let response = server
            .handle_message(&request.to_string())
            .await
            .expect("expected a response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = roundtrip(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "test", "version": "1.0"}
                }
            }),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(response["result"]["serverInfo"]["name"], "pulse-mcp");
        assert_eq!(response["result"]["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let response = roundtrip(
            &server(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        )
        .await;
        assert_eq!(response["result"]["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_ping() {
        let response =
            roundtrip(&server(), json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "p", "result": {}}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response =
            roundtrip(&server(), json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "static");
        assert!(tools[0].get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_tools_call() {
        let response = roundtrip(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {"name": "static", "arguments": {}}
            }),
        )
        .await;
        assert_eq!(
            response["result"],
            json!({"content": [{"type": "text", "text": "same"}]})
        );
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = roundtrip(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "unknown_tool", "arguments": {"query": "x"}}
            }),
        )
        .await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["error"]["message"], "Unknown tool: unknown_tool");
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let response = roundtrip(
            &server(),
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"arguments": {}}}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = roundtrip(
            &server(),
            json!({"jsonrpc": "2.0", "id": 6, "method": "resources/list"}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_parse_error() {
        let response = server().handle_message("{not json").await.unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let response = server().handle_message(r#"{"jsonrpc":"2.0","id":1}"#).await.unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["error"]["code"], -32600);

        let response = server()
            .handle_message(r#"{"jsonrpc":"1.0","id":9,"method":"ping"}"#)
            .await
            .unwrap();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_null_id_is_invalid_request() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .expect("a null id is answered, not treated as a notification");
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32600);
        assert!(value.get("result").is_none());
    }
}
