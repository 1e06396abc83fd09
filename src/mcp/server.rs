//! MCP stdio server: read loop, per-request tasks, single writer.

use super::codec::{read_frame, write_frame, Frame};
use crate::tools::{ToolCall, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "serpstat-mcp";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// Outbound queue depth between request tasks and the writer.
const OUTBOUND_CAPACITY: usize = 64;

fn success(id: Value, result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "result": result})
}

fn failure(id: Value, code: i64, message: impl Into<String>) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "error": {"code": code, "message": message.into()}})
}

/// Serves the tool registry over JSON-RPC 2.0.
#[derive(Debug, Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one decoded message. Notifications produce no reply.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let id = message.get("id").cloned();
        let method = match message.get("method").and_then(Value::as_str) {
            Some(method) => method,
            None => {
                return Some(failure(
                    id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    "Invalid request: missing method",
                ))
            }
        };

        let Some(id) = id else {
            tracing::debug!(method, "notification received");
            return None;
        };

        tracing::debug!(method, id = %id, "request received");
        let params = message.get("params").cloned().unwrap_or(Value::Null);

        let reply = match method {
            "initialize" => success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {"listChanged": false}},
                    "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
                }),
            ),
            "ping" => success(id, json!({})),
            "tools/list" => match serde_json::to_value(self.registry.descriptors()) {
                Ok(tools) => success(id, json!({ "tools": tools })),
                Err(e) => failure(id, INTERNAL_ERROR, e.to_string()),
            },
            "tools/call" => match serde_json::from_value::<ToolCall>(params) {
                Ok(call) => {
                    let response = self.registry.dispatch(&call).await;
                    match serde_json::to_value(response) {
                        Ok(result) => success(id, result),
                        Err(e) => failure(id, INTERNAL_ERROR, e.to_string()),
                    }
                }
                Err(e) => failure(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
            },
            other => failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        };
        Some(reply)
    }

    /// Serve until `reader` reaches EOF. In-flight requests finish and
    /// their replies are written before this returns.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Value>(OUTBOUND_CAPACITY);

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(message) = rx.recv().await {
                write_frame(&mut writer, &message).await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut reader = BufReader::new(reader);
        tracing::info!(tools = self.registry.len(), "MCP server ready on stdio");

        while let Some(frame) = read_frame(&mut reader).await? {
            match frame {
                Frame::Message(message) => {
                    let server = self.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(reply) = server.handle_message(message).await {
                            if tx.send(reply).await.is_err() {
                                tracing::warn!("writer closed, dropping reply");
                            }
                        }
                    });
                }
                Frame::Malformed(reason) => {
                    tracing::warn!(%reason, "malformed message");
                    let message = format!("Parse error: {}", reason);
                    let reply = failure(Value::Null, PARSE_ERROR, message);
                    if tx.send(reply).await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(tx);
        tracing::info!("stdin closed, draining replies");
        writer_task.await.map_err(std::io::Error::other)?
    }

    pub async fn serve_stdio(self) -> std::io::Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{RequestEnvelope, ResponseEnvelope, RetryPolicy, SerpstatClient, Transport};
    use crate::tools::definitions;
    use crate::tools::ToolCategory;
    use crate::types::Result;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

    struct FixedTransport;

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope> {
            Ok(ResponseEnvelope::success(&envelope.id, json!({"credits": 100})))
        }
    }

    fn server() -> McpServer {
        let client = SerpstatClient::new(
            Arc::new(FixedTransport),
            RetryPolicy {
                max_retries: 0,
                delay: Duration::ZERO,
            },
        );
        let registry = ToolRegistry::from_definitions(
            definitions(&[ToolCategory::Account, ToolCategory::Backlinks]).unwrap(),
            Arc::new(client),
        )
        .unwrap();
        McpServer::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_initialize() {
        let reply = server()
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {}
            }))
            .await
            .unwrap();
        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(reply["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_notification_has_no_reply() {
        let reply = server()
            .handle_message(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_publishes_input_schemas() {
        let reply = server()
            .handle_message(json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}))
            .await
            .unwrap();
        let tools = reply["result"]["tools"].as_array().unwrap();
        let summary = tools
            .iter()
            .find(|t| t["name"] == "get_backlinks_summary")
            .unwrap();
        assert_eq!(summary["inputSchema"]["required"], json!(["query"]));
    }

    #[tokio::test]
    async fn test_tools_call_success_and_failure_shapes() {
        let s = server();
        let ok = s
            .handle_message(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": {"name": "get_credits_stats", "arguments": {}}}))
            .await
            .unwrap();
        assert!(ok["result"].get("isError").is_none());
        let text = ok["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"credits": 100}));

        let bad = s
            .handle_message(json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": {"name": "get_backlinks_summary", "arguments": {"query": "bad_domain"}}}))
            .await
            .unwrap();
        assert_eq!(bad["result"]["isError"], true);
        assert!(bad["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Invalid parameters: query:"));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let s = server();
        let unknown = s
            .handle_message(json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"}))
            .await
            .unwrap();
        assert_eq!(unknown["error"]["code"], METHOD_NOT_FOUND);

        let bad_params = s
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {"arguments": {}}
            }))
            .await
            .unwrap();
        assert_eq!(bad_params["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_serve_answers_every_request_before_exit() {
        let (mut client_end, server_end) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_end);
        let handle = tokio::spawn(server().serve(server_read, server_write));

        let ping = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
        let call = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "get_credits_stats"}
        });
        let input = format!("{}\nnot json\n{}\n", ping, call);
        client_end.write_all(input.as_bytes()).await.unwrap();
        client_end.shutdown().await.unwrap();

        let mut lines = tokio::io::BufReader::new(client_end).lines();
        let mut replies = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            replies.push(serde_json::from_str::<Value>(&line).unwrap());
        }
        handle.await.unwrap().unwrap();

        assert_eq!(replies.len(), 3);
        assert!(replies.iter().any(|r| r["error"]["code"] == PARSE_ERROR));
        assert!(replies.iter().any(|r| r["id"] == 1 && r["result"] == json!({})));
        assert!(replies.iter().any(|r| r["id"] == 2 && r["result"]["content"].is_array()));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_server() {
        let (mut client_end, server_end) = tokio::io::duplex(64 * 1024);
        let (server_read, server_write) = tokio::io::split(server_end);
        let handle = tokio::spawn(server().serve(server_read, server_write));

        client_end.write_all(b"\xff\xfe{\"id\":9}\n").await.unwrap();
        client_end
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n")
            .await
            .unwrap();
        client_end.shutdown().await.unwrap();

        let mut lines = tokio::io::BufReader::new(client_end).lines();
        let mut replies = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            replies.push(serde_json::from_str::<Value>(&line).unwrap());
        }
        handle.await.unwrap().unwrap();

        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(replies[0]["id"], Value::Null);
        assert_eq!(replies[1]["id"], 3);
        assert_eq!(replies[1]["result"], json!({}));
    }
}
