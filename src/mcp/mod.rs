use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::compare::compare_movies;
use crate::movie::MovieFetcher;
use crate::provider::MetadataProvider;

const PROTOCOL_VERSION: &str = "2024-11-05";

pub const TOOL_NAME: &str = "compare_movies";

const TOOL_DESCRIPTION: &str = "Fetches data for two movies and returns a standalone HTML/CSS comparison card \
(poster, year, Rotten Tomatoes score, box office). \
IMPORTANT: The output of this tool is valid HTML. You MUST display this output to the user \
by generating an HTML artifact containing the exact code returned by the tool.";

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

pub struct McpServer<P: MetadataProvider> {
    fetcher: MovieFetcher<P>,
}

impl<P: MetadataProvider> McpServer<P> {
    pub fn new(fetcher: MovieFetcher<P>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &MovieFetcher<P> {
        &self.fetcher
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        info!("mcp server listening on stdio");
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve newline-delimited JSON-RPC from `reader`, one response line per
    /// request (notifications get none).
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line) {
                writeln!(writer, "{}", response)?;
                writer.flush()?;
            }
        }

        info!("stdin closed, mcp server exiting");
        Ok(())
    }

    /// Handle one raw request line, returning the serialized response.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(&request)?,
            Err(e) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: Value::Null,
                result: None,
                error: Some(JsonRpcError {
                    code: -32700,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            },
        };

        // Plain structs of strings and JSON values always serialize.
        serde_json::to_string(&response).ok()
    }

    fn handle_request(&mut self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "mcp request");

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "notifications/initialized" => return None,
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tool_call(&request.params),
            "ping" => Ok(json!({})),
            _ => Err(JsonRpcError {
                code: -32601,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            },
            Err(error) => JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(error),
            },
        })
    }

    fn handle_initialize(&self, _params: &Option<Value>) -> Result<Value, JsonRpcError> {
        Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "movie-battle",
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        let tools = vec![Tool {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "movie_a": {
                        "type": "string",
                        "description": "Title of the first movie"
                    },
                    "movie_b": {
                        "type": "string",
                        "description": "Title of the second movie"
                    }
                },
                "required": ["movie_a", "movie_b"]
            }),
        }];

        Ok(json!({ "tools": tools }))
    }

    fn handle_tool_call(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.as_ref().ok_or_else(|| JsonRpcError {
            code: -32602,
            message: "Missing params".to_string(),
            data: None,
        })?;

        let tool_name =
            params
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| JsonRpcError {
                    code: -32602,
                    message: "Missing tool name".to_string(),
                    data: None,
                })?;

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = match tool_name {
            TOOL_NAME => self.tool_compare_movies(&arguments),
            _ => Err(format!("Unknown tool: {}", tool_name)),
        };

        match result {
            Ok(text) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            })),
            Err(e) => Ok(json!({
                "content": [{
                    "type": "text",
                    "text": e
                }],
                "isError": true
            })),
        }
    }

    /// Not-found and malformed outcomes are ordinary text, not tool errors.
    fn tool_compare_movies(&self, args: &Value) -> Result<String, String> {
        let movie_a = required_str(args, "movie_a")?;
        let movie_b = required_str(args, "movie_b")?;
        Ok(compare_movies(&self.fetcher, movie_a, movie_b))
    }
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| format!("Missing '{}' argument", name))
}
