//! JSON-RPC 2.0 protocol types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version reported by `initialize`
pub const PROTOCOL_VERSION: &str = "1.0";

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "querify";

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Builds an error response.
    pub fn failure(id: Option<Value>, code: i32, message: String) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
        }
    }
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// JSON-RPC 2.0 Error codes
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;

/// Initialize Result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
    /// Whether a remote query-generation backend is configured
    pub remote_backend: bool,
}

/// Server Information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_parses_without_params() {
        let json = "{\"jsonrpc\": \"2.0\", \"id\": 1, \"method\": \"state/get\"}";
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.method, "state/get");
        assert_eq!(request.id, Some(json!(1)));
        assert!(request.params.is_null());
    }

    #[test]
    fn test_request_parses_with_params() {
        let json = "{\"jsonrpc\": \"2.0\", \"id\": \"a1\", \"method\": \"query/generate\", \
                    \"params\": {\"question\": \"How many rows are there?\"}}";
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.method, "query/generate");
        assert_eq!(request.params["question"], "How many rows are there?");
    }

    #[test]
    fn test_success_response_omits_error() {
        let response = JsonRpcResponse::success(Some(json!(7)), json!({"ok": true}));
        let serialized = serde_json::to_string(&response).unwrap();

        assert!(serialized.contains("\"result\""));
        assert!(!serialized.contains("\"error\""));
    }

    #[test]
    fn test_failure_response_omits_result() {
        let response =
            JsonRpcResponse::failure(Some(json!(7)), METHOD_NOT_FOUND, "Method not found".into());
        let serialized = serde_json::to_string(&response).unwrap();

        assert!(serialized.contains("\"error\""));
        assert!(serialized.contains("-32601"));
        assert!(!serialized.contains("\"result\""));
    }

    #[test]
    fn test_initialize_result_shape() {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: "0.1.0".to_string(),
            },
            remote_backend: false,
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["protocolVersion"], "1.0");
        assert_eq!(value["serverInfo"]["name"], "querify");
        assert_eq!(value["remoteBackend"], false);
    }
}
