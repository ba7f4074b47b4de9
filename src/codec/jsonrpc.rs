//! JSON-RPC 2.0 envelope and codec for the A2A protocol
//!
//! The envelope types are shared by the client codec and the server dispatcher. Request
//! identifiers are normalized to strings on decode: numbers become their base-10 form and
//! a `null` or absent id becomes the empty string.

use std::sync::Arc;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::{
    codec::Codec,
    id::{IdGenerator, UuidGenerator},
    protocol::{
        agent::AgentCard,
        error::{A2AError, A2AResult, ErrorCode},
        operation::A2AOperation,
        task::{SendMessageResult, Task, TaskPushNotificationConfig},
    },
    service::response::A2AResponse,
};

/// JSON-RPC protocol version
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default)]
    pub method: String,

    /// Omitted on the wire when absent, `null` or an empty object
    #[serde(default, skip_serializing_if = "params_are_empty")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Parse a request from its JSON text
    pub fn from_json(json: &str) -> A2AResult<Self> {
        serde_json::from_str(json).map_err(|e| A2AError::Parse(e.to_string()))
    }

    /// Parse a request from raw body bytes
    pub fn from_slice(body: &[u8]) -> A2AResult<Self> {
        serde_json::from_slice(body).map_err(|e| A2AError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> A2AResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the params into a typed parameter struct
    pub fn params_as<T: DeserializeOwned>(&self) -> A2AResult<T> {
        let params = self
            .params
            .clone()
            .ok_or_else(|| A2AError::InvalidParams(format!("{} requires params", self.method)))?;
        serde_json::from_value(params).map_err(|e| A2AError::InvalidParams(e.to_string()))
    }
}

fn params_are_empty(params: &Option<Value>) -> bool {
    match params {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Outcome carried by a response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Result(Value),
    Error(JsonRpcError),
}

/// JSON-RPC 2.0 response envelope
///
/// Carries exactly one of a result or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawResponse", try_from = "RawResponse")]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: String,
    pub payload: ResponsePayload,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn create_success(id: impl Into<String>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            payload: ResponsePayload::Result(result),
        }
    }

    /// Create an error response with the given code and message
    pub fn create_error(id: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_error(id, JsonRpcError::new(code, message))
    }

    /// Create an error response from a full error object
    pub fn with_error(id: impl Into<String>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            payload: ResponsePayload::Error(error),
        }
    }

    /// Create an error response describing an [`A2AError`]
    pub fn from_error(id: impl Into<String>, error: &A2AError) -> Self {
        Self::with_error(id, JsonRpcError::from(error))
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Error(error) => Some(error),
            ResponsePayload::Result(_) => None,
        }
    }

    /// Extract the result, turning an error payload into [`A2AError::Remote`]
    pub fn into_result(self) -> A2AResult<Value> {
        match self.payload {
            ResponsePayload::Result(value) => Ok(value),
            ResponsePayload::Error(error) => Err(error.into()),
        }
    }

    /// Parse a response from its JSON text
    pub fn from_json(json: &str) -> A2AResult<Self> {
        serde_json::from_str(json).map_err(|e| A2AError::Parse(e.to_string()))
    }

    /// Parse a response from raw body bytes
    pub fn from_slice(body: &[u8]) -> A2AResult<Self> {
        serde_json::from_slice(body).map_err(|e| A2AError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> A2AResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Wire shape of a response envelope
#[derive(Serialize, Deserialize)]
struct RawResponse {
    #[serde(default)]
    jsonrpc: String,
    #[serde(default, deserialize_with = "deserialize_id")]
    id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

impl From<JsonRpcResponse> for RawResponse {
    fn from(response: JsonRpcResponse) -> Self {
        let (result, error) = match response.payload {
            ResponsePayload::Result(value) => (Some(value), None),
            ResponsePayload::Error(error) => (None, Some(error)),
        };
        RawResponse {
            jsonrpc: response.jsonrpc,
            id: response.id,
            result,
            error,
        }
    }
}

impl TryFrom<RawResponse> for JsonRpcResponse {
    type Error = String;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        let payload = match (raw.result, raw.error) {
            (_, Some(error)) => ResponsePayload::Error(error),
            (Some(result), None) => ResponsePayload::Result(result),
            (None, None) => {
                return Err("response carries neither 'result' nor 'error'".to_string())
            }
        };
        Ok(JsonRpcResponse {
            jsonrpc: raw.jsonrpc,
            id: raw.id,
            payload,
        })
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Attach additional error data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Taxonomy entry for this error, if the code is a known one
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }
}

impl From<&A2AError> for JsonRpcError {
    fn from(error: &A2AError) -> Self {
        let data = match error {
            A2AError::Remote { data, .. } => data.clone(),
            _ => None,
        };
        JsonRpcError {
            code: error.code(),
            message: error.message(),
            data,
        }
    }
}

impl From<JsonRpcError> for A2AError {
    fn from(error: JsonRpcError) -> Self {
        A2AError::Remote {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<Value>::deserialize(deserializer)?;
    coerce_id(id.as_ref()).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "request id must be a string, number or null, got {}",
            id.unwrap_or_default()
        ))
    })
}

/// String form of a raw `id` member; `None` when the value cannot be an id
pub(crate) fn coerce_id(id: Option<&Value>) -> Option<String> {
    match id {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(n)) => Some(number_to_id(n)),
        Some(_) => None,
    }
}

/// Base-10 form of a numeric id, without exponent or fraction
fn number_to_id(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format!("{:.0}", n.as_f64().unwrap_or_default().trunc())
    }
}

/// Distinguishes `"result": null` from an absent member
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 codec that wraps A2A operations
///
/// Each encoded request receives a fresh id from the configured [`IdGenerator`].
#[derive(Debug, Clone)]
pub struct JsonRpcCodec {
    ids: Arc<dyn IdGenerator>,
}

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self {
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Use a specific id generator for request ids
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Build the request envelope for an operation
    pub fn request_for(&self, operation: &A2AOperation) -> A2AResult<JsonRpcRequest> {
        let method = operation.rpc_method().ok_or_else(|| {
            A2AError::UnsupportedOperation(format!(
                "{:?} is not a JSON-RPC operation",
                operation
            ))
        })?;
        Ok(JsonRpcRequest::new(
            self.ids.next_id("req"),
            method,
            operation.params()?,
        ))
    }

    /// Decode a JSON-RPC `result` member for the given operation
    pub fn decode_result(result: Value, operation: &A2AOperation) -> A2AResult<A2AResponse> {
        let response = match operation {
            A2AOperation::SendMessage { .. } => {
                A2AResponse::from_send_result(SendMessageResult::from_value(result)?)
            }
            A2AOperation::GetTask(_) | A2AOperation::CancelTask(_) | A2AOperation::Resubscribe(_) => {
                A2AResponse::Task(Box::new(serde_json::from_value::<Task>(result)?))
            }
            A2AOperation::SetPushNotificationConfig(_)
            | A2AOperation::GetPushNotificationConfig(_) => A2AResponse::PushNotificationConfig(
                serde_json::from_value::<TaskPushNotificationConfig>(result)?,
            ),
            A2AOperation::DiscoverAgent => {
                A2AResponse::AgentCard(Box::new(serde_json::from_value::<AgentCard>(result)?))
            }
        };
        Ok(response)
    }
}

impl Default for JsonRpcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let request = self.request_for(operation)?;
        Ok(Bytes::from(serde_json::to_vec(&request)?))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        // Agent cards are served as plain JSON, not wrapped in an envelope
        if matches!(operation, A2AOperation::DiscoverAgent) {
            let card: AgentCard = serde_json::from_slice(body)
                .map_err(|e| A2AError::Internal(format!("Failed to parse agent card: {}", e)))?;
            return Ok(A2AResponse::AgentCard(Box::new(card)));
        }

        if body.is_empty() {
            return Err(A2AError::Internal("empty JSON-RPC response".to_string()));
        }

        let response = JsonRpcResponse::from_slice(body)?;
        Self::decode_result(response.into_result()?, operation)
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        id::SequentialIdGenerator,
        protocol::{
            message::Message,
            task::{MessageSendParams, TaskIdParams, TaskQueryParams},
        },
    };

    #[test]
    fn test_request_id_coercion() {
        let req = JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","id":999,"method":"tasks/get"}"#)
            .unwrap();
        assert_eq!(req.id, "999");

        let req =
            JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","id":7.0,"method":"tasks/get"}"#).unwrap();
        assert_eq!(req.id, "7");

        let req = JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","id":null,"method":"tasks/get"}"#)
            .unwrap();
        assert_eq!(req.id, "");

        let req = JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","method":"tasks/get"}"#).unwrap();
        assert_eq!(req.id, "");
    }

    #[test]
    fn test_empty_params_are_omitted() {
        let req = JsonRpcRequest::new("1", "tasks/get", Some(json!({})));
        let json = req.to_json().unwrap();
        assert!(!json.contains("params"));

        let req = JsonRpcRequest::new("1", "tasks/get", None);
        assert!(!req.to_json().unwrap().contains("params"));
    }

    #[test]
    fn test_request_round_trip() {
        let req = JsonRpcRequest::new(
            "req-1",
            "message/send",
            Some(json!({"message": {"parts": [{"kind": "text", "text": "hi"}]}, "n": [1, 2]})),
        );
        let back = JsonRpcRequest::from_json(&req.to_json().unwrap()).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_malformed_request_is_parse_error() {
        let err = JsonRpcRequest::from_json("{not json").unwrap_err();
        assert_eq!(err.code(), -32700);
    }

    #[test]
    fn test_params_as() {
        let req = JsonRpcRequest::new("1", "tasks/get", Some(json!({"id": "t-1"})));
        let params: TaskQueryParams = req.params_as().unwrap();
        assert_eq!(params.id, "t-1");

        let req = JsonRpcRequest::new("1", "tasks/get", None);
        let err = req.params_as::<TaskQueryParams>().unwrap_err();
        assert_eq!(err.code(), -32602);

        let req = JsonRpcRequest::new("1", "tasks/get", Some(json!({"id": 5})));
        assert_eq!(req.params_as::<TaskQueryParams>().unwrap_err().code(), -32602);
    }

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::create_error("42", ErrorCode::TaskNotFound, "Task not found");
        let value: Value = serde_json::from_str(&resp.to_json().unwrap()).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], "42");
        assert_eq!(value["error"]["code"], -32001);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_success_response_with_null_result() {
        let resp = JsonRpcResponse::from_json(r#"{"jsonrpc":"2.0","id":"1","result":null}"#)
            .unwrap();
        assert_eq!(resp.result(), Some(&Value::Null));
    }

    #[test]
    fn test_response_without_payload_is_rejected() {
        let err = JsonRpcResponse::from_json(r#"{"jsonrpc":"2.0","id":"1"}"#).unwrap_err();
        assert_eq!(err.code(), -32700);
    }

    #[test]
    fn test_error_into_remote() {
        let resp = JsonRpcResponse::from_error(
            "1",
            &A2AError::TaskNotCancelable {
                task_id: "t-1".into(),
            },
        );
        match resp.into_result() {
            Err(A2AError::Remote { code, message, .. }) => {
                assert_eq!(code, -32002);
                assert!(message.contains("t-1"));
            }
            _ => panic!("Expected Remote error"),
        }
    }

    #[test]
    fn test_encode_send_message() {
        let codec = JsonRpcCodec::new().with_id_generator(Arc::new(SequentialIdGenerator::new()));
        let operation = A2AOperation::SendMessage {
            params: MessageSendParams::new(Message::user("Hello")),
            stream: false,
        };

        let bytes = codec.encode_request(&operation).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "message/send");
        assert_eq!(json["id"], "req-1");
        assert_eq!(json["params"]["message"]["parts"][0]["text"], "Hello");
    }

    #[test]
    fn test_encode_streaming_message() {
        let codec = JsonRpcCodec::new();
        let operation = A2AOperation::SendMessage {
            params: MessageSendParams::new(Message::user("Hello")),
            stream: true,
        };

        let bytes = codec.encode_request(&operation).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["method"], "message/stream");
    }

    #[test]
    fn test_encode_discover_is_unsupported() {
        let codec = JsonRpcCodec::new();
        assert!(codec.encode_request(&A2AOperation::DiscoverAgent).is_err());
    }

    #[test]
    fn test_decode_task_response() {
        let codec = JsonRpcCodec::new();
        let json = r#"{
            "jsonrpc": "2.0",
            "result": {
                "id": "task-123",
                "contextId": "ctx-1",
                "status": {"state": "submitted", "timestamp": "2024-01-01T00:00:00Z"}
            },
            "id": "req-123"
        }"#;

        let operation = A2AOperation::GetTask(TaskQueryParams::new("task-123"));
        match codec.decode_response(json.as_bytes(), &operation).unwrap() {
            A2AResponse::Task(task) => assert_eq!(task.id, "task-123"),
            _ => panic!("Expected Task response"),
        }
    }

    #[test]
    fn test_decode_message_result() {
        let codec = JsonRpcCodec::new();
        let json = r#"{
            "jsonrpc": "2.0",
            "result": {"messageId": "m-1", "role": "agent", "parts": [{"kind": "text", "text": "Echo: hi"}]},
            "id": "req-1"
        }"#;

        let operation = A2AOperation::SendMessage {
            params: MessageSendParams::new(Message::user("hi")),
            stream: false,
        };
        match codec.decode_response(json.as_bytes(), &operation).unwrap() {
            A2AResponse::Message(msg) => assert_eq!(msg.get_text(), "Echo: hi"),
            _ => panic!("Expected Message response"),
        }
    }

    #[test]
    fn test_decode_error_response() {
        let codec = JsonRpcCodec::new();
        let json = r#"{
            "jsonrpc": "2.0",
            "error": {"code": -32001, "message": "Task not found"},
            "id": "req-123"
        }"#;

        let operation = A2AOperation::CancelTask(TaskIdParams::new("task-123"));
        match codec.decode_response(json.as_bytes(), &operation) {
            Err(A2AError::Remote { code, message, .. }) => {
                assert_eq!(code, -32001);
                assert_eq!(message, "Task not found");
            }
            _ => panic!("Expected Remote error"),
        }
    }

    #[test]
    fn test_decode_agent_card() {
        let codec = JsonRpcCodec::new();
        let body = br#"{"name":"Echo","description":"echoes","url":"http://x","version":"1"}"#;
        match codec.decode_response(body, &A2AOperation::DiscoverAgent).unwrap() {
            A2AResponse::AgentCard(card) => assert_eq!(card.name, "Echo"),
            _ => panic!("Expected AgentCard response"),
        }
    }

    #[test]
    fn test_content_type() {
        let codec = JsonRpcCodec::new();
        assert_eq!(codec.content_type(), "application/json");
    }
}
