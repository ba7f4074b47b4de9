//! A2A wire format compliance tests
//!
//! These tests pin the JSON shapes exchanged with other A2A implementations.

use serde_json::json;
use tower_a2a_tasks::{
    codec::{JsonRpcRequest, JsonRpcResponse},
    protocol::{
        message::{Message, Part, Role},
        task::{SendMessageResult, Task, TaskState, TaskStatus},
        A2AError, AgentCard, AgentTransport, Artifact, ErrorCode,
    },
};

#[test]
fn test_role_serialization() {
    // Roles serialize to lowercase names
    let json = serde_json::to_value(Message::user("Hello")).unwrap();
    assert_eq!(json["role"], "user");

    let json = serde_json::to_value(Message::agent("Hi there")).unwrap();
    assert_eq!(json["role"], "agent");

    let json = serde_json::to_value(Message::system("Be brief")).unwrap();
    assert_eq!(json["role"], "system");
}

#[test]
fn test_text_part_serialization() {
    let json = serde_json::to_value(Part::text("Hello, world!")).unwrap();

    assert_eq!(json, json!({"kind": "text", "text": "Hello, world!"}));
}

#[test]
fn test_file_part_uses_base64() {
    let part = Part::file("hello.bin", "application/octet-stream", b"Hello".to_vec());
    let json = serde_json::to_value(&part).unwrap();

    assert_eq!(json["kind"], "file");
    assert_eq!(json["file"]["name"], "hello.bin");
    assert_eq!(json["file"]["mimeType"], "application/octet-stream");
    assert_eq!(json["file"]["bytes"], "SGVsbG8=");
    assert!(json["file"].get("uri").is_none());

    let decoded: Part = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, part);
}

#[test]
fn test_file_part_accepts_legacy_field_names() {
    let part: Part = serde_json::from_value(json!({
        "kind": "file",
        "file": {"filename": "doc.txt", "data": "aGk="}
    }))
    .unwrap();

    match part {
        Part::File { file } => {
            assert_eq!(file.name, "doc.txt");
            assert_eq!(file.bytes, b"hi");
            assert_eq!(file.mime_type, "application/octet-stream");
        }
        _ => panic!("Expected file part"),
    }
}

#[test]
fn test_data_part_serialization() {
    let data = json!({"key": "value", "count": 42});
    let json = serde_json::to_value(Part::data(data.clone())).unwrap();

    assert_eq!(json["kind"], "data");
    assert_eq!(json["data"], data);
}

#[test]
fn test_unknown_parts_are_dropped() {
    let message: Message = serde_json::from_value(json!({
        "messageId": "m-1",
        "role": "user",
        "parts": [
            {"kind": "text", "text": "kept"},
            {"kind": "hologram", "frames": 3},
            {"text": "no kind"},
            {"kind": "data", "data": {"n": 1}}
        ]
    }))
    .unwrap();

    let kinds: Vec<_> = message.parts.iter().map(Part::kind).collect();
    assert_eq!(kinds, vec!["text", "data"]);
}

#[test]
fn test_message_field_naming() {
    let msg = Message::builder(Role::User)
        .part(Part::text("Test"))
        .message_id("msg-123")
        .task_id("task-456")
        .context_id("ctx-789")
        .build();

    let json = serde_json::to_value(&msg).unwrap();

    assert_eq!(json["messageId"], "msg-123");
    assert_eq!(json["taskId"], "task-456");
    assert_eq!(json["contextId"], "ctx-789");

    assert!(json.get("message_id").is_none());
    assert!(json.get("task_id").is_none());
    assert!(json.get("context_id").is_none());
}

#[test]
fn test_utf8_text_survives() {
    let text = "你好，世界 🌍 — ça va?";
    let json = serde_json::to_string(&Message::user(text)).unwrap();
    let decoded: Message = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded.get_text(), text);
}

#[test]
fn test_task_state_names() {
    let cases = [
        (TaskState::Submitted, "submitted"),
        (TaskState::Running, "running"),
        (TaskState::Completed, "completed"),
        (TaskState::Failed, "failed"),
        (TaskState::Canceled, "canceled"),
        (TaskState::Rejected, "rejected"),
    ];

    for (state, name) in cases {
        let task = Task::new("t", "c").with_status(TaskStatus::new(state));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"]["state"], name);

        let decoded: Task = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.state(), state);
    }

    // Names used by other implementations decode to the same states
    let state: TaskState = serde_json::from_value(json!("working")).unwrap();
    assert_eq!(state, TaskState::Running);
    let state: TaskState = serde_json::from_value(json!("cancelled")).unwrap();
    assert_eq!(state, TaskState::Canceled);
}

#[test]
fn test_task_field_naming() {
    let task = Task::new("task-1", "ctx-1")
        .with_artifact(Artifact::new("a-1", "report").with_mime_type("text/plain"))
        .with_history_message(Message::user("hi"));
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["id"], "task-1");
    assert_eq!(json["contextId"], "ctx-1");
    assert!(json["status"]["timestamp"].is_string());
    assert_eq!(json["artifacts"][0]["mimeType"], "text/plain");
    assert_eq!(json["history"][0]["role"], "user");
}

#[test]
fn test_error_codes() {
    let expected = [
        (ErrorCode::ParseError, -32700),
        (ErrorCode::InvalidRequest, -32600),
        (ErrorCode::MethodNotFound, -32601),
        (ErrorCode::InvalidParams, -32602),
        (ErrorCode::InternalError, -32603),
        (ErrorCode::TaskNotFound, -32001),
        (ErrorCode::TaskNotCancelable, -32002),
        (ErrorCode::UnsupportedOperation, -32003),
        (ErrorCode::ContentTypeNotSupported, -32004),
        (ErrorCode::PushNotificationNotSupported, -32005),
    ];

    for (code, value) in expected {
        assert_eq!(code.code(), value);
        assert_eq!(ErrorCode::from_code(value), Some(code));
    }
    assert_eq!(ErrorCode::from_code(-1), None);

    let err = A2AError::TaskNotFound {
        task_id: "t".into(),
    };
    assert_eq!(err.error_code(), Some(ErrorCode::TaskNotFound));
}

#[test]
fn test_numeric_request_id_is_coerced() {
    let request =
        JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","id":999,"method":"tasks/get"}"#).unwrap();
    assert_eq!(request.id, "999");

    let request =
        JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","id":null,"method":"tasks/get"}"#).unwrap();
    assert_eq!(request.id, "");

    let request = JsonRpcRequest::from_json(r#"{"jsonrpc":"2.0","method":"tasks/get"}"#).unwrap();
    assert_eq!(request.id, "");
}

#[test]
fn test_request_envelope_round_trip() {
    let params = json!({
        "message": {
            "messageId": "m-1",
            "role": "user",
            "parts": [{"kind": "data", "data": {"nested": {"list": [1, 2, {"deep": true}]}}}]
        },
        "historyLength": 5
    });
    let request = JsonRpcRequest::new("req-1", "message/send", Some(params));

    let decoded = JsonRpcRequest::from_json(&request.to_json().unwrap()).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_empty_params_are_omitted() {
    let request = JsonRpcRequest::new("1", "tasks/get", Some(json!({})));
    let json: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
    assert!(json.get("params").is_none());
}

#[test]
fn test_error_envelope_shape() {
    let response = JsonRpcResponse::create_error("7", ErrorCode::TaskNotFound, "Task not found");
    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();

    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["id"], "7");
    assert_eq!(json["error"]["code"], -32001);
    assert_eq!(json["error"]["message"], "Task not found");
    assert!(json.get("result").is_none());
}

#[test]
fn test_null_result_is_preserved() {
    let response = JsonRpcResponse::from_json(r#"{"jsonrpc":"2.0","id":"1","result":null}"#).unwrap();
    assert!(!response.is_error());
    assert_eq!(response.result(), Some(&serde_json::Value::Null));
}

#[test]
fn test_send_result_classification() {
    let task = serde_json::to_value(Task::new("t-1", "c-1")).unwrap();
    assert!(SendMessageResult::from_value(task).unwrap().is_task());

    let message = serde_json::to_value(Message::agent("hi")).unwrap();
    assert!(SendMessageResult::from_value(message).unwrap().is_message());

    // An explicit kind takes precedence over the status marker
    let tagged = json!({"kind": "message", "role": "agent", "parts": [], "status": {}});
    assert!(SendMessageResult::from_value(tagged).unwrap().is_message());
}

#[test]
fn test_agent_card_defaults() {
    let card: AgentCard = serde_json::from_value(json!({
        "name": "Math Agent",
        "description": "Does sums",
        "url": "http://localhost:5000",
        "version": "1.0.0"
    }))
    .unwrap();

    assert_eq!(card.protocol_version, "0.3.0");
    assert_eq!(card.default_input_modes, vec!["text"]);
    assert_eq!(card.preferred_transport, AgentTransport::JsonRpc);

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["preferredTransport"], "JSONRPC");
    assert_eq!(json["defaultOutputModes"], json!(["text"]));
}
