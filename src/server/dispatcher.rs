//! JSON-RPC method dispatch onto a [`TaskManager`]

use std::sync::Arc;

use serde_json::Value;

use crate::{
    codec::{jsonrpc::coerce_id, JsonRpcRequest, JsonRpcResponse, SseCodec},
    protocol::{
        error::ErrorCode, methods, A2AError, A2AResult, MessageSendParams, SendMessageResult,
        TaskIdParams, TaskQueryParams,
    },
    server::manager::TaskManager,
};

/// What a dispatched request produced
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// One response envelope, sent as `application/json`
    Single(JsonRpcResponse),

    /// Rendered SSE frames, sent as `text/event-stream`
    Stream(Vec<String>),
}

impl DispatchOutcome {
    pub fn is_stream(&self) -> bool {
        matches!(self, DispatchOutcome::Stream(_))
    }
}

/// Maps JSON-RPC requests to task manager operations
///
/// Every failure is answered with an error envelope carrying the originating request id.
/// Requests that cannot be parsed at all are answered with an empty id.
#[derive(Debug, Clone)]
pub struct JsonRpcDispatcher {
    manager: Arc<TaskManager>,
    sse: SseCodec,
}

impl JsonRpcDispatcher {
    pub fn new(manager: Arc<TaskManager>) -> Self {
        Self {
            manager,
            sse: SseCodec::new(),
        }
    }

    pub fn manager(&self) -> &Arc<TaskManager> {
        &self.manager
    }

    /// Dispatch a raw request body
    pub async fn dispatch_bytes(&self, body: &[u8]) -> DispatchOutcome {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "unparsable JSON-RPC body");
                return DispatchOutcome::Single(JsonRpcResponse::create_error(
                    "",
                    ErrorCode::ParseError,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // Echo the caller's id even when the rest of the envelope is unusable
        let id = coerce_id(value.get("id")).unwrap_or_default();

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => DispatchOutcome::Single(JsonRpcResponse::create_error(
                id,
                ErrorCode::InvalidRequest,
                format!("Invalid request: {}", e),
            )),
        }
    }

    /// Dispatch a decoded request
    pub async fn dispatch(&self, request: JsonRpcRequest) -> DispatchOutcome {
        tracing::debug!(method = %request.method, request_id = %request.id, "dispatching");

        if request.jsonrpc != crate::codec::jsonrpc::JSONRPC_VERSION || request.method.is_empty() {
            return DispatchOutcome::Single(JsonRpcResponse::create_error(
                request.id,
                ErrorCode::InvalidRequest,
                "Invalid request: expected jsonrpc \"2.0\" and a method",
            ));
        }

        if methods::is_streaming_method(&request.method) {
            return DispatchOutcome::Stream(self.stream(&request).await);
        }

        let response = match self.call(&request).await {
            Ok(result) => JsonRpcResponse::create_success(request.id, result),
            Err(e) => {
                tracing::debug!(method = %request.method, code = e.code(), error = %e, "request failed");
                JsonRpcResponse::from_error(request.id, &e)
            }
        };
        DispatchOutcome::Single(response)
    }

    async fn call(&self, request: &JsonRpcRequest) -> A2AResult<Value> {
        match request.method.as_str() {
            methods::MESSAGE_SEND => {
                let params: MessageSendParams = request.params_as()?;
                let result = self.manager.send_message(params).await?;
                Ok(serde_json::to_value(result)?)
            }
            methods::TASKS_GET => {
                let params: TaskQueryParams = request.params_as()?;
                let task = self
                    .manager
                    .get_task_with_history(&params.id, params.history_length)
                    .await?;
                Ok(serde_json::to_value(task)?)
            }
            methods::TASKS_CANCEL => {
                let params: TaskIdParams = request.params_as()?;
                let task = self.manager.cancel_task(&params.id).await?;
                Ok(serde_json::to_value(task)?)
            }
            methods::TASKS_PUSH_NOTIFICATION_CONFIG_SET
            | methods::TASKS_PUSH_NOTIFICATION_CONFIG_GET => {
                Err(A2AError::PushNotificationNotSupported)
            }
            other => Err(A2AError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }

    async fn stream_results(&self, request: &JsonRpcRequest) -> A2AResult<Vec<Value>> {
        let results: Vec<SendMessageResult> = match request.method.as_str() {
            methods::MESSAGE_STREAM => {
                let params: MessageSendParams = request.params_as()?;
                let mut events = Vec::new();
                self.manager
                    .send_message_streaming(params, &mut events)
                    .await?;
                events
            }
            methods::TASKS_RESUBSCRIBE => {
                let params: TaskIdParams = request.params_as()?;
                vec![self.manager.get_task(&params.id).await?.into()]
            }
            other => {
                return Err(A2AError::MethodNotFound {
                    method: other.to_string(),
                })
            }
        };

        results
            .into_iter()
            .map(|result| serde_json::to_value(result).map_err(A2AError::from))
            .collect()
    }

    async fn stream(&self, request: &JsonRpcRequest) -> Vec<String> {
        let envelopes = match self.stream_results(request).await {
            Ok(results) => results
                .into_iter()
                .map(|result| JsonRpcResponse::create_success(request.id.clone(), result))
                .collect(),
            Err(e) => vec![JsonRpcResponse::from_error(request.id.clone(), &e)],
        };

        envelopes
            .iter()
            .filter_map(|envelope| match self.sse.encode_event(envelope) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    tracing::warn!(request_id = %request.id, error = %e, "dropping unencodable event");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::{
        protocol::{Message, Task, TaskState},
        server::manager::AgentHandler,
    };

    struct EchoHandler;

    #[async_trait]
    impl AgentHandler for EchoHandler {
        async fn on_message_received(
            &self,
            params: &MessageSendParams,
        ) -> A2AResult<SendMessageResult> {
            Ok(Message::agent(format!("Echo: {}", params.message.get_text())).into())
        }
    }

    fn dispatcher() -> JsonRpcDispatcher {
        let manager = TaskManager::in_memory().with_handler(Arc::new(EchoHandler));
        JsonRpcDispatcher::new(Arc::new(manager))
    }

    async fn single(dispatcher: &JsonRpcDispatcher, body: Value) -> JsonRpcResponse {
        match dispatcher.dispatch_bytes(body.to_string().as_bytes()).await {
            DispatchOutcome::Single(response) => response,
            DispatchOutcome::Stream(_) => panic!("Expected single response"),
        }
    }

    fn error_code(response: &JsonRpcResponse) -> i64 {
        response.error().map(|e| e.code).unwrap_or_default()
    }

    #[tokio::test]
    async fn test_parse_error() {
        let outcome = dispatcher().dispatch_bytes(b"{not json").await;
        match outcome {
            DispatchOutcome::Single(response) => {
                assert_eq!(error_code(&response), -32700);
                assert_eq!(response.id, "");
            }
            _ => panic!("Expected single response"),
        }
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let d = dispatcher();

        let response = single(&d, json!({"id": 1, "method": "tasks/get"})).await;
        assert_eq!(error_code(&response), -32600);
        assert_eq!(response.id, "1");

        let response = single(&d, json!({"jsonrpc": "2.0", "id": "a"})).await;
        assert_eq!(error_code(&response), -32600);

        let response = single(&d, json!([1, 2, 3])).await;
        assert_eq!(error_code(&response), -32600);
        assert_eq!(response.id, "");
    }

    #[tokio::test]
    async fn test_malformed_request_keeps_id() {
        let d = dispatcher();

        let response = single(&d, json!({"jsonrpc": "2.0", "id": 5, "method": 7})).await;
        assert_eq!(error_code(&response), -32600);
        assert_eq!(response.id, "5");

        let response = single(&d, json!({"jsonrpc": "2.0", "id": "req-9", "params": []})).await;
        assert_eq!(error_code(&response), -32600);
        assert_eq!(response.id, "req-9");

        let response = single(&d, json!({"jsonrpc": "2.0", "id": {"nested": true}, "method": 7})).await;
        assert_eq!(error_code(&response), -32600);
        assert_eq!(response.id, "");
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let response = single(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": "7", "method": "tasks/list"}),
        )
        .await;
        assert_eq!(error_code(&response), -32601);
        assert_eq!(response.id, "7");
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let d = dispatcher();

        let response = single(&d, json!({"jsonrpc": "2.0", "id": "1", "method": "tasks/get"})).await;
        assert_eq!(error_code(&response), -32602);

        let response = single(
            &d,
            json!({"jsonrpc": "2.0", "id": "2", "method": "message/send", "params": {"message": 5}}),
        )
        .await;
        assert_eq!(error_code(&response), -32602);
    }

    #[tokio::test]
    async fn test_message_send() {
        let response = single(
            &dispatcher(),
            json!({
                "jsonrpc": "2.0",
                "id": 999,
                "method": "message/send",
                "params": {"message": {"messageId": "m-1", "role": "user", "parts": [{"kind": "text", "text": "Hello"}]}}
            }),
        )
        .await;

        assert_eq!(response.id, "999");
        let result = response.result().unwrap();
        assert_eq!(result["role"], "agent");
        assert_eq!(result["parts"][0]["text"], "Echo: Hello");
    }

    #[tokio::test]
    async fn test_tasks_get_and_cancel() {
        let d = dispatcher();
        let task = d
            .manager()
            .create_task(Some("ctx-1".into()), Some("task-1".into()))
            .await;
        for i in 1..=4 {
            d.manager()
                .store()
                .add_history_message(&task.id, Message::user(format!("m{}", i)))
                .await;
        }

        let response = single(
            &d,
            json!({"jsonrpc": "2.0", "id": "g", "method": "tasks/get", "params": {"id": "task-1", "historyLength": 2}}),
        )
        .await;
        let fetched: Task = serde_json::from_value(response.result().unwrap().clone()).unwrap();
        assert_eq!(fetched.history.len(), 2);
        assert_eq!(fetched.history[1].get_text(), "m4");

        let response = single(
            &d,
            json!({"jsonrpc": "2.0", "id": "c", "method": "tasks/cancel", "params": {"id": "task-1"}}),
        )
        .await;
        assert_eq!(response.result().unwrap()["status"]["state"], "canceled");

        let response = single(
            &d,
            json!({"jsonrpc": "2.0", "id": "c2", "method": "tasks/cancel", "params": {"id": "task-1"}}),
        )
        .await;
        assert_eq!(error_code(&response), -32002);
        assert_eq!(response.id, "c2");

        let response = single(
            &d,
            json!({"jsonrpc": "2.0", "id": "x", "method": "tasks/get", "params": {"id": "missing-id"}}),
        )
        .await;
        assert_eq!(error_code(&response), -32001);
        assert!(response.result().is_none());
    }

    #[tokio::test]
    async fn test_push_notifications_unsupported() {
        let response = single(
            &dispatcher(),
            json!({"jsonrpc": "2.0", "id": "p", "method": "tasks/pushNotificationConfig/get", "params": {"id": "t"}}),
        )
        .await;
        assert_eq!(error_code(&response), -32005);
    }

    #[tokio::test]
    async fn test_message_stream_single_event() {
        let outcome = dispatcher()
            .dispatch_bytes(
                json!({
                    "jsonrpc": "2.0",
                    "id": "s",
                    "method": "message/stream",
                    "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "hi"}]}}
                })
                .to_string()
                .as_bytes(),
            )
            .await;

        let frames = match outcome {
            DispatchOutcome::Stream(frames) => frames,
            _ => panic!("Expected stream outcome"),
        };
        assert_eq!(frames.len(), 1);
        assert!(frames[0].starts_with("data: "));
        assert!(frames[0].ends_with("\n\n"));

        let envelope = JsonRpcResponse::from_json(frames[0].trim_start_matches("data: ").trim()).unwrap();
        assert_eq!(envelope.id, "s");
        assert_eq!(envelope.result().unwrap()["parts"][0]["text"], "Echo: hi");
    }

    #[tokio::test]
    async fn test_resubscribe_snapshot() {
        let d = dispatcher();
        let task = d.manager().create_task(None, None).await;
        d.manager()
            .update_status(&task.id, TaskState::Running, None)
            .await
            .unwrap();

        let outcome = d
            .dispatch_bytes(
                json!({"jsonrpc": "2.0", "id": "r", "method": "tasks/resubscribe", "params": {"id": task.id}})
                    .to_string()
                    .as_bytes(),
            )
            .await;
        let DispatchOutcome::Stream(frames) = outcome else {
            panic!("Expected stream outcome");
        };
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("\"running\""));

        // Unknown tasks yield a single error event
        let outcome = d
            .dispatch_bytes(
                json!({"jsonrpc": "2.0", "id": "r2", "method": "tasks/resubscribe", "params": {"id": "nope"}})
                    .to_string()
                    .as_bytes(),
            )
            .await;
        let DispatchOutcome::Stream(frames) = outcome else {
            panic!("Expected stream outcome");
        };
        assert!(frames[0].contains("-32001"));
    }
}
