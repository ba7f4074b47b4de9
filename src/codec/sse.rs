//! Server-Sent Events (SSE) codec for streaming A2A responses
//!
//! Each event's `data` line carries one JSON-RPC 2.0 response envelope. The server side
//! renders envelopes into frames, the client side parses frames back into events.

use std::fmt;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    codec::jsonrpc::JsonRpcResponse,
    protocol::{
        error::{A2AError, A2AResult},
        task::{SendMessageResult, Task},
    },
};

/// Content type of an SSE response body
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// One streamed result, decoded from the `result` member of an SSE envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SseEvent {
    /// "task" or "message"
    pub kind: String,

    pub payload: Value,
}

impl SseEvent {
    /// Build an event from the `result` member of a JSON-RPC envelope
    pub fn from_result(result: Value) -> Self {
        let kind = if SendMessageResult::looks_like_task(&result) {
            "task"
        } else {
            "message"
        };
        Self {
            kind: kind.to_string(),
            payload: result,
        }
    }

    /// Decode the payload as a task or message
    pub fn into_result(self) -> A2AResult<SendMessageResult> {
        Ok(SendMessageResult::from_value(self.payload)?)
    }

    /// Decode the payload as a task
    pub fn into_task(self) -> A2AResult<Task> {
        Ok(serde_json::from_value(self.payload)?)
    }
}

/// SSE codec for rendering and parsing streaming responses
#[derive(Debug, Clone, Default)]
pub struct SseCodec;

impl SseCodec {
    /// Create a new SSE codec
    pub fn new() -> Self {
        Self
    }

    /// Render one envelope as an SSE frame
    pub fn encode_event(&self, response: &JsonRpcResponse) -> A2AResult<String> {
        Ok(format!("data: {}\n\n", response.to_json()?))
    }

    /// Parse an SSE byte stream into a stream of events
    ///
    /// A JSON-RPC error inside an event surfaces as [`A2AError::Remote`].
    pub fn parse_stream<S, B, E>(
        &self,
        byte_stream: S,
    ) -> impl Stream<Item = Result<SseEvent, A2AError>>
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]>,
        E: fmt::Display,
    {
        byte_stream.eventsource().map(|result| match result {
            Ok(event) => {
                let envelope = JsonRpcResponse::from_json(&event.data)?;
                Ok(SseEvent::from_result(envelope.into_result()?))
            }
            Err(e) => Err(A2AError::Transport(format!("SSE stream error: {}", e))),
        })
    }

    /// Parse a fully buffered SSE body
    pub async fn parse_body(&self, body: bytes::Bytes) -> A2AResult<Vec<SseEvent>> {
        let byte_stream = futures::stream::once(async move { Ok::<_, A2AError>(body) });
        let events: Vec<_> = self.parse_stream(byte_stream).collect().await;
        events.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::protocol::error::ErrorCode;

    #[test]
    fn test_sse_event_kind() {
        let event = SseEvent::from_result(
            json!({"id": "t", "contextId": "c", "status": {"state": "completed", "timestamp": "2024-01-01T00:00:00Z"}}),
        );
        assert_eq!(event.kind, "task");
        assert!(event.into_task().unwrap().is_terminal());

        let event = SseEvent::from_result(json!({"messageId": "m", "role": "agent", "parts": []}));
        assert_eq!(event.kind, "message");
        assert!(event.into_result().unwrap().is_message());
    }

    #[test]
    fn test_encode_event() {
        let codec = SseCodec::new();
        let frame = codec
            .encode_event(&JsonRpcResponse::create_success("1", json!({"ok": true})))
            .unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_parse_sse_stream() {
        use futures::pin_mut;

        let codec = SseCodec;

        let sse_data = "data: {\"jsonrpc\":\"2.0\",\"result\":{\"id\":\"t-1\",\"status\":{\"state\":\"running\"}},\"id\":\"1\"}\n\n\
                        data: {\"jsonrpc\":\"2.0\",\"result\":{\"messageId\":\"m\",\"role\":\"agent\",\"parts\":[]},\"id\":\"2\"}\n\n";

        let byte_stream = futures::stream::once(async move {
            Ok::<bytes::Bytes, reqwest::Error>(bytes::Bytes::from(sse_data))
        });

        let event_stream = codec.parse_stream(byte_stream);
        pin_mut!(event_stream);

        let event1 = event_stream.next().await.unwrap().unwrap();
        assert_eq!(event1.kind, "task");
        assert_eq!(event1.payload["status"]["state"], "running");

        let event2 = event_stream.next().await.unwrap().unwrap();
        assert_eq!(event2.kind, "message");
        assert!(event_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_parse_sse_error() {
        let codec = SseCodec;
        let frame = codec
            .encode_event(&JsonRpcResponse::create_error(
                "1",
                ErrorCode::TaskNotFound,
                "Task not found",
            ))
            .unwrap();

        let result = codec.parse_body(bytes::Bytes::from(frame)).await;
        match result {
            Err(A2AError::Remote { code, message, .. }) => {
                assert_eq!(code, -32001);
                assert!(message.contains("Task not found"));
            }
            _ => panic!("Expected Remote error"),
        }
    }
}
