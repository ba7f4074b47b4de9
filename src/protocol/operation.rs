//! A2A protocol operations

use serde_json::Value;

use super::{
    methods,
    task::{MessageSendParams, TaskIdParams, TaskPushNotificationConfig, TaskQueryParams},
};

/// A2A protocol operations
///
/// Each operation is one client-initiated exchange with a remote agent. All of them
/// except [`A2AOperation::DiscoverAgent`] travel as JSON-RPC requests.
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send a message to an agent
    SendMessage {
        params: MessageSendParams,

        /// Whether to stream the response
        stream: bool,
    },

    /// Get a task by ID
    GetTask(TaskQueryParams),

    /// Cancel a task
    CancelTask(TaskIdParams),

    /// Re-attach to a task's event stream
    Resubscribe(TaskIdParams),

    SetPushNotificationConfig(TaskPushNotificationConfig),

    GetPushNotificationConfig(TaskIdParams),

    /// Discover agent capabilities (fetch Agent Card)
    DiscoverAgent,
}

impl A2AOperation {
    /// JSON-RPC method name, or `None` for plain HTTP operations
    pub fn rpc_method(&self) -> Option<&'static str> {
        let method = match self {
            A2AOperation::SendMessage { stream: false, .. } => methods::MESSAGE_SEND,
            A2AOperation::SendMessage { stream: true, .. } => methods::MESSAGE_STREAM,
            A2AOperation::GetTask(_) => methods::TASKS_GET,
            A2AOperation::CancelTask(_) => methods::TASKS_CANCEL,
            A2AOperation::Resubscribe(_) => methods::TASKS_RESUBSCRIBE,
            A2AOperation::SetPushNotificationConfig(_) => {
                methods::TASKS_PUSH_NOTIFICATION_CONFIG_SET
            }
            A2AOperation::GetPushNotificationConfig(_) => {
                methods::TASKS_PUSH_NOTIFICATION_CONFIG_GET
            }
            A2AOperation::DiscoverAgent => return None,
        };
        Some(method)
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "GET",
            _ => "POST",
        }
    }

    /// JSON-RPC params of this operation
    pub fn params(&self) -> Result<Option<Value>, serde_json::Error> {
        let params = match self {
            A2AOperation::SendMessage { params, .. } => serde_json::to_value(params)?,
            A2AOperation::GetTask(params) => serde_json::to_value(params)?,
            A2AOperation::CancelTask(params)
            | A2AOperation::Resubscribe(params)
            | A2AOperation::GetPushNotificationConfig(params) => serde_json::to_value(params)?,
            A2AOperation::SetPushNotificationConfig(config) => serde_json::to_value(config)?,
            A2AOperation::DiscoverAgent => return Ok(None),
        };
        Ok(Some(params))
    }

    /// Check if this operation expects a streaming response
    pub fn is_streaming(&self) -> bool {
        self.rpc_method().is_some_and(methods::is_streaming_method)
    }
}
