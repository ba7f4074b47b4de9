//! A2A service response types

use crate::{
    codec::sse::SseEvent,
    protocol::{
        agent::AgentCard,
        message::Message,
        task::{SendMessageResult, Task, TaskPushNotificationConfig},
    },
};

/// Response from an A2A service operation
#[derive(Debug, Clone)]
pub enum A2AResponse {
    /// Task response (from SendMessage, GetTask, CancelTask)
    Task(Box<Task>),

    /// Direct message reply (from SendMessage)
    Message(Box<Message>),

    /// Agent card response (from DiscoverAgent)
    AgentCard(Box<AgentCard>),

    /// Events of a streamed response (from streaming SendMessage, Resubscribe)
    Events(Vec<SseEvent>),

    PushNotificationConfig(TaskPushNotificationConfig),

    /// Empty response (for operations with no return value)
    Empty,
}

impl A2AResponse {
    /// Wrap a `message/send` result
    pub fn from_send_result(result: SendMessageResult) -> Self {
        match result {
            SendMessageResult::Task(task) => A2AResponse::Task(task),
            SendMessageResult::Message(message) => A2AResponse::Message(message),
        }
    }

    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract a message from the response, if present
    pub fn into_message(self) -> Option<Message> {
        match self {
            A2AResponse::Message(message) => Some(*message),
            _ => None,
        }
    }

    /// Extract a task or message from the response, if present
    pub fn into_send_result(self) -> Option<SendMessageResult> {
        match self {
            A2AResponse::Task(task) => Some(SendMessageResult::Task(task)),
            A2AResponse::Message(message) => Some(SendMessageResult::Message(message)),
            _ => None,
        }
    }

    /// Extract an agent card from the response, if present
    pub fn into_agent_card(self) -> Option<AgentCard> {
        match self {
            A2AResponse::AgentCard(card) => Some(*card),
            _ => None,
        }
    }

    /// Extract streamed events from the response, if present
    pub fn into_events(self) -> Option<Vec<SseEvent>> {
        match self {
            A2AResponse::Events(events) => Some(events),
            _ => None,
        }
    }

    pub fn into_push_notification_config(self) -> Option<TaskPushNotificationConfig> {
        match self {
            A2AResponse::PushNotificationConfig(config) => Some(config),
            _ => None,
        }
    }

    /// Check if the response is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, A2AResponse::Empty)
    }
}
