//! A2A task types and lifecycle management

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{message::Message, Artifact};

/// A task in the A2A protocol
///
/// Tasks represent units of work performed by agents. They carry their current status,
/// the artifacts produced so far and the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context grouping related tasks and messages
    #[serde(default)]
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced by the agent, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged for this task, in arrival order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Task {
    /// Create a new task in the submitted state
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Replace the task status wholesale
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Append an artifact
    pub fn add_artifact(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    /// Append a history message
    pub fn add_history_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Update the task status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Append an artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Append a history message
    pub fn with_history_message(mut self, message: Message) -> Self {
        self.history.push(message);
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Keep only the last `history_length` history messages
    ///
    /// Zero or negative lengths leave the history untouched.
    pub fn truncate_history(&mut self, history_length: i32) {
        let keep = history_window_len(self.history.len(), history_length);
        let drop = self.history.len() - keep;
        self.history.drain(..drop);
    }
}

/// Number of trailing items kept by a history window of `max_length`
///
/// Zero, negative or oversized windows keep everything.
pub(crate) fn history_window_len(len: usize, max_length: i32) -> usize {
    match usize::try_from(max_length) {
        Ok(n) if n > 0 && n < len => n,
        _ => len,
    }
}

/// Task lifecycle state
///
/// Lifecycle: submitted → running → completed/failed/canceled/rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Task has been received and is queued for processing
    Submitted,

    /// Task is currently being processed
    #[serde(alias = "working")]
    Running,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,

    /// Task was canceled by the client
    #[serde(alias = "cancelled")]
    Canceled,

    /// Task was rejected by the agent
    Rejected,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled | TaskState::Rejected
        )
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a task's lifecycle position
///
/// Replaced wholesale on every status change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub state: TaskState,

    /// When this status was recorded
    pub timestamp: DateTime<Utc>,

    /// Optional free-text status note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskStatus {
    /// Create a status stamped with the current time
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            timestamp: Utc::now(),
            message: None,
        }
    }

    /// Attach a status note; empty notes are ignored
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.is_empty()).then_some(message);
        self
    }
}

/// Parameters of `message/send` and `message/stream`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendParams {
    /// The message to send
    pub message: Message,

    /// Optional context ID for multi-turn conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Optional task ID to continue from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Maximum number of history messages to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<i32>,
}

impl MessageSendParams {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            context_id: None,
            task_id: None,
            history_length: None,
        }
    }

    /// Set the context ID
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Set the task ID
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Set the requested history length
    pub fn with_history_length(mut self, history_length: i32) -> Self {
        self.history_length = Some(history_length);
        self
    }
}

/// Parameters of `tasks/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub id: String,

    /// Maximum number of history messages to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<i32>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl TaskQueryParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history_length: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the requested history length
    pub fn with_history_length(mut self, history_length: i32) -> Self {
        self.history_length = Some(history_length);
        self
    }
}

/// Parameters of `tasks/cancel`, `tasks/resubscribe` and `tasks/pushNotificationConfig/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskIdParams {
    pub id: String,
}

impl TaskIdParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Push notification target for a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PushNotificationConfig {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Parameters of `tasks/pushNotificationConfig/set`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPushNotificationConfig {
    pub task_id: String,
    pub push_notification_config: PushNotificationConfig,
}

/// Result of `message/send`: either a task or a direct message, never both
///
/// Serialized untagged. Decoding classifies by an explicit `kind` member when the peer
/// sends one, and otherwise by the presence of a `status` object, which only tasks carry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum SendMessageResult {
    Task(Box<Task>),
    Message(Box<Message>),
}

impl SendMessageResult {
    /// Classify and decode a raw result object
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if Self::looks_like_task(&value) {
            serde_json::from_value(value).map(|t| SendMessageResult::Task(Box::new(t)))
        } else {
            serde_json::from_value(value).map(|m| SendMessageResult::Message(Box::new(m)))
        }
    }

    /// Whether a raw result object describes a task
    pub fn looks_like_task(value: &Value) -> bool {
        match value.get("kind").and_then(Value::as_str) {
            Some("task") => true,
            Some("message") => false,
            _ => value.get("status").is_some_and(Value::is_object),
        }
    }

    pub fn is_task(&self) -> bool {
        matches!(self, SendMessageResult::Task(_))
    }

    pub fn is_message(&self) -> bool {
        matches!(self, SendMessageResult::Message(_))
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            SendMessageResult::Task(task) => Some(task),
            SendMessageResult::Message(_) => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            SendMessageResult::Message(message) => Some(message),
            SendMessageResult::Task(_) => None,
        }
    }

    pub fn into_task(self) -> Option<Task> {
        match self {
            SendMessageResult::Task(task) => Some(*task),
            SendMessageResult::Message(_) => None,
        }
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            SendMessageResult::Message(message) => Some(*message),
            SendMessageResult::Task(_) => None,
        }
    }
}

impl From<Task> for SendMessageResult {
    fn from(task: Task) -> Self {
        SendMessageResult::Task(Box::new(task))
    }
}

impl From<Message> for SendMessageResult {
    fn from(message: Message) -> Self {
        SendMessageResult::Message(Box::new(message))
    }
}

impl<'de> Deserialize<'de> for SendMessageResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::message::Message;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123", "ctx-1");

        assert_eq!(task.id, "task-123");
        assert_eq!(task.context_id, "ctx-1");
        assert_eq!(task.state(), TaskState::Submitted);
        assert!(!task.is_terminal());
        assert!(task.artifacts.is_empty());
        assert!(task.history.is_empty());
    }

    #[test]
    fn test_task_lifecycle() {
        let task = Task::new("task-123", "ctx-1");

        let task = task.with_status(TaskStatus::new(TaskState::Running));
        assert_eq!(task.state(), TaskState::Running);
        assert!(!task.is_terminal());

        let task = task.with_status(TaskStatus::new(TaskState::Completed).with_message("done"));
        assert!(task.is_terminal());
        assert_eq!(task.status.message.as_deref(), Some("done"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(TaskState::Rejected.is_terminal());
    }

    #[test]
    fn test_empty_status_note_is_dropped() {
        let status = TaskStatus::new(TaskState::Running).with_message("");
        assert_eq!(status.message, None);
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123", "ctx-1").with_metadata("owner", "tests");

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"id\":\"task-123\""));
        assert!(json.contains("\"contextId\":\"ctx-1\""));
        assert!(json.contains("\"state\":\"submitted\""));

        let deserialized: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(task, deserialized);
    }

    #[test]
    fn test_truncate_history() {
        let mut task = Task::new("t", "c");
        for i in 1..=10 {
            task.add_history_message(Message::user(format!("m{}", i)));
        }

        let mut all = task.clone();
        all.truncate_history(0);
        assert_eq!(all.history.len(), 10);

        task.truncate_history(3);
        let texts: Vec<_> = task.history.iter().map(|m| m.get_text()).collect();
        assert_eq!(texts, vec!["m8", "m9", "m10"]);
    }

    #[test]
    fn test_result_classification() {
        let task = serde_json::to_value(Task::new("t-1", "c-1")).unwrap();
        let result = SendMessageResult::from_value(task).unwrap();
        assert!(result.is_task());

        let message = serde_json::to_value(Message::agent("hi")).unwrap();
        let result = SendMessageResult::from_value(message).unwrap();
        assert!(result.is_message());
        assert_eq!(result.as_message().unwrap().get_text(), "hi");
    }

    #[test]
    fn test_explicit_kind_wins_over_status_marker() {
        let value = json!({
            "kind": "message",
            "messageId": "m-1",
            "role": "agent",
            "parts": [{"kind": "text", "text": "status report"}],
            "status": {"state": "completed"}
        });
        assert!(!SendMessageResult::looks_like_task(&value));
        assert!(SendMessageResult::from_value(value).unwrap().is_message());
    }
}
