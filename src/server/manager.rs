//! Task lifecycle management on top of a [`TaskStore`]
//!
//! The manager enforces the lifecycle rules (terminal states are final, tasks referenced
//! by a message must exist) and forwards incoming messages to the application's
//! [`AgentHandler`]. The store write is the commit point of every operation: handler
//! hooks run afterwards and cannot roll it back.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    id::{IdGenerator, UuidGenerator},
    protocol::{
        A2AError, A2AResult, AgentCard, Artifact, Message, MessageSendParams, SendMessageResult,
        Task, TaskState,
    },
    server::store::{InMemoryTaskStore, TaskStore},
};

/// Application logic behind an agent
///
/// Only [`on_message_received`](AgentHandler::on_message_received) is required. The
/// lifecycle hooks are notifications and default to doing nothing.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    /// Process an incoming message, answering with a task or a direct message
    async fn on_message_received(&self, params: &MessageSendParams) -> A2AResult<SendMessageResult>;

    async fn on_task_created(&self, _task: &Task) {}

    async fn on_task_updated(&self, _task: &Task) {}

    async fn on_task_cancelled(&self, _task: &Task) {}

    /// Card describing this agent; `None` publishes a placeholder card
    fn agent_card(&self, _base_url: &str) -> Option<AgentCard> {
        None
    }
}

/// Receiver of streamed results
#[async_trait]
pub trait EventSink: Send {
    async fn send(&mut self, event: SendMessageResult) -> A2AResult<()>;
}

#[async_trait]
impl EventSink for Vec<SendMessageResult> {
    async fn send(&mut self, event: SendMessageResult) -> A2AResult<()> {
        self.push(event);
        Ok(())
    }
}

/// Coordinates task state, the store and the agent handler
///
/// # Example
///
/// ```rust
/// use tower_a2a_tasks::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let manager = TaskManager::in_memory();
///
/// let task = manager.create_task(None, None).await;
/// let canceled = manager.cancel_task(&task.id).await?;
/// assert_eq!(canceled.state(), TaskState::Canceled);
///
/// // Terminal tasks cannot be canceled again
/// assert!(manager.cancel_task(&task.id).await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
    handler: Option<Arc<dyn AgentHandler>>,
    ids: Arc<dyn IdGenerator>,
}

impl TaskManager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            handler: None,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Manager over a fresh [`InMemoryTaskStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTaskStore::new()))
    }

    /// Route incoming messages to `handler`
    pub fn with_handler(mut self, handler: Arc<dyn AgentHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Use `ids` for generated task and context ids
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Check preconditions of a send and record the message on its task
    async fn prepare_send(&self, params: &MessageSendParams) -> A2AResult<Arc<dyn AgentHandler>> {
        let handler = self
            .handler
            .clone()
            .ok_or_else(|| A2AError::Internal("No agent handler configured".into()))?;

        let task_id = params
            .message
            .task_id
            .as_deref()
            .or(params.task_id.as_deref());

        if let Some(task_id) = task_id {
            if !self.store.task_exists(task_id).await {
                return Err(A2AError::TaskNotFound {
                    task_id: task_id.to_string(),
                });
            }
            self.store
                .add_history_message(task_id, params.message.clone())
                .await;
        }

        Ok(handler)
    }

    /// Deliver a message to the handler and return its answer unchanged
    ///
    /// # Errors
    ///
    /// - `Internal` when no handler is configured
    /// - `TaskNotFound` when the message references an unknown task
    /// - whatever the handler fails with
    pub async fn send_message(&self, params: MessageSendParams) -> A2AResult<SendMessageResult> {
        tracing::debug!(
            message_id = %params.message.message_id,
            context_id = ?params.message.context_id,
            "message received"
        );

        let handler = self.prepare_send(&params).await?;
        handler.on_message_received(&params).await
    }

    /// Streaming variant of [`send_message`](Self::send_message)
    ///
    /// The handler runs once and its answer is emitted as a single event.
    pub async fn send_message_streaming(
        &self,
        params: MessageSendParams,
        sink: &mut dyn EventSink,
    ) -> A2AResult<()> {
        tracing::debug!(message_id = %params.message.message_id, "streaming message received");

        let handler = self.prepare_send(&params).await?;
        let result = handler.on_message_received(&params).await?;
        sink.send(result).await
    }

    /// Create and store a submitted task, generating missing ids
    pub async fn create_task(&self, context_id: Option<String>, task_id: Option<String>) -> Task {
        let task_id = task_id.unwrap_or_else(|| self.ids.next_id("task"));
        let context_id = context_id.unwrap_or_else(|| self.ids.next_id("ctx"));

        let task = Task::new(task_id, context_id);
        self.store.set_task(&task).await;
        tracing::debug!(task_id = %task.id, context_id = %task.context_id, "task created");

        if let Some(handler) = &self.handler {
            handler.on_task_created(&task).await;
        }
        task
    }

    /// Fetch a task
    ///
    /// # Errors
    ///
    /// `TaskNotFound` when no task has the given id
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.store
            .get_task(task_id)
            .await
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// Fetch a task, keeping only the last `history_length` history messages
    pub async fn get_task_with_history(
        &self,
        task_id: &str,
        history_length: Option<i32>,
    ) -> A2AResult<Task> {
        let mut task = self.get_task(task_id).await?;
        if let Some(length) = history_length {
            task.truncate_history(length);
        }
        Ok(task)
    }

    /// Move a non-terminal task to `Canceled`
    ///
    /// # Errors
    ///
    /// - `TaskNotFound` when no task has the given id
    /// - `TaskNotCancelable` when the task already reached a terminal state
    pub async fn cancel_task(&self, task_id: &str) -> A2AResult<Task> {
        let task = self.get_task(task_id).await?;
        if task.is_terminal() {
            return Err(A2AError::TaskNotCancelable {
                task_id: task_id.to_string(),
            });
        }

        self.store
            .update_status(task_id, TaskState::Canceled, "")
            .await;
        let task = self.get_task(task_id).await?;
        tracing::debug!(task_id, "task canceled");

        if let Some(handler) = &self.handler {
            handler.on_task_cancelled(&task).await;
        }
        Ok(task)
    }

    /// Record a status change, appending `message` to the history when given
    ///
    /// Unknown tasks yield `TaskNotFound` before anything is written. The message goes to
    /// the history only; the status carries no note.
    pub async fn update_status(
        &self,
        task_id: &str,
        state: TaskState,
        message: Option<&Message>,
    ) -> A2AResult<Task> {
        if !self.store.task_exists(task_id).await {
            return Err(A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            });
        }

        if let Some(message) = message {
            self.store
                .add_history_message(task_id, message.clone())
                .await;
        }
        self.store.update_status(task_id, state, "").await;

        let task = self.get_task(task_id).await?;
        tracing::debug!(task_id, state = %state, "task status updated");

        if let Some(handler) = &self.handler {
            handler.on_task_updated(&task).await;
        }
        Ok(task)
    }

    /// Attach an artifact to a task
    pub async fn return_artifact(&self, task_id: &str, artifact: Artifact) -> A2AResult<Task> {
        self.store.add_artifact(task_id, artifact).await;

        let task = self.get_task(task_id).await?;
        tracing::debug!(task_id, artifacts = task.artifacts.len(), "artifact added");

        if let Some(handler) = &self.handler {
            handler.on_task_updated(&task).await;
        }
        Ok(task)
    }

    /// Card published for this agent at `base_url`
    pub fn get_agent_card(&self, base_url: &str) -> AgentCard {
        self.handler
            .as_ref()
            .and_then(|handler| handler.agent_card(base_url))
            .unwrap_or_else(|| AgentCard::placeholder(base_url))
    }
}

impl std::fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskManager")
            .field("has_handler", &self.handler.is_some())
            .field("ids", &self.ids)
            .finish()
    }
}
