//! High-level A2A agent client

use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    protocol::{
        A2AError, A2AOperation, AgentCard, Message, MessageSendParams, SendMessageResult, Task,
        TaskIdParams, TaskPushNotificationConfig, TaskQueryParams,
    },
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides convenient methods for common A2A operations.
/// The service is generic over any implementation that satisfies the Service trait bounds.
///
/// # Example
///
/// ```rust,no_run
/// use tower_a2a_tasks::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let url = "https://agent.example.com".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// match client.send_text("Hello, agent!").await? {
///     SendMessageResult::Task(task) => println!("Task created: {}", task.id),
///     SendMessageResult::Message(reply) => println!("Reply: {}", reply.get_text()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request context from the client configuration
    fn build_context(&self) -> RequestContext {
        RequestContext {
            agent_url: self.config.agent_url.clone(),
            auth: None, // Set by AuthLayer
            timeout: Some(self.config.timeout),
            headers: Default::default(),
        }
    }

    async fn execute(&mut self, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = A2ARequest::new(operation, self.build_context());
        std::future::poll_fn(|cx| self.service.poll_ready(cx)).await?;
        self.service.call(request).await
    }

    /// Send a message to the agent
    ///
    /// # Arguments
    ///
    /// * `params` - The message and its routing parameters
    ///
    /// # Returns
    ///
    /// Either the task tracking the work or the agent's direct reply
    ///
    /// # Errors
    ///
    /// Returns an error if the message fails to send or the agent answers with a JSON-RPC error
    pub async fn send_message(
        &mut self,
        params: MessageSendParams,
    ) -> Result<SendMessageResult, A2AError> {
        let response = self
            .execute(A2AOperation::SendMessage {
                params,
                stream: false,
            })
            .await?;

        response.into_send_result().ok_or_else(|| {
            A2AError::Internal("Expected task or message response from send_message".into())
        })
    }

    /// Send a single user text message
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<SendMessageResult, A2AError> {
        self.send_message(MessageSendParams::new(Message::user(text)))
            .await
    }

    /// Send a message in a specific context for multi-turn conversations
    ///
    /// # Arguments
    ///
    /// * `message` - The message to send
    /// * `context_id` - The context ID for grouping related messages
    pub async fn send_message_in_context(
        &mut self,
        message: Message,
        context_id: impl Into<String>,
    ) -> Result<SendMessageResult, A2AError> {
        self.send_message(MessageSendParams::new(message).with_context_id(context_id))
            .await
    }

    /// Send a message with streaming enabled
    ///
    /// The agent answers with an event stream; the events are collected and returned in
    /// arrival order.
    pub async fn send_message_streaming(
        &mut self,
        params: MessageSendParams,
    ) -> Result<Vec<SendMessageResult>, A2AError> {
        let response = self
            .execute(A2AOperation::SendMessage {
                params,
                stream: true,
            })
            .await?;

        let events = response.into_events().ok_or_else(|| {
            A2AError::Internal("Expected event stream from send_message_streaming".into())
        })?;
        events.into_iter().map(|event| event.into_result()).collect()
    }

    /// Get a task by ID
    ///
    /// # Arguments
    ///
    /// * `task_id` - The unique identifier of the task to retrieve
    /// * `history_length` - How many trailing history messages to include
    ///
    /// # Returns
    ///
    /// The task with the specified ID
    ///
    /// # Errors
    ///
    /// Returns a remote error with code -32001 if the task doesn't exist
    pub async fn get_task(
        &mut self,
        task_id: impl Into<String>,
        history_length: Option<i32>,
    ) -> Result<Task, A2AError> {
        let mut params = TaskQueryParams::new(task_id);
        params.history_length = history_length;

        let response = self.execute(A2AOperation::GetTask(params)).await?;
        response
            .into_task()
            .ok_or_else(|| A2AError::Internal("Expected task response from get_task".into()))
    }

    /// Cancel a task by ID
    ///
    /// # Arguments
    ///
    /// * `task_id` - The unique identifier of the task to cancel
    ///
    /// # Returns
    ///
    /// The updated task with canceled status
    pub async fn cancel_task(&mut self, task_id: impl Into<String>) -> Result<Task, A2AError> {
        let response = self
            .execute(A2AOperation::CancelTask(TaskIdParams::new(task_id)))
            .await?;
        response
            .into_task()
            .ok_or_else(|| A2AError::Internal("Expected task response from cancel_task".into()))
    }

    /// Re-attach to a task's event stream
    ///
    /// Returns the task snapshots the agent emitted.
    pub async fn resubscribe(&mut self, task_id: impl Into<String>) -> Result<Vec<Task>, A2AError> {
        let response = self
            .execute(A2AOperation::Resubscribe(TaskIdParams::new(task_id)))
            .await?;

        let events = response.into_events().ok_or_else(|| {
            A2AError::Internal("Expected event stream from resubscribe".into())
        })?;
        events.into_iter().map(|event| event.into_task()).collect()
    }

    /// Register a push notification target for a task
    pub async fn set_push_notification_config(
        &mut self,
        config: TaskPushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig, A2AError> {
        let response = self
            .execute(A2AOperation::SetPushNotificationConfig(config))
            .await?;
        response.into_push_notification_config().ok_or_else(|| {
            A2AError::Internal("Expected push notification config response".into())
        })
    }

    /// Fetch the push notification target of a task
    pub async fn get_push_notification_config(
        &mut self,
        task_id: impl Into<String>,
    ) -> Result<TaskPushNotificationConfig, A2AError> {
        let response = self
            .execute(A2AOperation::GetPushNotificationConfig(TaskIdParams::new(
                task_id,
            )))
            .await?;
        response.into_push_notification_config().ok_or_else(|| {
            A2AError::Internal("Expected push notification config response".into())
        })
    }

    /// Discover agent capabilities by fetching the Agent Card
    ///
    /// This retrieves the agent's metadata from `/.well-known/agent-card.json`
    ///
    /// # Returns
    ///
    /// The agent's capability card
    pub async fn discover(&mut self) -> Result<AgentCard, A2AError> {
        let response = self.execute(A2AOperation::DiscoverAgent).await?;
        response.into_agent_card().ok_or_else(|| {
            A2AError::Internal("Expected agent card response from discover".into())
        })
    }

    /// Poll a task until it reaches a terminal state
    ///
    /// This is a convenience method that repeatedly calls get_task until
    /// the task is completed, failed, canceled, or rejected.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task ID to poll
    /// * `poll_interval_ms` - How often to poll (in milliseconds)
    /// * `max_attempts` - Maximum number of polling attempts (0 = unlimited)
    ///
    /// # Returns
    ///
    /// The final task state
    pub async fn poll_until_complete(
        &mut self,
        task_id: impl Into<String>,
        poll_interval_ms: u64,
        max_attempts: usize,
    ) -> Result<Task, A2AError> {
        let task_id = task_id.into();
        let mut attempts = 0;

        loop {
            let task = self.get_task(task_id.clone(), None).await?;

            if task.is_terminal() {
                return Ok(task);
            }

            attempts += 1;
            if max_attempts > 0 && attempts >= max_attempts {
                return Err(A2AError::Timeout);
            }

            tokio::time::sleep(tokio::time::Duration::from_millis(poll_interval_ms)).await;
        }
    }
}
