//! # Tower A2A Tasks
//!
//! A Tower-based implementation of the Agent2Agent (A2A) protocol covering both sides of
//! the wire.
//!
//! On the client side, operations flow through a composable Tower stack
//! (`AuthLayer -> A2AValidationLayer -> A2AProtocolService`) over a pluggable transport,
//! using the JSON-RPC 2.0 binding. On the agent side, a [`TaskManager`](server::TaskManager)
//! drives the task lifecycle on top of a [`TaskStore`](server::TaskStore) and is exposed
//! over HTTP by [`A2AHttpService`](server::A2AHttpService).
//!
//! ## Features
//!
//! - **Message & task model**: text, file and data parts, task lifecycle with terminal states
//! - **JSON-RPC envelope**: the ten protocol error codes, lenient id handling
//! - **Task stores**: in-memory, or shared through any key/list backend
//! - **Composable middleware**: auth and validation as Tower layers
//!
//! ## Example
//!
//! ```rust,no_run
//! use tower_a2a_tasks::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://agent.example.com".parse().unwrap();
//!     let mut client = A2AClientBuilder::new_http(url)
//!         .with_bearer_auth("token123".to_string())
//!         .with_timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let agent_card = client.discover().await?;
//!     println!("Connected to: {}", agent_card.name);
//!
//!     let reply = client.send_text("What is 2 + 2?").await?;
//!     if let Some(task) = reply.as_task() {
//!         let done = client.poll_until_complete(&task.id, 500, 20).await?;
//!         println!("Task finished as {}", done.state());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod id;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClient, A2AClientBuilder, AgentClient, CardResolver, ClientConfig},
        codec::{JsonRpcError, JsonRpcRequest, JsonRpcResponse},
        protocol::error::{A2AError, A2AResult, ErrorCode},
        protocol::{
            AgentCapabilities, AgentCard, AgentSkill, Artifact, Message, MessageSendParams, Part,
            Role, SendMessageResult, Task, TaskState, TaskStatus,
        },
        server::{
            A2AHttpService, AgentHandler, InMemoryTaskStore, ServerConfig, SharedTaskStore,
            TaskManager, TaskStore,
        },
    };
}
