//! Task persistence
//!
//! [`TaskStore`] is the seam between the task manager and its storage backend. Two
//! backends ship with the crate:
//!
//! - [`InMemoryTaskStore`]: a single map behind one lock, scoped to one process
//! - [`SharedTaskStore`]: tasks and histories laid out over a [`KeyValueStore`], so
//!   several processes can share state through an external key/list service
//!
//! Store operations never fail from the caller's point of view. Missing tasks read as
//! `None` and writes against them are no-ops; backend faults are logged and degraded
//! inside the backend.

pub mod kv;
pub mod memory;
pub mod shared;

use async_trait::async_trait;

pub use kv::{InMemoryKeyValueStore, KeyValueStore, KvError};
pub use memory::InMemoryTaskStore;
pub use shared::SharedTaskStore;

use crate::protocol::{Artifact, Message, Task, TaskState};

/// Storage backend for tasks and conversation history
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch a task snapshot; absent tasks are never created implicitly
    async fn get_task(&self, task_id: &str) -> Option<Task>;

    /// Insert or fully replace a task
    async fn set_task(&self, task: &Task);

    async fn task_exists(&self, task_id: &str) -> bool;

    /// Remove a task, returning whether it existed
    async fn delete_task(&self, task_id: &str) -> bool;

    /// Replace the status of a task, leaving everything else untouched
    ///
    /// An empty `message` records no status note.
    async fn update_status(&self, task_id: &str, state: TaskState, message: &str);

    /// Append an artifact to a task
    async fn add_artifact(&self, task_id: &str, artifact: Artifact);

    /// Append a message to the history kept for `task_id`
    async fn add_history_message(&self, task_id: &str, message: Message);

    /// The last `max_length` messages recorded for `context_id`, oldest first
    ///
    /// A `max_length` of zero or less returns the whole history.
    async fn get_history(&self, context_id: &str, max_length: i32) -> Vec<Message>;
}
