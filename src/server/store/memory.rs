use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TaskStore;
use crate::protocol::{task::history_window_len, Artifact, Message, Task, TaskState, TaskStatus};

/// Process-local task store
///
/// Every operation takes the single lock exactly once, so operations on one instance are
/// linearizable. History lives inside each task; [`TaskStore::get_history`] reads the
/// history of the task whose id equals the requested context id.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    /// Drop every stored task
    pub async fn clear(&self) {
        self.tasks.lock().await.clear();
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.tasks.lock().await.get(task_id).cloned()
    }

    async fn set_task(&self, task: &Task) {
        self.tasks
            .lock()
            .await
            .insert(task.id.clone(), task.clone());
    }

    async fn task_exists(&self, task_id: &str) -> bool {
        self.tasks.lock().await.contains_key(task_id)
    }

    async fn delete_task(&self, task_id: &str) -> bool {
        self.tasks.lock().await.remove(task_id).is_some()
    }

    async fn update_status(&self, task_id: &str, state: TaskState, message: &str) {
        if let Some(task) = self.tasks.lock().await.get_mut(task_id) {
            task.set_status(TaskStatus::new(state).with_message(message));
        }
    }

    async fn add_artifact(&self, task_id: &str, artifact: Artifact) {
        if let Some(task) = self.tasks.lock().await.get_mut(task_id) {
            task.add_artifact(artifact);
        }
    }

    async fn add_history_message(&self, task_id: &str, message: Message) {
        if let Some(task) = self.tasks.lock().await.get_mut(task_id) {
            task.add_history_message(message);
        }
    }

    async fn get_history(&self, context_id: &str, max_length: i32) -> Vec<Message> {
        let tasks = self.tasks.lock().await;
        let Some(task) = tasks.get(context_id) else {
            return Vec::new();
        };

        let keep = history_window_len(task.history.len(), max_length);
        task.history[task.history.len() - keep..].to_vec()
    }
}
