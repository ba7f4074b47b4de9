use async_trait::async_trait;
use thiserror::Error;

use super::{
    kv::{InMemoryKeyValueStore, KeyValueStore, KvError},
    TaskStore,
};
use crate::{
    protocol::{Artifact, Message, Task, TaskState, TaskStatus},
    server::config::SharedStoreConfig,
};

#[derive(Debug, Error)]
enum StoreError {
    #[error(transparent)]
    Kv(#[from] KvError),

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Task store laid out over a shared [`KeyValueStore`]
///
/// Each task is one JSON record under `{prefix}:task:{id}`. Histories are lists of
/// message JSON under `{prefix}:history:{id}`, capped to the most recent
/// `history_limit` entries; they are kept apart from the task record.
///
/// Status and artifact updates are read-modify-write sequences of separate commands,
/// so concurrent writers to one task can overwrite each other (last writer wins).
///
/// Backend faults never reach the caller: they are logged and the operation degrades
/// to `None`, `false`, an empty list or a no-op.
#[derive(Debug, Clone)]
pub struct SharedTaskStore<K> {
    kv: K,
    config: SharedStoreConfig,
}

impl SharedTaskStore<InMemoryKeyValueStore> {
    /// Shared store over a fresh process-local key/value store
    pub fn in_memory() -> Self {
        Self::new(InMemoryKeyValueStore::new())
    }
}

impl<K: KeyValueStore> SharedTaskStore<K> {
    pub fn new(kv: K) -> Self {
        Self::with_config(kv, SharedStoreConfig::default())
    }

    pub fn with_config(kv: K, config: SharedStoreConfig) -> Self {
        Self { kv, config }
    }

    pub fn config(&self) -> &SharedStoreConfig {
        &self.config
    }

    async fn load(&self, task_id: &str) -> Result<Option<Task>, StoreError> {
        match self.kv.get(&self.config.task_key(task_id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, task: &Task) -> Result<(), StoreError> {
        let raw = serde_json::to_string(task)?;
        self.kv.set(&self.config.task_key(&task.id), &raw).await?;
        Ok(())
    }

    async fn modify<F>(&self, task_id: &str, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Task) + Send,
    {
        if let Some(mut task) = self.load(task_id).await? {
            apply(&mut task);
            self.save(&task).await?;
        }
        Ok(())
    }

    async fn push_history(&self, task_id: &str, message: &Message) -> Result<(), StoreError> {
        let key = self.config.history_key(task_id);
        let raw = serde_json::to_string(message)?;
        let limit = i64::try_from(self.config.history_limit.max(1)).unwrap_or(i64::MAX);

        self.kv.rpush(&key, &raw).await?;
        self.kv.ltrim(&key, -limit, -1).await?;
        Ok(())
    }

    async fn read_history(&self, context_id: &str, max_length: i32) -> Result<Vec<Message>, StoreError> {
        let key = self.config.history_key(context_id);
        let start = if max_length <= 0 { 0 } else { -i64::from(max_length) };
        let raw = self.kv.lrange(&key, start, -1).await?;

        Ok(raw
            .into_iter()
            .filter_map(|blob| match serde_json::from_str(&blob) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(context_id, error = %e, "skipping malformed history entry");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl<K: KeyValueStore> TaskStore for SharedTaskStore<K> {
    async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.load(task_id).await.unwrap_or_else(|e| {
            tracing::warn!(task_id, error = %e, "get_task failed");
            None
        })
    }

    async fn set_task(&self, task: &Task) {
        if let Err(e) = self.save(task).await {
            tracing::warn!(task_id = %task.id, error = %e, "set_task failed");
        }
    }

    async fn task_exists(&self, task_id: &str) -> bool {
        self.kv
            .exists(&self.config.task_key(task_id))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(task_id, error = %e, "task_exists failed");
                false
            })
    }

    async fn delete_task(&self, task_id: &str) -> bool {
        self.kv
            .del(&self.config.task_key(task_id))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(task_id, error = %e, "delete_task failed");
                false
            })
    }

    async fn update_status(&self, task_id: &str, state: TaskState, message: &str) {
        let status = TaskStatus::new(state).with_message(message);
        if let Err(e) = self.modify(task_id, |task| task.set_status(status)).await {
            tracing::warn!(task_id, error = %e, "update_status failed");
        }
    }

    async fn add_artifact(&self, task_id: &str, artifact: Artifact) {
        if let Err(e) = self.modify(task_id, |task| task.add_artifact(artifact)).await {
            tracing::warn!(task_id, error = %e, "add_artifact failed");
        }
    }

    async fn add_history_message(&self, task_id: &str, message: Message) {
        if let Err(e) = self.push_history(task_id, &message).await {
            tracing::warn!(task_id, error = %e, "add_history_message failed");
        }
    }

    async fn get_history(&self, context_id: &str, max_length: i32) -> Vec<Message> {
        self.read_history(context_id, max_length)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(context_id, error = %e, "get_history failed");
                Vec::new()
            })
    }
}
