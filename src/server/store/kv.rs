//! Key/value and list capability backing the shared task store
//!
//! The command set mirrors the subset of Redis the shared store needs: plain string
//! records plus right-pushed lists addressed with inclusive, possibly negative indexes.
//! Each command is atomic on its own; sequences of commands are not.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Failure reported by a [`KeyValueStore`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KvError {
    /// The backend could not be reached or refused the command
    #[error("key/value backend unavailable: {0}")]
    Unavailable(String),

    /// A string command was issued against a list key or the other way round
    #[error("wrong kind of value held at key {0}")]
    WrongType(String),
}

/// Minimal key/value and list store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a string record
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write a string record, replacing whatever the key held
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    async fn exists(&self, key: &str) -> Result<bool, KvError>;

    /// Remove a key of any kind, returning whether it existed
    async fn del(&self, key: &str) -> Result<bool, KvError>;

    /// Append to the tail of a list, creating it when absent; returns the new length
    async fn rpush(&self, key: &str, value: &str) -> Result<usize, KvError>;

    /// Keep only the elements between `start` and `stop`, inclusive
    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), KvError>;

    /// Elements between `start` and `stop`, inclusive
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, KvError>;
}

/// Resolve an inclusive, possibly negative index range against a list of `len`
/// elements; `None` when the range selects nothing
pub(crate) fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[derive(Debug, Default)]
struct KvState {
    values: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
}

/// Process-local [`KeyValueStore`]
///
/// Clones share the same underlying data, so several task stores built from clones of
/// one instance observe each other's writes the way separate processes sharing one
/// external server would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    state: Arc<Mutex<KvState>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let state = self.state.lock().await;
        if state.lists.contains_key(key) {
            return Err(KvError::WrongType(key.to_string()));
        }
        Ok(state.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut state = self.state.lock().await;
        state.lists.remove(key);
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, KvError> {
        let state = self.state.lock().await;
        Ok(state.values.contains_key(key) || state.lists.contains_key(key))
    }

    async fn del(&self, key: &str) -> Result<bool, KvError> {
        let mut state = self.state.lock().await;
        let removed_value = state.values.remove(key).is_some();
        let removed_list = state.lists.remove(key).is_some();
        Ok(removed_value || removed_list)
    }

    async fn rpush(&self, key: &str, value: &str) -> Result<usize, KvError> {
        let mut state = self.state.lock().await;
        if state.values.contains_key(key) {
            return Err(KvError::WrongType(key.to_string()));
        }
        let list = state.lists.entry(key.to_string()).or_default();
        list.push(value.to_string());
        Ok(list.len())
    }

    async fn ltrim(&self, key: &str, start: i64, stop: i64) -> Result<(), KvError> {
        let mut state = self.state.lock().await;
        if state.values.contains_key(key) {
            return Err(KvError::WrongType(key.to_string()));
        }
        let Some(list) = state.lists.get_mut(key) else {
            return Ok(());
        };

        match resolve_range(list.len(), start, stop) {
            Some((from, to)) => {
                list.truncate(to + 1);
                list.drain(..from);
            }
            None => {
                state.lists.remove(key);
            }
        }
        Ok(())
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, KvError> {
        let state = self.state.lock().await;
        if state.values.contains_key(key) {
            return Err(KvError::WrongType(key.to_string()));
        }
        let Some(list) = state.lists.get(key) else {
            return Ok(Vec::new());
        };

        Ok(match resolve_range(list.len(), start, stop) {
            Some((from, to)) => list[from..=to].to_vec(),
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve_range(5, 0, -1), Some((0, 4)));
        assert_eq!(resolve_range(5, -3, -1), Some((2, 4)));
        assert_eq!(resolve_range(5, -10, -1), Some((0, 4)));
        assert_eq!(resolve_range(5, 1, 100), Some((1, 4)));
        assert_eq!(resolve_range(5, 3, 1), None);
        assert_eq!(resolve_range(5, 5, 9), None);
        assert_eq!(resolve_range(0, 0, -1), None);
    }

    #[tokio::test]
    async fn test_string_records() {
        let kv = InMemoryKeyValueStore::new();

        assert_eq!(kv.get("k").await, Ok(None));
        kv.set("k", "v1").await.unwrap();
        kv.set("k", "v2").await.unwrap();
        assert_eq!(kv.get("k").await, Ok(Some("v2".to_string())));
        assert_eq!(kv.exists("k").await, Ok(true));

        assert_eq!(kv.del("k").await, Ok(true));
        assert_eq!(kv.del("k").await, Ok(false));
        assert_eq!(kv.exists("k").await, Ok(false));
    }

    #[tokio::test]
    async fn test_list_push_trim_range() {
        let kv = InMemoryKeyValueStore::new();
        for i in 1..=5 {
            assert_eq!(kv.rpush("l", &i.to_string()).await, Ok(i));
        }

        kv.ltrim("l", -3, -1).await.unwrap();
        assert_eq!(kv.lrange("l", 0, -1).await.unwrap(), vec!["3", "4", "5"]);
        assert_eq!(kv.lrange("l", -2, -1).await.unwrap(), vec!["4", "5"]);
        assert!(kv.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type() {
        let kv = InMemoryKeyValueStore::new();
        kv.set("s", "v").await.unwrap();
        kv.rpush("l", "x").await.unwrap();

        assert_eq!(kv.rpush("s", "x").await, Err(KvError::WrongType("s".into())));
        assert_eq!(kv.get("l").await, Err(KvError::WrongType("l".into())));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let a = InMemoryKeyValueStore::new();
        let b = a.clone();

        a.set("k", "v").await.unwrap();
        assert_eq!(b.get("k").await, Ok(Some("v".to_string())));
    }
}
