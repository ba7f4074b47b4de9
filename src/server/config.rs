//! Server-side configuration

use crate::service::core::AGENT_CARD_PATH;

/// Default key namespace of [`SharedStoreConfig`]
pub const DEFAULT_KEY_PREFIX: &str = "taskstore";

/// Default per-context history cap of [`SharedStoreConfig`]
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Routing configuration of the JSON-RPC HTTP endpoint
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Public base URL of the agent, published in the agent card
    pub base_url: String,

    /// Path JSON-RPC requests are accepted on
    pub rpc_path: String,

    /// Path the agent card is served from
    pub agent_card_path: String,
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            rpc_path: "/".to_string(),
            agent_card_path: AGENT_CARD_PATH.to_string(),
        }
    }

    /// Accept JSON-RPC requests on `path`
    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.rpc_path = path.into();
        self
    }

    /// Serve the agent card from `path`
    pub fn with_agent_card_path(mut self, path: impl Into<String>) -> Self {
        self.agent_card_path = path.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// Key layout of [`SharedTaskStore`](crate::server::store::SharedTaskStore)
#[derive(Debug, Clone)]
pub struct SharedStoreConfig {
    /// Namespace prepended to every key
    pub key_prefix: String,

    /// Maximum number of messages retained per context history list
    pub history_limit: usize,
}

impl SharedStoreConfig {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap each history list at `limit` messages; a limit of 0 keeps one
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Key of the task record for `task_id`
    pub fn task_key(&self, task_id: &str) -> String {
        format!("{}:task:{}", self.key_prefix, task_id)
    }

    /// Key of the history list for `context_id`
    pub fn history_key(&self, context_id: &str) -> String {
        format!("{}:history:{}", self.key_prefix, context_id)
    }
}

impl Default for SharedStoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}
