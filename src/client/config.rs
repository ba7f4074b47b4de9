//! Client configuration

use std::time::Duration;

use crate::service::core::AGENT_CARD_PATH;

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent
    pub agent_url: String,

    /// Per-request timeout for the outbound HTTP call
    pub timeout: Duration,

    /// Enable response validation
    pub validate_responses: bool,

    /// Path JSON-RPC requests are posted to, relative to the agent URL
    pub rpc_path: String,

    /// Path of the agent card, relative to the agent URL
    pub card_path: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: Duration::from_secs(30),
            validate_responses: true,
            rpc_path: String::new(),
            card_path: AGENT_CARD_PATH.to_string(),
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable response validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.rpc_path = path.into();
        self
    }

    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.card_path = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
