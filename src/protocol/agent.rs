//! Agent discovery and capability types

use serde::{Deserialize, Serialize};

/// Protocol version advertised by default
pub const DEFAULT_PROTOCOL_VERSION: &str = "0.3.0";

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent-card.json` and describes
/// the agent's identity, capabilities and skills. Missing members decode to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: String,

    /// Endpoint the agent serves JSON-RPC on
    pub url: String,

    /// Agent version
    pub version: String,

    pub protocol_version: String,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    pub default_input_modes: Vec<String>,

    pub default_output_modes: Vec<String>,

    pub skills: Vec<AgentSkill>,

    pub preferred_transport: AgentTransport,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// URL to agent documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
}

impl Default for AgentCard {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            url: String::new(),
            version: String::new(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            skills: Vec::new(),
            preferred_transport: AgentTransport::default(),
            icon_url: None,
            documentation_url: None,
            provider: None,
        }
    }
}

impl AgentCard {
    /// Create a new agent card
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Card served when no agent supplies its own
    pub fn placeholder(url: impl Into<String>) -> Self {
        Self::new("Unknown Agent", "No description available", url, "1.0.0")
    }

    /// Set the agent capabilities
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Add a skill
    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Set the default input modes
    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    /// Set the default output modes
    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    pub fn with_preferred_transport(mut self, transport: AgentTransport) -> Self {
        self.preferred_transport = transport;
        self
    }

    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn with_provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// Agent capabilities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCapabilities {
    /// Supports streaming responses
    pub streaming: bool,

    /// Supports push notifications via webhooks
    pub push_notifications: bool,

    /// Supports task management (get, cancel)
    pub task_management: bool,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            streaming: false,
            push_notifications: false,
            task_management: true,
        }
    }
}

impl AgentCapabilities {
    /// Create capabilities with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable streaming
    pub fn with_streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Enable push notifications
    pub fn with_push_notifications(mut self) -> Self {
        self.push_notifications = true;
        self
    }

    /// Disable task management
    pub fn without_task_management(mut self) -> Self {
        self.task_management = false;
        self
    }
}

/// A capability the agent advertises
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSkill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub description: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub input_modes: Vec<String>,

    pub output_modes: Vec<String>,
}

impl AgentSkill {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_modes: vec!["text".to_string()],
            output_modes: vec!["text".to_string()],
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.input_modes = modes;
        self
    }

    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.output_modes = modes;
        self
    }
}

/// Organization operating the agent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentProvider {
    pub name: String,

    pub organization: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AgentProvider {
    pub fn new(name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            organization: organization.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Transport binding an agent prefers
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgentTransport {
    #[default]
    #[serde(rename = "JSONRPC", alias = "jsonrpc")]
    JsonRpc,

    #[serde(rename = "HTTP+JSON", alias = "http")]
    Http,
}
