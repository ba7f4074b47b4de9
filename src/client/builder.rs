//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::util::BoxCloneService;
use tower_layer::Layer;
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec},
    layer::{A2AValidationLayer, AuthCredentials, AuthLayer},
    protocol::A2AError,
    service::{A2AProtocolService, A2ARequest, A2AResponse},
    transport::{HttpTransport, Transport},
};

/// Type-erased client service stack produced by [`A2AClientBuilder::build`]
pub type A2AService = BoxCloneService<A2ARequest, A2AResponse, A2AError>;

/// Client over the boxed service stack
pub type A2AClient = AgentClient<A2AService>;

/// Builder for constructing A2A clients
///
/// This builder provides a fluent API for configuring and building an A2A client
/// with customizable transport, authentication, timeouts, and validation.
///
/// # Example
///
/// ```rust,no_run
/// use tower_a2a_tasks::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "https://agent.example.com".parse().unwrap();
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_bearer_auth("token123".to_string())
///     .with_timeout(Duration::from_secs(60))
///     .build()?;
///
/// let agent_card = client.discover().await?;
/// println!("Connected to: {}", agent_card.name);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    auth: Option<AuthCredentials>,
    config: ClientConfig,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Create a builder without a transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The base URL of the agent
    pub fn new(agent_url: Url) -> Self {
        Self {
            config: ClientConfig::new(agent_url.as_str()),
            agent_url,
            transport: None,
            codec: None,
            auth: None,
        }
    }

    /// Use a custom transport
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport implementation to use
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    ///
    /// # Arguments
    ///
    /// * `codec` - The codec implementation to use
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Enable bearer token authentication
    ///
    /// # Arguments
    ///
    /// * `token` - The bearer token for authentication
    pub fn with_bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::bearer(token));
        self
    }

    /// Enable API key authentication
    ///
    /// # Arguments
    ///
    /// * `key` - The API key
    /// * `header` - The header name for the API key (e.g., "X-API-Key")
    pub fn with_api_key_auth(mut self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.auth = Some(AuthCredentials::api_key(key, header));
        self
    }

    /// Enable basic HTTP authentication
    ///
    /// # Arguments
    ///
    /// * `username` - The username
    /// * `password` - The password
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthCredentials::basic(username, password));
        self
    }

    /// Set custom authentication credentials
    pub fn with_auth(mut self, credentials: AuthCredentials) -> Self {
        self.auth = Some(credentials);
        self
    }

    /// Set the request timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration for requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Enable or disable request and response validation
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether to validate (default: true)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.config = self.config.with_validation(enabled);
        self
    }

    /// Post JSON-RPC requests to `path` relative to the agent URL
    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_rpc_path(path);
        self
    }

    /// Fetch the agent card from `path` relative to the agent URL
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_card_path(path);
        self
    }

    /// Build the A2A client
    ///
    /// This assembles the Tower stack `AuthLayer -> A2AValidationLayer -> A2AProtocolService`,
    /// skipping the layers that are not configured. No retry layer is installed: every
    /// request is sent at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<A2AClient, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Internal(
                "Transport not configured. Use new_http() or with_transport()".into(),
            )
        })?;

        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(JsonRpcCodec::new()));

        let core = A2AProtocolService::new(transport, codec)
            .with_rpc_path(self.config.rpc_path.clone())
            .with_card_path(self.config.card_path.clone());

        let mut service: A2AService = BoxCloneService::new(core);
        if self.config.validate_responses {
            service = BoxCloneService::new(A2AValidationLayer::new().layer(service));
        }
        if let Some(credentials) = self.auth {
            service = BoxCloneService::new(AuthLayer::new(credentials).layer(service));
        }

        tracing::debug!(agent_url = %self.agent_url, "built A2A client");
        Ok(AgentClient::new(service, self.config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport (JSON-RPC binding)
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The base URL of the agent (e.g., "<https://agent.example.com>")
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url)
            .with_transport(transport)
            .with_codec(Arc::new(JsonRpcCodec::new()))
    }
}
