//! Requests flowing through the client Tower stack

use std::{collections::HashMap, time::Duration};

use crate::{layer::auth::AuthCredentials, protocol::operation::A2AOperation};

/// Timeout applied when a caller does not pick one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One A2A operation plus everything the stack needs to put it on the wire
#[derive(Debug, Clone)]
pub struct A2ARequest {
    pub operation: A2AOperation,
    pub context: RequestContext,
}

impl A2ARequest {
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }

    /// JSON-RPC method name, used for tracing
    pub fn method(&self) -> &'static str {
        self.operation.rpc_method().unwrap_or("agent/card")
    }
}

/// Per-request settings filled in by the client and its layers
///
/// `auth` is normally left empty by the caller and set by
/// [`AuthLayer`](crate::layer::AuthLayer).
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Base URL of the target agent
    pub agent_url: String,

    pub auth: Option<AuthCredentials>,

    /// `None` waits for as long as the transport does
    pub timeout: Option<Duration>,

    /// Extra HTTP headers sent verbatim
    pub headers: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            auth: None,
            timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            headers: HashMap::new(),
        }
    }

    pub fn with_auth(mut self, auth: AuthCredentials) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("")
    }
}
