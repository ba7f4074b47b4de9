//! Credential injection for outbound A2A requests

use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use base64::{engine::general_purpose, Engine as _};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
};

const AUTHORIZATION: &str = "Authorization";

/// Credentials presented to the remote agent
///
/// The `Debug` output never contains the secret itself.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthCredentials {
    /// `Authorization: Bearer <token>`
    Bearer(String),

    /// The key sent as-is in a custom header
    ApiKey { key: String, header: String },

    /// `Authorization: Basic <base64(user:pass)>`
    Basic { username: String, password: String },
}

impl AuthCredentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            header: header.into(),
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn header_name(&self) -> &str {
        match self {
            AuthCredentials::ApiKey { header, .. } => header,
            AuthCredentials::Bearer(_) | AuthCredentials::Basic { .. } => AUTHORIZATION,
        }
    }

    /// Header name and value carrying these credentials
    pub fn to_header(&self) -> (String, String) {
        let value = match self {
            AuthCredentials::Bearer(token) => format!("Bearer {}", token),
            AuthCredentials::ApiKey { key, .. } => key.clone(),
            AuthCredentials::Basic { username, password } => {
                let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
                format!("Basic {}", encoded)
            }
        };
        (self.header_name().to_string(), value)
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthCredentials::Bearer(_) => f.write_str("Bearer(***)"),
            AuthCredentials::ApiKey { header, .. } => {
                f.debug_struct("ApiKey").field("header", header).finish_non_exhaustive()
            }
            AuthCredentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// Stamps every request with a fixed set of credentials
///
/// A request that already carries credentials in its
/// [`RequestContext`](crate::service::RequestContext) keeps them.
#[derive(Debug, Clone)]
pub struct AuthLayer {
    credentials: AuthCredentials,
}

impl AuthLayer {
    pub fn new(credentials: AuthCredentials) -> Self {
        Self { credentials }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(AuthCredentials::bearer(token))
    }

    pub fn api_key(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self::new(AuthCredentials::api_key(key, header))
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            credentials: self.credentials.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthService<S> {
    inner: S,
    credentials: AuthCredentials,
}

impl<S> Service<A2ARequest> for AuthService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: A2ARequest) -> Self::Future {
        if req.context.auth.is_none() {
            req.context.auth = Some(self.credentials.clone());
        }

        // Call the instance that was polled ready; keep the fresh clone for next time.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
