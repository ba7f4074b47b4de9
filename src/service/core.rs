//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;

use crate::{
    codec::{
        jsonrpc::JsonRpcResponse,
        sse::{SseCodec, EVENT_STREAM_CONTENT_TYPE},
        Codec,
    },
    protocol::{error::A2AError, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Path agent cards are published under
pub const AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Core A2A protocol service that wraps a transport
///
/// JSON-RPC operations are POSTed to the RPC path (the base URL itself by default);
/// agent discovery GETs the well-known card path.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
    rpc_path: String,
    card_path: String,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self {
            transport,
            codec,
            rpc_path: String::new(),
            card_path: AGENT_CARD_PATH.to_string(),
        }
    }

    /// Post JSON-RPC requests to `path` instead of the base URL
    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.rpc_path = path.into();
        self
    }

    /// Fetch the agent card from `path` instead of the well-known location
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.card_path = path.into();
        self
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
        rpc_path: &str,
        card_path: &str,
    ) -> Result<TransportRequest, A2AError> {
        let method = req.operation.http_method();

        let mut transport_req = match req.operation {
            A2AOperation::DiscoverAgent => {
                TransportRequest::new(card_path, method).header("Accept", "application/json")
            }
            _ => {
                let accept = if req.operation.is_streaming() {
                    EVENT_STREAM_CONTENT_TYPE
                } else {
                    codec.content_type()
                };
                TransportRequest::new(rpc_path, method)
                    .header("Content-Type", codec.content_type())
                    .header("Accept", accept)
                    .body(codec.encode_request(&req.operation)?)
            }
        };

        // Add authentication headers if present
        if let Some(auth) = &req.context.auth {
            let (header, value) = auth.to_header();
            transport_req = transport_req.header(header, value);
        }

        // Caller-supplied headers
        for (key, value) in &req.context.headers {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        Ok(transport_req)
    }

    /// Parse a transport response into an A2A response
    async fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        // Check for error status codes
        if !transport_resp.is_success() {
            return Err(Self::handle_error_response(&transport_resp, operation));
        }

        let is_event_stream = transport_resp
            .header_value("content-type")
            .is_some_and(|ct| ct.starts_with(EVENT_STREAM_CONTENT_TYPE));

        if operation.is_streaming() || is_event_stream {
            let events = SseCodec::new().parse_body(transport_resp.body).await?;
            return Ok(A2AResponse::Events(events));
        }

        codec.decode_response(&transport_resp.body, operation)
    }

    /// Handle error responses from the transport
    fn handle_error_response(transport_resp: &TransportResponse, operation: &A2AOperation) -> A2AError {
        // Agents may answer a JSON-RPC error with a non-2xx status
        if let Ok(envelope) = JsonRpcResponse::from_slice(&transport_resp.body) {
            if let Some(error) = envelope.error() {
                return error.clone().into();
            }
        }

        match operation {
            A2AOperation::DiscoverAgent => A2AError::Internal(format!(
                "Failed to fetch agent card: HTTP {}",
                transport_resp.status
            )),
            _ => A2AError::Transport(format!(
                "HTTP request failed with status {}",
                transport_resp.status
            )),
        }
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();
        let rpc_path = self.rpc_path.clone();
        let card_path = self.card_path.clone();

        Box::pin(async move {
            tracing::debug!(method = req.method(), agent = %req.context.agent_url, "a2a request");

            // Convert A2A request to transport request
            let transport_req =
                Self::build_transport_request(&req, codec.as_ref(), &rpc_path, &card_path)?;

            // Execute via transport, bounded by the per-request timeout
            let transport_resp = match req.context.timeout {
                Some(timeout) => tokio::time::timeout(timeout, transport.execute(transport_req))
                    .await
                    .map_err(|_| A2AError::Timeout)??,
                None => transport.execute(transport_req).await?,
            };

            // Parse transport response to A2A response
            Self::parse_transport_response(transport_resp, codec.as_ref(), &req.operation).await
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
            rpc_path: self.rpc_path.clone(),
            card_path: self.card_path.clone(),
        }
    }
}
