//! HTTP binding of the JSON-RPC endpoint as a Tower service
//!
//! [`A2AHttpService`] routes `hyper` requests with fully buffered bodies. It does not own
//! a socket; plug it into any accept loop that can hand it a `Request<Bytes>`.

use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use bytes::Bytes;
use hyper::{
    header::{HeaderValue, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};
use tower_service::Service;

use crate::{
    codec::{sse::EVENT_STREAM_CONTENT_TYPE, JsonRpcResponse},
    protocol::error::ErrorCode,
    server::{
        config::ServerConfig,
        dispatcher::{DispatchOutcome, JsonRpcDispatcher},
        manager::TaskManager,
    },
};

const JSON_CONTENT_TYPE: &str = "application/json";
const A2A_JSON_CONTENT_TYPE: &str = "application/a2a+json";

/// Serves the agent card and the JSON-RPC endpoint of one agent
///
/// - `GET {agent_card_path}` answers with the agent card
/// - `POST {rpc_path}` dispatches a JSON-RPC request; streaming methods answer with
///   `text/event-stream`
/// - anything else is a 404
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use bytes::Bytes;
/// use tower::ServiceExt;
/// use tower_a2a_tasks::prelude::*;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = Arc::new(TaskManager::in_memory());
/// let service = A2AHttpService::new(manager, ServerConfig::new("http://localhost:8080"));
///
/// let request = hyper::Request::get("/.well-known/agent-card.json").body(Bytes::new())?;
/// let response = service.oneshot(request).await?;
/// assert_eq!(response.status(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct A2AHttpService {
    dispatcher: Arc<JsonRpcDispatcher>,
    config: Arc<ServerConfig>,
}

impl A2AHttpService {
    pub fn new(manager: Arc<TaskManager>, config: ServerConfig) -> Self {
        Self {
            dispatcher: Arc::new(JsonRpcDispatcher::new(manager)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let path = request.uri().path();
        tracing::debug!(method = %request.method(), path, "http request");

        if request.method() == Method::GET && path == self.config.agent_card_path {
            return self.agent_card();
        }

        if request.method() == Method::POST && same_route(path, &self.config.rpc_path) {
            if !is_json_content_type(request.headers().get(CONTENT_TYPE)) {
                let envelope = JsonRpcResponse::create_error(
                    "",
                    ErrorCode::ContentTypeNotSupported,
                    "Content type not supported: expected application/json",
                );
                return json_envelope(&envelope);
            }

            return match self.dispatcher.dispatch_bytes(request.body()).await {
                DispatchOutcome::Single(envelope) => json_envelope(&envelope),
                DispatchOutcome::Stream(frames) => respond(
                    StatusCode::OK,
                    EVENT_STREAM_CONTENT_TYPE,
                    Bytes::from(frames.concat()),
                ),
            };
        }

        respond(
            StatusCode::NOT_FOUND,
            "text/plain",
            Bytes::from_static(b"Not Found"),
        )
    }

    fn agent_card(&self) -> Response<Bytes> {
        let card = self.dispatcher.manager().get_agent_card(&self.config.base_url);
        match serde_json::to_vec(&card) {
            Ok(body) => respond(StatusCode::OK, JSON_CONTENT_TYPE, Bytes::from(body)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode agent card");
                internal_error()
            }
        }
    }
}

impl Service<Request<Bytes>> for A2AHttpService {
    type Response = Response<Bytes>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(request).await) })
    }
}

fn same_route(path: &str, route: &str) -> bool {
    path.trim_end_matches('/') == route.trim_end_matches('/')
}

/// A missing content type is accepted
fn is_json_content_type(value: Option<&HeaderValue>) -> bool {
    let Some(value) = value else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let media_type = value.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE)
        || media_type.eq_ignore_ascii_case(A2A_JSON_CONTENT_TYPE)
}

fn json_envelope(envelope: &JsonRpcResponse) -> Response<Bytes> {
    match envelope.to_json() {
        Ok(body) => respond(StatusCode::OK, JSON_CONTENT_TYPE, Bytes::from(body)),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode response envelope");
            internal_error()
        }
    }
}

fn internal_error() -> Response<Bytes> {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain",
        Bytes::from_static(b"Internal Server Error"),
    )
}

fn respond(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
