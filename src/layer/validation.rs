//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{error::A2AError, message::Part, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
///
/// Request violations are reported as `InvalidParams`, malformed responses as `Internal`.
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone)]
pub struct A2AValidationService<S> {
    inner: S,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        let invalid = |msg: &str| Err(A2AError::InvalidParams(msg.to_string()));

        match &req.operation {
            A2AOperation::SendMessage { params, .. } => {
                // Message must have at least one part
                if params.message.parts.is_empty() {
                    return invalid("Message must have at least one part");
                }

                for part in &params.message.parts {
                    if let Part::File { file } = part {
                        if file.name.is_empty() {
                            return invalid("File name cannot be empty");
                        }
                        if file.uri.is_none() && file.bytes.is_empty() {
                            return invalid("File must have either URI or bytes content");
                        }
                    }
                }
            }
            A2AOperation::GetTask(params) => {
                if params.id.is_empty() {
                    return invalid("Task ID cannot be empty");
                }
            }
            A2AOperation::CancelTask(params)
            | A2AOperation::Resubscribe(params)
            | A2AOperation::GetPushNotificationConfig(params) => {
                if params.id.is_empty() {
                    return invalid("Task ID cannot be empty");
                }
            }
            A2AOperation::SetPushNotificationConfig(config) => {
                if config.push_notification_config.url.is_empty() {
                    return invalid("Push notification URL cannot be empty");
                }
            }
            A2AOperation::DiscoverAgent => {}
        }

        // Validate agent URL
        if req.context.agent_url.is_empty() {
            return invalid("Agent URL cannot be empty");
        }

        Ok(())
    }

    /// Validate an A2A response
    fn validate_response(resp: &A2AResponse) -> Result<(), A2AError> {
        let malformed = |msg: &str| Err(A2AError::Internal(format!("Invalid response: {}", msg)));

        match resp {
            A2AResponse::Task(task) => {
                if task.id.is_empty() {
                    return malformed("Task ID cannot be empty");
                }
            }
            A2AResponse::AgentCard(card) => {
                if card.name.is_empty() {
                    return malformed("Agent name cannot be empty");
                }
            }
            A2AResponse::Events(events) => {
                if events.is_empty() {
                    return malformed("Event stream carried no events");
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
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

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        // Validate request before passing to inner service
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;

            // Validate response
            Self::validate_response(&response)?;

            Ok(response)
        })
    }
}
