//! Agent card discovery

use url::Url;

use crate::{
    protocol::{
        agent::AgentCard,
        error::{A2AError, A2AResult},
    },
    service::core::AGENT_CARD_PATH,
    transport::{join_url, HttpTransport, Transport, TransportRequest},
};

/// Fetches an agent's card from its well-known location
///
/// Any failure (network fault, non-2xx status or an unparsable body) is reported as an
/// error carrying the `InternalError` code.
#[derive(Debug, Clone)]
pub struct CardResolver<T> {
    transport: T,
    path: String,
}

impl CardResolver<HttpTransport> {
    /// Resolve cards over HTTP from `base_url`
    pub fn new(base_url: Url) -> Self {
        Self::with_transport(HttpTransport::new(base_url))
    }
}

impl<T: Transport> CardResolver<T> {
    /// Resolve cards through a custom transport
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            path: AGENT_CARD_PATH.to_string(),
        }
    }

    /// Override the card path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Full URL the card is fetched from
    pub fn card_url(&self) -> String {
        join_url(self.transport.base_url(), &self.path)
    }

    /// Fetch and decode the agent card
    pub async fn resolve(&self) -> A2AResult<AgentCard> {
        tracing::debug!(url = %self.card_url(), "resolving agent card");

        let request = TransportRequest::new(self.path.clone(), "GET").header("Accept", "application/json");
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| A2AError::Internal(format!("Failed to fetch agent card: {}", e)))?;

        if !response.is_success() {
            return Err(A2AError::Internal(format!(
                "Failed to fetch agent card: HTTP {}",
                response.status
            )));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| A2AError::Internal(format!("Failed to parse agent card: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::transport::{mock::MockTransport, TransportResponse};

    #[test]
    fn test_card_url() {
        let resolver = CardResolver::new(Url::parse("https://agent.example.com").unwrap());
        assert_eq!(
            resolver.card_url(),
            "https://agent.example.com/.well-known/agent-card.json"
        );

        let resolver = resolver.with_path("/custom/card.json");
        assert_eq!(resolver.card_url(), "https://agent.example.com/custom/card.json");
    }

    #[tokio::test]
    async fn test_resolve_card() {
        let transport = MockTransport::json(
            200,
            json!({"name": "Math Agent", "description": "adds", "url": "http://agent.test", "version": "1.2.0"}),
        );
        let resolver = CardResolver::with_transport(transport.clone());

        let card = resolver.resolve().await.unwrap();
        assert_eq!(card.name, "Math Agent");
        assert_eq!(card.version, "1.2.0");
        assert_eq!(transport.requests()[0].endpoint, "/.well-known/agent-card.json");
    }

    #[tokio::test]
    async fn test_resolve_non_success_status() {
        let transport = MockTransport::new(|_| TransportResponse::new(404));
        let err = CardResolver::with_transport(transport)
            .resolve()
            .await
            .unwrap_err();
        assert_eq!(err.code(), -32603);
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_resolve_malformed_body() {
        let transport = MockTransport::new(|_| {
            TransportResponse::new(200).body(Bytes::from_static(b"<html>not a card</html>"))
        });
        let err = CardResolver::with_transport(transport)
            .resolve()
            .await
            .unwrap_err();
        assert_eq!(err.code(), -32603);
        assert!(err.to_string().contains("parse"));
    }
}
