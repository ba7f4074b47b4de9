//! HTTP transport implementation for A2A protocol

use std::{
    task::{Context, Poll},
    time::Duration,
};

use async_trait::async_trait;
use url::Url;

use crate::protocol::error::A2AError;

use super::{join_url, Transport, TransportRequest, TransportResponse};

/// HTTP transport implementation using reqwest
///
/// Carries JSON-RPC envelopes and agent card fetches. Streaming responses are read to the
/// end of the body before they are handed back, since the server emits a single event.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the agent (e.g., "<https://agent.example.com>")
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a new HTTP transport whose requests give up after `timeout`
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, A2AError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Create a new HTTP transport with a custom reqwest client
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        let url = join_url(&self.base_url, &request.endpoint);
        tracing::debug!(method = %request.method, url = %url, "sending A2A request");

        let mut req_builder = match request.method.as_str() {
            "POST" => self.client.post(&url),
            "GET" => self.client.get(&url),
            _ => {
                return Err(A2AError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        // Add headers
        for (key, value) in request.headers {
            req_builder = req_builder.header(key, value);
        }

        // Add body if not empty
        if !request.body.is_empty() {
            req_builder = req_builder.body(request.body);
        }

        // Execute the request
        let response = req_builder.send().await?;

        // Extract status and headers
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        // Extract body
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new(Url::parse("https://example.com").unwrap());
        assert_eq!(transport.base_url().as_str(), "https://example.com/");
        assert!(transport.supports_streaming());
    }

    #[test]
    fn test_http_transport_with_timeout() {
        let transport = HttpTransport::with_timeout(
            Url::parse("https://example.com/a2a").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(transport.base_url().path(), "/a2a");
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let transport = HttpTransport::new(Url::parse("https://example.com").unwrap());
        let result = transport
            .execute(TransportRequest::new("/", "PATCH"))
            .await;
        assert!(matches!(result, Err(A2AError::Transport(_))));
    }
}
