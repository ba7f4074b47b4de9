//! An echo agent driven through its HTTP service, without opening a socket
//!
//! Run with `RUST_LOG=debug cargo run --example echo_agent` to see the request flow.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use tower::ServiceExt;
use tower_a2a_tasks::prelude::*;
use tracing_subscriber::EnvFilter;

const BASE_URL: &str = "http://localhost:8080";

struct EchoAgent;

#[async_trait]
impl AgentHandler for EchoAgent {
    async fn on_message_received(&self, params: &MessageSendParams) -> A2AResult<SendMessageResult> {
        Ok(Message::agent(format!("Echo: {}", params.message.get_text())).into())
    }

    fn agent_card(&self, base_url: &str) -> Option<AgentCard> {
        Some(
            AgentCard::new("Echo Agent", "Repeats whatever it is told", base_url, "1.0.0")
                .with_skill(AgentSkill::new("echo", "Echo the input back").with_tag("demo")),
        )
    }
}

async fn call(service: &A2AHttpService, request: hyper::Request<Bytes>) -> anyhow::Result<String> {
    let response = service.clone().oneshot(request).await?;
    Ok(String::from_utf8(response.into_body().to_vec())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let manager = Arc::new(TaskManager::in_memory().with_handler(Arc::new(EchoAgent)));
    let service = A2AHttpService::new(manager, ServerConfig::new(BASE_URL));

    println!("📋 Agent card");
    let request = hyper::Request::get("/.well-known/agent-card.json").body(Bytes::new())?;
    println!("{}\n", call(&service, request).await?);

    println!("💬 message/send");
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "message/send",
        "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "Hello, agent!"}]}}
    });
    let request = hyper::Request::post("/")
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))?;
    println!("{}\n", call(&service, request).await?);

    println!("📡 message/stream");
    let body = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "message/stream",
        "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "Stream this"}]}}
    });
    let request = hyper::Request::post("/")
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))?;
    print!("{}", call(&service, request).await?);

    println!("❓ tasks/get on an unknown task");
    let body = json!({"jsonrpc": "2.0", "id": 3, "method": "tasks/get", "params": {"id": "missing-id"}});
    let request = hyper::Request::post("/")
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))?;
    println!("{}", call(&service, request).await?);

    Ok(())
}
