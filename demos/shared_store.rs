//! Two agent instances sharing task state through one key/value backend
//!
//! Each `TaskManager` stands in for a separate process; the cloned
//! `InMemoryKeyValueStore` plays the external key/list server they both talk to.

use std::sync::Arc;

use tower_a2a_tasks::{
    prelude::*,
    server::{InMemoryKeyValueStore, SharedStoreConfig},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let kv = InMemoryKeyValueStore::new();
    let config = SharedStoreConfig::new("demo").with_history_limit(3);

    let orchestrator = TaskManager::new(Arc::new(SharedTaskStore::with_config(
        kv.clone(),
        config.clone(),
    )));
    let worker = TaskManager::new(Arc::new(SharedTaskStore::with_config(kv, config)));

    let task = orchestrator
        .create_task(Some("ctx-math".into()), None)
        .await;
    println!("🧾 orchestrator created {}", task.id);

    worker
        .update_status(&task.id, TaskState::Running, None)
        .await?;
    let done = worker
        .return_artifact(&task.id, Artifact::new("result", "sum").with_content("42"))
        .await?;
    println!("🔧 worker attached {} artifact(s)", done.artifacts.len());

    let seen = orchestrator.get_task(&task.id).await?;
    println!("👀 orchestrator sees state {}", seen.state());

    for turn in 1..=5 {
        orchestrator
            .store()
            .add_history_message("ctx-math", Message::user(format!("turn {}", turn)))
            .await;
    }
    let history = worker.store().get_history("ctx-math", 0).await;
    let texts: Vec<_> = history.iter().map(Message::get_text).collect();
    println!("📚 history capped at 3: {:?}", texts);

    Ok(())
}
