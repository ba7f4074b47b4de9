//! Agent-side runtime: task persistence, lifecycle management and the JSON-RPC endpoint
//!
//! ```text
//! hyper::Request ─▶ A2AHttpService ─▶ JsonRpcDispatcher ─▶ TaskManager ─▶ TaskStore
//!                                                               │
//!                                                               └─▶ AgentHandler
//! ```

pub mod config;
pub mod dispatcher;
pub mod http;
pub mod manager;
pub mod store;

pub use config::{ServerConfig, SharedStoreConfig};
pub use dispatcher::{DispatchOutcome, JsonRpcDispatcher};
pub use http::A2AHttpService;
pub use manager::{AgentHandler, EventSink, TaskManager};
pub use store::{
    InMemoryKeyValueStore, InMemoryTaskStore, KeyValueStore, KvError, SharedTaskStore, TaskStore,
};
