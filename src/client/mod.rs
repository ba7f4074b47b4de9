//! High-level client API for A2A protocol

pub mod agent;
pub mod builder;
pub mod card_resolver;
pub mod config;

pub use agent::AgentClient;
pub use builder::{A2AClient, A2AClientBuilder, A2AService};
pub use card_resolver::CardResolver;
pub use config::ClientConfig;
