//! Identifier generation for tasks, contexts and JSON-RPC requests

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh identifiers
///
/// Implementations must be safe to share between concurrent callers and must never
/// hand out the same identifier twice for the same prefix.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Produce a new identifier starting with `prefix`
    fn next_id(&self, prefix: &str) -> String;
}

/// Time-ordered UUID v7 identifiers, e.g. `task-01890a5d-ac96-774b-bcce-b302099a8057`
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::now_v7())
    }
}

/// Deterministic counter-based identifiers, e.g. `task-1`, `ctx-2`
///
/// The counter is shared across prefixes.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", prefix, n)
    }
}
