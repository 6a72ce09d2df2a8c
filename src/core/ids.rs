//! Turn id generation
//!
//! Transcript ordering must be deterministic and testable, so the
//! conversation controller takes an injected generator instead of deriving
//! ids from the wall clock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generator for unique, monotonically ordered turn ids
pub trait TurnIdGen: Send + Sync {
    /// Produce the next id; later calls must sort after earlier ones
    fn next_id(&self) -> String;
}

/// Counter-backed generator; ids sort lexicographically in issue order
#[derive(Debug, Default)]
pub struct MonotonicTurnIds {
    counter: AtomicU64,
}

impl MonotonicTurnIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnIdGen for MonotonicTurnIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("turn-{:012}", n)
    }
}
