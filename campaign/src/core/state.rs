//! Session-local orchestrator state
//!
//! Counters and the in-session visited set. None of this is durable; the
//! engagement store is the source of truth for anything that must survive
//! a restart.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::RunPhase;

/// Cooperative stop signal.
///
/// Cloned out to whoever needs to stop the run (ctrl-c handler, dashboard
/// command); the orchestrator checks it at every loop boundary and lets
/// in-flight actions finish.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Mutable state for one campaign run
#[derive(Debug)]
pub struct SessionState {
    phase: RunPhase,

    /// Successful commits counted against today's quota (seeded from the
    /// store at INIT so restarts resume correctly)
    pub replies_today: u64,

    /// Successful commits in this process lifetime, drives session breaks
    pub session_count: u32,

    pub follows_today: u32,

    /// Generation and submission failures
    pub errors: u64,

    pub cycles: u32,

    /// Number of store operations that had to proceed fail-open
    pub degraded_store_events: u64,

    /// Ids acted on in this run; guards against a store read race
    visited: HashSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Init,
            replies_today: 0,
            session_count: 0,
            follows_today: 0,
            errors: 0,
            cycles: 0,
            degraded_store_events: 0,
            visited: HashSet::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Transition to a new phase, logging the edge.
    pub fn set_phase(&mut self, phase: RunPhase) {
        if self.phase != phase {
            tracing::info!("🔀 {} → {}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub fn mark_visited(&mut self, id: &str) {
        self.visited.insert(id.to_string());
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    pub fn record_success(&mut self) {
        self.replies_today += 1;
        self.session_count += 1;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_flag_is_sticky() {
        let flag = StopFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_stopped());
        clone.trigger();
        assert!(flag.is_stopped());
    }

    #[test]
    fn test_visited_set() {
        let mut state = SessionState::new();
        assert!(!state.is_visited("abc"));
        state.mark_visited("abc");
        assert!(state.is_visited("abc"));
        assert!(!state.is_visited("def"));
    }

    #[test]
    fn test_success_counters() {
        let mut state = SessionState::new();
        state.replies_today = 10; // resumed from a previous run
        state.record_success();
        assert_eq!(state.replies_today, 11);
        assert_eq!(state.session_count, 1);
    }
}
