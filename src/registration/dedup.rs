//! Duplicate delivery suppression
//!
//! Two advisory guards against webhook retransmission, mirrored per chat:
//!
//! 1. a rate gate dropping any event inside a short cooldown window after
//!    the previously accepted event for the same identity;
//! 2. a bounded set of platform-assigned event ids (callback ids, message
//!    ids); a repeated id is dropped. On overflow the whole set is cleared
//!    rather than evicting oldest entries.
//!
//! Neither guard provides exactly-once semantics; the durable store's
//! uniqueness constraint stays the final arbiter. Each check-then-set runs
//! under a single lock acquisition with no await point in between.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::core::config;

/// Per-identity rate gate plus bounded seen-id set.
#[derive(Clone)]
pub struct DuplicateSuppressor {
    cooldown: Duration,
    capacity: usize,
    last_accepted: Arc<Mutex<HashMap<String, Instant>>>,
    seen_ids: Arc<Mutex<HashSet<String>>>,
}

impl DuplicateSuppressor {
    /// Suppressor with the configured cooldown and capacity.
    pub fn new() -> Self {
        Self::with_settings(config::dedup::cooldown(), config::dedup::SEEN_CAPACITY)
    }

    /// Suppressor with custom settings (used by tests).
    pub fn with_settings(cooldown: Duration, capacity: usize) -> Self {
        Self {
            cooldown,
            capacity,
            last_accepted: Arc::new(Mutex::new(HashMap::new())),
            seen_ids: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Decides whether an event should be processed.
    ///
    /// Returns `false` (drop silently) when the event arrives inside the
    /// cooldown window for its identity or when its id was already seen.
    /// Otherwise records the acceptance and returns `true`.
    pub async fn should_process(&self, identity: &str, event_id: Option<&str>) -> bool {
        {
            let mut last = self.last_accepted.lock().await;
            let now = Instant::now();
            if let Some(&previous) = last.get(identity) {
                if now.duration_since(previous) < self.cooldown {
                    log::debug!("User {}: event dropped by rate gate", identity);
                    return false;
                }
            }
            last.insert(identity.to_string(), now);
        }

        if let Some(id) = event_id {
            let mut seen = self.seen_ids.lock().await;
            if seen.contains(id) {
                log::debug!("User {}: duplicate event id {} dropped", identity, id);
                return false;
            }
            if seen.len() >= self.capacity {
                // Wholesale reset; the set only needs to catch near-duplicate retransmission
                seen.clear();
            }
            seen.insert(id.to_string());
        }

        true
    }
}

impl Default for DuplicateSuppressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_gate_drops_events_inside_cooldown() {
        let dedup = DuplicateSuppressor::with_settings(Duration::from_millis(50), 100);

        assert!(dedup.should_process("1", None).await);
        assert!(!dedup.should_process("1", None).await);
        // A different identity is unaffected
        assert!(dedup.should_process("2", None).await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(dedup.should_process("1", None).await);
    }

    #[tokio::test]
    async fn test_repeated_event_id_is_dropped() {
        let dedup = DuplicateSuppressor::with_settings(Duration::ZERO, 100);

        assert!(dedup.should_process("1", Some("cb-1")).await);
        assert!(!dedup.should_process("1", Some("cb-1")).await);
        assert!(dedup.should_process("1", Some("cb-2")).await);
    }

    #[tokio::test]
    async fn test_seen_set_clears_wholesale_on_overflow() {
        let dedup = DuplicateSuppressor::with_settings(Duration::ZERO, 3);

        assert!(dedup.should_process("1", Some("a")).await);
        assert!(dedup.should_process("1", Some("b")).await);
        assert!(dedup.should_process("1", Some("c")).await);
        // Insertion of a fourth id clears the set first, so "a" is forgotten
        assert!(dedup.should_process("1", Some("d")).await);
        assert!(dedup.should_process("1", Some("a")).await);
    }

    #[tokio::test]
    async fn test_events_without_id_only_hit_the_rate_gate() {
        let dedup = DuplicateSuppressor::with_settings(Duration::ZERO, 100);

        assert!(dedup.should_process("1", None).await);
        assert!(dedup.should_process("1", None).await);
    }
}
