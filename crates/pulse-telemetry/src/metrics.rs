use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// In-memory counter. Monotonically increasing.
struct Counter {
    value: AtomicU64,
}

impl Counter {
    fn new() -> Self {
        Self { value: AtomicU64::new(0) }
    }
    fn increment(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }
    fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Point-in-time view of every counter, for end-of-run reporting.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
}

/// Records pipeline counters (leads generated, enriched, rejected,
/// dispatched, delivery failures). Shared across stages via `Arc`.
#[derive(Clone, Default)]
pub struct MetricsRecorder {
    counters: Arc<RwLock<HashMap<String, Arc<Counter>>>>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, name: &str, n: u64) {
        if let Some(counter) = self.counters.read().get(name) {
            counter.increment(n);
            return;
        }
        let mut counters = self.counters.write();
        counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Counter::new()))
            .increment(n);
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.read().get(name).map(|c| c.get()).unwrap_or(0)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .iter()
            .map(|(name, c)| (name.clone(), c.get()))
            .collect();
        MetricsSnapshot { counters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_get() {
        let metrics = MetricsRecorder::new();
        metrics.increment("leads_generated", 3);
        metrics.increment("leads_generated", 2);
        assert_eq!(metrics.get("leads_generated"), 5);
    }

    #[test]
    fn unknown_counter_reads_zero() {
        let metrics = MetricsRecorder::new();
        assert_eq!(metrics.get("nope"), 0);
    }

    #[test]
    fn snapshot_contains_all_counters() {
        let metrics = MetricsRecorder::new();
        metrics.increment("dispatch_sent", 1);
        metrics.increment("dispatch_failed", 2);
        let snap = metrics.snapshot();
        assert_eq!(snap.counters.get("dispatch_sent"), Some(&1));
        assert_eq!(snap.counters.get("dispatch_failed"), Some(&2));
    }

    #[test]
    fn clones_share_state() {
        let metrics = MetricsRecorder::new();
        let clone = metrics.clone();
        clone.increment("validation_rejects", 1);
        assert_eq!(metrics.get("validation_rejects"), 1);
    }
}
