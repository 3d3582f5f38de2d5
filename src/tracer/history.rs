//! Bounded log of recent traces.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::blockchain::types::WalletAddress;
use crate::tracer::types::FlowResult;

/// Compact record of one completed trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub id: Uuid,
    pub from: WalletAddress,
    pub to: WalletAddress,
    pub chain: String,
    pub found: bool,
    pub path_count: usize,
    pub total_amount: f64,
    pub execution_time_ms: u64,
    /// Unix seconds when the trace finished.
    pub recorded_at: u64,
}

impl TraceSummary {
    pub fn from_result(result: &FlowResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: result.from.clone(),
            to: result.to.clone(),
            chain: result.chain.clone(),
            found: result.found,
            path_count: result.paths.len(),
            total_amount: result.total_amount,
            execution_time_ms: result.execution_time_ms,
            recorded_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// Fixed-capacity ring buffer; the oldest summary is dropped when full.
#[derive(Debug)]
pub struct TraceHistory {
    entries: Mutex<VecDeque<TraceSummary>>,
    capacity: usize,
}

impl TraceHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, summary: TraceSummary) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(summary);
    }

    /// Up to `limit` summaries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<TraceSummary> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(n: u64) -> TraceSummary {
        TraceSummary {
            id: Uuid::new_v4(),
            from: WalletAddress::new("0xa"),
            to: WalletAddress::new("0xb"),
            chain: "ethereum".into(),
            found: n % 2 == 0,
            path_count: 0,
            total_amount: 0.0,
            execution_time_ms: n,
            recorded_at: n,
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let history = TraceHistory::new(3);
        for n in 0..5 {
            history.record(summary(n));
        }

        assert_eq!(history.len(), 3);
        let recent: Vec<u64> = history.recent(10).iter().map(|s| s.recorded_at).collect();
        assert_eq!(recent, vec![4, 3, 2]);
    }

    #[test]
    fn test_recent_respects_limit() {
        let history = TraceHistory::new(10);
        assert!(history.is_empty());
        for n in 0..4 {
            history.record(summary(n));
        }
        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].recorded_at, 3);
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let history = TraceHistory::new(0);
        history.record(summary(1));
        history.record(summary(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.recent(5)[0].recorded_at, 2);
    }
}
