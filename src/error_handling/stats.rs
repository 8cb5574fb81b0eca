//! Cycle statistics tracking.
//!
//! Thread-safe counters of check outcomes per status and per monitor, shared
//! across domain tasks when the cycle runs with concurrency above one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use crate::models::{CheckResult, MonitorKind, Status};

/// Thread-safe cycle statistics tracker.
///
/// All statuses and monitors are initialized to zero on creation.
pub struct ScanStats {
    by_status: HashMap<Status, AtomicUsize>,
    by_monitor: HashMap<MonitorKind, AtomicUsize>,
    adapter_failures: AtomicUsize,
}

impl ScanStats {
    pub fn new() -> Self {
        ScanStats {
            by_status: Status::iter().map(|s| (s, AtomicUsize::new(0))).collect(),
            by_monitor: MonitorKind::iter()
                .map(|m| (m, AtomicUsize::new(0)))
                .collect(),
            adapter_failures: AtomicUsize::new(0),
        }
    }

    pub fn record(&self, result: &CheckResult) {
        if let Some(counter) = self.by_status.get(&result.status) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(counter) = self.by_monitor.get(&result.monitor) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Counts an adapter fault (error return, panic or timeout) absorbed by the aggregator.
    pub fn record_adapter_failure(&self) {
        self.adapter_failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn status_count(&self, status: Status) -> usize {
        self.by_status
            .get(&status)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn monitor_count(&self, monitor: MonitorKind) -> usize {
        self.by_monitor
            .get(&monitor)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn adapter_failures(&self) -> usize {
        self.adapter_failures.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        Status::iter().map(|s| self.status_count(s)).sum()
    }

    /// Number of results that are alert-eligible (anything but ok).
    pub fn total_issues(&self) -> usize {
        Status::iter()
            .filter(Status::is_alertable)
            .map(|s| self.status_count(s))
            .sum()
    }
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}
