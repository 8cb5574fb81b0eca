//! Error handling and cycle statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, resolution, persistence, config)
//! - Cycle statistics tracking (results per status and monitor, absorbed adapter faults)
//!
//! Check-level failures never surface as errors to the orchestrator: they are
//! absorbed into `Status::Error` results. The types here cover the seams where
//! a typed error is still useful to the caller.

mod stats;
mod types;

// Re-export public API
pub use stats::ScanStats;
pub use types::{ConfigError, InitializationError, PersistenceError, ResolutionError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckResult, MonitorKind, Status};
    use strum::IntoEnumIterator;

    #[test]
    fn test_scan_stats_initialization() {
        let stats = ScanStats::new();
        for status in Status::iter() {
            assert_eq!(stats.status_count(status), 0);
        }
        for monitor in MonitorKind::iter() {
            assert_eq!(stats.monitor_count(monitor), 0);
        }
        assert_eq!(stats.adapter_failures(), 0);
    }

    #[test]
    fn test_scan_stats_record() {
        let stats = ScanStats::new();
        stats.record(&CheckResult::new("a.com", MonitorKind::Ssl, Status::Ok, "fine"));
        stats.record(&CheckResult::new("a.com", MonitorKind::Dns, Status::Warning, "spf"));
        stats.record(&CheckResult::error("b.com", MonitorKind::Ssl, "boom"));
        stats.record_adapter_failure();

        assert_eq!(stats.status_count(Status::Ok), 1);
        assert_eq!(stats.status_count(Status::Warning), 1);
        assert_eq!(stats.status_count(Status::Error), 1);
        assert_eq!(stats.monitor_count(MonitorKind::Ssl), 2);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.total_issues(), 2);
        assert_eq!(stats.adapter_failures(), 1);
    }
}
