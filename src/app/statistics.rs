//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::ScanStats;
use crate::models::{MonitorKind, Status};

/// Logs per-status and per-monitor counts and a one-line summary.
pub fn print_scan_statistics(stats: &ScanStats, elapsed_seconds: f64) {
    let total = stats.total();

    if total > 0 {
        info!("Status Counts ({} total):", total);
        for status in Status::iter() {
            let count = stats.status_count(status);
            if count > 0 {
                info!("   {}: {}", status.as_str(), count);
            }
        }

        info!("Monitor Counts:");
        for monitor in MonitorKind::iter() {
            let count = stats.monitor_count(monitor);
            if count > 0 {
                info!("   {}: {}", monitor.as_str(), count);
            }
        }
    }

    let failures = stats.adapter_failures();
    if failures > 0 {
        info!("Adapter failures absorbed: {}", failures);
    }

    info!(
        "✅ Ran {} check{} ({} with issues) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        stats.total_issues(),
        elapsed_seconds
    );
}
