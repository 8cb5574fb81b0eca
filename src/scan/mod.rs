//! Result aggregation for one scan cycle.
//!
//! For each configured domain (in configured order) the aggregator derives the
//! hostname triple once, runs every enabled adapter against the hostname its
//! monitor policy selects, and collects one `CheckResult` per adapter.
//!
//! Adapter faults never escape: an `Err`, a panic, or running past the
//! per-adapter deadline all become a `status=error` result for that monitor.
//! Cancellation is checked before each domain starts.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::checks::CheckAdapter;
use crate::config::ADAPTER_TIMEOUT;
use crate::domain::{HostnameTriple, TargetSelector};
use crate::error_handling::ScanStats;
use crate::models::{CheckResult, MonitorKind, Status};

/// Message of the synthetic result for connection checks without a target.
pub const DNS_RESOLUTION_FAILED: &str = "DNS Resolution Failed";

pub struct Aggregator {
    selector: TargetSelector,
    adapters: Vec<Arc<dyn CheckAdapter>>,
    concurrency: usize,
    adapter_timeout: Duration,
    stats: Arc<ScanStats>,
}

impl Aggregator {
    pub fn new(selector: TargetSelector, adapters: Vec<Arc<dyn CheckAdapter>>) -> Self {
        Aggregator {
            selector,
            adapters,
            concurrency: 1,
            adapter_timeout: ADAPTER_TIMEOUT,
            stats: Arc::new(ScanStats::new()),
        }
    }

    /// Domains scanned at once. Results stay in configured domain order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn stats(&self) -> Arc<ScanStats> {
        self.stats.clone()
    }

    /// Scans `domains` and returns the flat, ordered result sequence.
    ///
    /// Stops starting new domains once `cancel` fires; domains already in
    /// progress finish.
    pub async fn run(&self, domains: &[String], cancel: &CancellationToken) -> Vec<CheckResult> {
        let per_domain: Vec<Vec<CheckResult>> = stream::iter(domains.iter())
            .take_while(|raw| {
                let cancelled = cancel.is_cancelled();
                if cancelled {
                    log::warn!("Cycle cancelled before {raw}");
                }
                futures::future::ready(!cancelled)
            })
            .map(|raw| self.scan_domain(raw))
            .buffered(self.concurrency)
            .collect()
            .await;

        per_domain.into_iter().flatten().collect()
    }

    /// Runs every adapter for one domain.
    pub async fn scan_domain(&self, raw: &str) -> Vec<CheckResult> {
        let triple = self.selector.select(raw).await;
        log::info!(
            "Scanning {} (parent {}, connect via {})",
            triple.cleaned,
            triple.parent,
            triple.connectable.as_deref().unwrap_or("-")
        );

        let mut results = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let kind = adapter.kind();
            let result = match triple.target_for(kind.target_policy()) {
                Some(target) => {
                    let result = self.invoke(adapter.as_ref(), target).await;
                    relabel(result, &triple, target)
                }
                None => dns_resolution_failed(&triple, kind),
            };
            self.stats.record(&result);
            results.push(result);
        }
        results
    }

    async fn invoke(&self, adapter: &dyn CheckAdapter, target: &str) -> CheckResult {
        let kind = adapter.kind();
        let guarded = AssertUnwindSafe(adapter.check(target)).catch_unwind();

        let failure = match tokio::time::timeout(self.adapter_timeout, guarded).await {
            Ok(Ok(Ok(result))) => return result,
            Ok(Ok(Err(e))) => format!("{e:#}"),
            Ok(Err(panic)) => format!("Check panicked: {}", panic_message(panic.as_ref())),
            Err(_) => format!("Check timed out after {}s", self.adapter_timeout.as_secs()),
        };

        log::warn!("{kind} check for {target} failed: {failure}");
        self.stats.record_adapter_failure();
        CheckResult::error(target, kind, failure)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Puts the user-facing label back on a result produced for a substituted target.
fn relabel(mut result: CheckResult, triple: &HostnameTriple, target: &str) -> CheckResult {
    result.domain = triple.cleaned.clone();
    if target != triple.cleaned {
        result.message = if target == triple.parent {
            format!("(Parent: {target}) {}", result.message)
        } else {
            format!("(Checked {target}) {}", result.message)
        };
    }
    result
}

fn dns_resolution_failed(triple: &HostnameTriple, kind: MonitorKind) -> CheckResult {
    CheckResult::new(
        triple.cleaned.clone(),
        kind,
        Status::Critical,
        DNS_RESOLUTION_FAILED,
    )
    .with_details(serde_json::Value::String(format!(
        "Could not resolve {} or www.{}",
        triple.cleaned, triple.cleaned
    )))
}
