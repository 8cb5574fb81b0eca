//! Alert state machine.
//!
//! Decides which non-ok results are worth notifying this cycle. Each
//! `domain:monitor` pair moves through:
//!
//! - no record + non-ok result: **new**, alerted with count 1
//! - open + non-ok, last alert more than `resend_after` ago: **resend**, count+1
//! - open + non-ok, last alert recent: **snoozed**, nothing sent
//! - open + ok (or not seen this cycle): **resolved**, record removed
//!
//! Alerted issues are grouped into one [`AlertDigest`] per domain.

mod digest;
mod store;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

pub use digest::{detail_lines, AlertDigest, AlertLevel, DigestEntry};
pub use store::{IssueMap, IssueStore, JsonFileStore, MemoryStore, StoreLock};

use crate::config::DEFAULT_RESEND_AFTER_HOURS;
use crate::models::{CheckResult, IssueRecord};

/// Runs the alert pass against a persisted issue store.
pub struct AlertManager<S: IssueStore> {
    store: S,
    resend_after: Duration,
}

impl<S: IssueStore> AlertManager<S> {
    /// A window that is not a positive, representable number of hours falls
    /// back to the default.
    pub fn new(store: S, resend_after_hours: i64) -> Self {
        let resend_after = Duration::try_hours(resend_after_hours)
            .filter(|window| *window > Duration::zero())
            .unwrap_or_else(|| {
                log::warn!(
                    "Invalid resend window of {resend_after_hours}h, using {DEFAULT_RESEND_AFTER_HOURS}h"
                );
                Duration::hours(DEFAULT_RESEND_AFTER_HOURS)
            });
        AlertManager {
            store,
            resend_after,
        }
    }

    pub fn resend_after(&self) -> Duration {
        self.resend_after
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes one cycle of results at the current time.
    pub fn process(&self, results: &[CheckResult]) -> Vec<AlertDigest> {
        self.process_at(results, Utc::now())
    }

    /// Processes one cycle of results as of `now`.
    ///
    /// An unreadable store is treated as a cold start. The updated records are
    /// always written back, even when nothing is alerted, so resolutions are
    /// persisted.
    pub fn process_at(&self, results: &[CheckResult], now: DateTime<Utc>) -> Vec<AlertDigest> {
        let mut issues = match self.store.load() {
            Ok(issues) => issues,
            Err(e) => {
                log::warn!("Issue store unreadable, starting with no open issues: {e}");
                IssueMap::new()
            }
        };

        let digests = evaluate(results, &mut issues, now, self.resend_after);

        if let Err(e) = self.store.save(&issues) {
            log::error!("Failed to save issue store: {e}");
        }
        digests
    }
}

/// Applies one cycle of results to `issues` and returns the digests to send.
///
/// When a pair appears more than once in `results`, the last occurrence wins.
/// Digests are ordered by each domain's first appearance in `results`.
pub fn evaluate(
    results: &[CheckResult],
    issues: &mut IssueMap,
    now: DateTime<Utc>,
    resend_after: Duration,
) -> Vec<AlertDigest> {
    // Latest result per key, keys in first-appearance order
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, &CheckResult> = HashMap::new();
    for result in results {
        let key = result.issue_key();
        if latest.insert(key.clone(), result).is_none() {
            order.push(key);
        }
    }

    let mut domains: Vec<&str> = Vec::new();
    let mut entries: HashMap<&str, Vec<DigestEntry>> = HashMap::new();

    for key in &order {
        let result = latest[key];
        if !result.status.is_alertable() {
            continue;
        }

        let count = match issues.get_mut(key) {
            None => {
                issues.insert(
                    key.clone(),
                    IssueRecord {
                        first_seen: now,
                        last_sent: now,
                        count: 1,
                        monitor: result.monitor,
                        domain: result.domain.clone(),
                    },
                );
                log::info!("New issue: {key} ({})", result.status);
                1
            }
            Some(record) if now - record.last_sent > resend_after => {
                record.count += 1;
                record.last_sent = now;
                log::info!("Resending issue: {key} (alert #{})", record.count);
                record.count
            }
            Some(_) => {
                log::debug!("Snoozed issue: {key}");
                continue;
            }
        };

        let domain = result.domain.as_str();
        if !entries.contains_key(domain) {
            domains.push(domain);
        }
        entries
            .entry(domain)
            .or_default()
            .push(DigestEntry::from_result(result, count));
    }

    // Anything not currently failing is resolved
    issues.retain(|key, _| {
        let open = latest
            .get(key)
            .is_some_and(|result| result.status.is_alertable());
        if !open {
            log::info!("Resolved issue: {key}");
        }
        open
    });

    domains
        .into_iter()
        .filter_map(|domain| {
            let domain_entries = entries.remove(domain)?;
            (!domain_entries.is_empty()).then(|| AlertDigest::new(domain, domain_entries))
        })
        .collect()
}
