//! Shared data model: status taxonomy, monitor kinds, check results and issue records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::config::{EXPIRY_CRITICAL_DAYS, EXPIRY_WARNING_DAYS};

/// Outcome of a single check.
///
/// `Ok < Warning < Critical` is the severity order. `Error` means the check
/// itself could not complete; it is alert-worthy like `Critical` but reported
/// as its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Critical => "critical",
            Status::Error => "error",
        }
    }

    /// Whether this status should produce (or keep) an open issue.
    pub fn is_alertable(&self) -> bool {
        !matches!(self, Status::Ok)
    }

    /// Severity rank used for ordering; `Error` ranks with `Critical`.
    pub fn severity(&self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical | Status::Error => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five monitor kinds. Serialized names match the issue-store keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum MonitorKind {
    /// Registration expiry (WHOIS)
    Domain,
    /// TLS certificate health
    Ssl,
    /// SPF/DMARC records
    Dns,
    /// HTTP security posture
    Security,
    /// RBL membership
    Blacklist,
}

impl MonitorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorKind::Domain => "domain",
            MonitorKind::Ssl => "ssl",
            MonitorKind::Dns => "dns",
            MonitorKind::Security => "security",
            MonitorKind::Blacklist => "blacklist",
        }
    }

    /// Which hostname of the triple this monitor queries.
    pub fn target_policy(&self) -> TargetPolicy {
        match self {
            MonitorKind::Domain | MonitorKind::Dns => TargetPolicy::Parent,
            MonitorKind::Ssl | MonitorKind::Security => TargetPolicy::Connectable,
            MonitorKind::Blacklist => TargetPolicy::Cleaned,
        }
    }
}

impl std::fmt::Display for MonitorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed per-monitor target resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPolicy {
    Parent,
    Connectable,
    Cleaned,
}

/// Normalized output of any check adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The user-facing domain label (never the substituted target)
    pub domain: String,
    pub monitor: MonitorKind,
    pub status: Status,
    pub message: String,
    /// Monitor-specific payload
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl CheckResult {
    pub fn new(
        domain: impl Into<String>,
        monitor: MonitorKind,
        status: Status,
        message: impl Into<String>,
    ) -> Self {
        CheckResult {
            domain: domain.into(),
            monitor,
            status,
            message: message.into(),
            details: serde_json::Value::Null,
            days_until_expiry: None,
            expiration_date: None,
        }
    }

    /// An `error` result for a check that could not complete.
    pub fn error(domain: impl Into<String>, monitor: MonitorKind, message: impl Into<String>) -> Self {
        CheckResult::new(domain, monitor, Status::Error, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        self.days_until_expiry = Some(days_until(expires_at, now));
        self.expiration_date = Some(expires_at.date_naive());
        self
    }

    /// Issue-store key: `domain:monitor`.
    pub fn issue_key(&self) -> String {
        issue_key(&self.domain, self.monitor)
    }
}

pub fn issue_key(domain: &str, monitor: MonitorKind) -> String {
    format!("{}:{}", domain, monitor.as_str())
}

/// Whole days between `now` and `expires_at`, truncated toward zero.
pub fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_days()
}

/// Maps days-until-expiry to a status: `< 7` critical, `< 30` warning, else ok.
pub fn classify_expiry(days_until_expiry: i64) -> Status {
    if days_until_expiry < EXPIRY_CRITICAL_DAYS {
        Status::Critical
    } else if days_until_expiry < EXPIRY_WARNING_DAYS {
        Status::Warning
    } else {
        Status::Ok
    }
}

/// Persisted alert state for one `domain:monitor` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub first_seen: DateTime<Utc>,
    pub last_sent: DateTime<Utc>,
    /// Times this issue has been alerted
    pub count: u32,
    pub monitor: MonitorKind,
    pub domain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_classify_expiry_thresholds() {
        assert_eq!(classify_expiry(5), Status::Critical);
        assert_eq!(classify_expiry(6), Status::Critical);
        assert_eq!(classify_expiry(7), Status::Warning);
        assert_eq!(classify_expiry(20), Status::Warning);
        assert_eq!(classify_expiry(29), Status::Warning);
        assert_eq!(classify_expiry(30), Status::Ok);
        assert_eq!(classify_expiry(200), Status::Ok);
        assert_eq!(classify_expiry(-3), Status::Critical);
    }

    #[test]
    fn test_status_severity_order() {
        assert!(Status::Ok.severity() < Status::Warning.severity());
        assert!(Status::Warning.severity() < Status::Critical.severity());
        assert_eq!(Status::Error.severity(), Status::Critical.severity());
        assert!(!Status::Ok.is_alertable());
        assert!(Status::Error.is_alertable());
    }

    #[test]
    fn test_monitor_target_policy() {
        assert_eq!(MonitorKind::Domain.target_policy(), TargetPolicy::Parent);
        assert_eq!(MonitorKind::Dns.target_policy(), TargetPolicy::Parent);
        assert_eq!(MonitorKind::Ssl.target_policy(), TargetPolicy::Connectable);
        assert_eq!(MonitorKind::Security.target_policy(), TargetPolicy::Connectable);
        assert_eq!(MonitorKind::Blacklist.target_policy(), TargetPolicy::Cleaned);
    }

    #[test]
    fn test_check_result_serializes_lowercase() {
        let result = CheckResult::new("example.com", MonitorKind::Ssl, Status::Warning, "Expires soon");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["monitor"], "ssl");
        assert_eq!(json["status"], "warning");
        assert!(json.get("details").is_none());
        assert_eq!(result.issue_key(), "example.com:ssl");
    }

    #[test]
    fn test_with_expiry_sets_days_and_date() {
        let now = Utc::now();
        let result = CheckResult::new("example.com", MonitorKind::Domain, Status::Ok, "")
            .with_expiry(now + Duration::days(20) + Duration::hours(1), now);
        assert_eq!(result.days_until_expiry, Some(20));
        assert!(result.expiration_date.is_some());
    }
}
