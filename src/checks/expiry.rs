//! Registration expiry via WHOIS.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::CheckAdapter;
use crate::models::{classify_expiry, days_until, CheckResult, MonitorKind, Status};
use crate::whois::WhoisClient;

pub struct ExpiryCheck {
    whois: WhoisClient,
}

impl ExpiryCheck {
    pub fn new(whois: WhoisClient) -> Self {
        ExpiryCheck { whois }
    }
}

/// Summary line shared by the expiry and certificate checks.
pub fn expiry_message(subject: &str, days: i64) -> String {
    match days {
        d if d < 0 => format!("{subject} expired {} days ago", -d),
        0 => format!("{subject} expires today"),
        1 => format!("{subject} expires in 1 day"),
        d => format!("{subject} expires in {d} days"),
    }
}

#[async_trait]
impl CheckAdapter for ExpiryCheck {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Domain
    }

    async fn check(&self, target: &str) -> Result<CheckResult> {
        let record = self.whois.lookup(target).await?;

        let Some(expires_at) = record.expiration_date else {
            return Ok(CheckResult::error(
                target,
                MonitorKind::Domain,
                "Could not retrieve expiration date",
            ));
        };

        let now = Utc::now();
        let days = days_until(expires_at, now);
        let status = classify_expiry(days);
        if status != Status::Ok {
            log::warn!("{target}: registration expires in {days} days");
        }

        Ok(CheckResult::new(
            target,
            MonitorKind::Domain,
            status,
            expiry_message("Domain", days),
        )
        .with_details(json!({
            "registrar": record.registrar,
            "creation_date": record.creation_date.map(|d| d.to_rfc3339()),
            "nameservers": record.nameservers,
            "status": record.status,
        }))
        .with_expiry(expires_at, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::{WhoisRecord, WhoisSource};
    use std::sync::Arc;

    struct FixedSource(WhoisRecord);

    #[async_trait]
    impl WhoisSource for FixedSource {
        async fn fetch(&self, _domain: &str) -> Result<WhoisRecord> {
            Ok(self.0.clone())
        }
    }

    fn check_with(record: WhoisRecord, cache: &std::path::Path) -> ExpiryCheck {
        ExpiryCheck::new(WhoisClient::new(cache).with_source(Arc::new(FixedSource(record))))
    }

    #[tokio::test]
    async fn test_near_expiry_is_critical() {
        let cache = tempfile::tempdir().unwrap();
        let record = WhoisRecord {
            expiration_date: Some(Utc::now() + chrono::Duration::days(5) + chrono::Duration::hours(1)),
            registrar: Some("Example Registrar".to_string()),
            ..Default::default()
        };
        let result = check_with(record, cache.path()).check("example.com").await.unwrap();
        assert_eq!(result.status, Status::Critical);
        assert_eq!(result.days_until_expiry, Some(5));
        assert_eq!(result.details["registrar"], "Example Registrar");
    }

    #[tokio::test]
    async fn test_missing_expiration_is_error() {
        let cache = tempfile::tempdir().unwrap();
        let result = check_with(WhoisRecord::default(), cache.path())
            .check("example.com")
            .await
            .unwrap();
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.message, "Could not retrieve expiration date");
    }

    #[test]
    fn test_expiry_message() {
        assert_eq!(expiry_message("Domain", 20), "Domain expires in 20 days");
        assert_eq!(expiry_message("Certificate", 1), "Certificate expires in 1 day");
        assert_eq!(expiry_message("Domain", 0), "Domain expires today");
        assert_eq!(expiry_message("Domain", -4), "Domain expired 4 days ago");
    }
}
