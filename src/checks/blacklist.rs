//! RBL membership of the domain's IPv4 address.

use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use hickory_resolver::proto::rr::RecordType;
use serde_json::json;

use super::CheckAdapter;
use crate::config::{RBL_CONCURRENCY, RBL_ZONES};
use crate::dns::{DnsTransport, ResilientResolver};
use crate::models::{CheckResult, MonitorKind, Status};

/// Whether an RBL answer is a real listing.
///
/// `127.255.255.x` means the zone refused the query (typical through public
/// resolvers) and `127.0.0.10`/`127.0.0.11` are policy (PBL) listings of
/// dynamic address space; neither counts.
pub fn is_listing_code(answer: &str) -> bool {
    if answer.starts_with("127.255.255.") {
        return false;
    }
    !matches!(answer, "127.0.0.10" | "127.0.0.11")
}

/// `1.2.3.4` -> `4.3.2.1`. `None` for anything that is not an IPv4 address.
pub fn reverse_ipv4(ip: &str) -> Option<String> {
    let addr: Ipv4Addr = ip.parse().ok()?;
    let [a, b, c, d] = addr.octets();
    Some(format!("{d}.{c}.{b}.{a}"))
}

enum ZoneOutcome {
    Listed(Vec<String>),
    Clean,
    Failed(String),
}

pub struct BlacklistCheck {
    resolver: Arc<ResilientResolver>,
    rbl: Arc<dyn DnsTransport>,
    zones: Vec<String>,
}

impl BlacklistCheck {
    pub fn new(resolver: Arc<ResilientResolver>, rbl: Arc<dyn DnsTransport>) -> Self {
        BlacklistCheck {
            resolver,
            rbl,
            zones: RBL_ZONES.iter().map(|z| z.to_string()).collect(),
        }
    }

    async fn query_zone(&self, reversed: &str, zone: &str) -> ZoneOutcome {
        let name = format!("{reversed}.{zone}");
        match self.rbl.query(&name, RecordType::A).await {
            Ok(answers) => {
                for refused in answers.iter().filter(|a| a.starts_with("127.255.255.")) {
                    log::warn!("RBL {zone} refused the query (code {refused})");
                }
                let codes: Vec<String> = answers.into_iter().filter(|a| is_listing_code(a)).collect();
                if codes.is_empty() {
                    ZoneOutcome::Clean
                } else {
                    ZoneOutcome::Listed(codes)
                }
            }
            Err(e) if e.is_authoritative_negative() => ZoneOutcome::Clean,
            Err(e) => ZoneOutcome::Failed(format!("{zone}: {e}")),
        }
    }
}

#[async_trait]
impl CheckAdapter for BlacklistCheck {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Blacklist
    }

    async fn check(&self, target: &str) -> Result<CheckResult> {
        let ip = match self.resolver.get_ip(target).await {
            Ok(ip) => ip,
            Err(e) => {
                return Ok(CheckResult::error(
                    target,
                    MonitorKind::Blacklist,
                    format!("Could not resolve domain: {e}"),
                ))
            }
        };
        let Some(reversed) = reverse_ipv4(&ip) else {
            return Ok(CheckResult::error(
                target,
                MonitorKind::Blacklist,
                format!("Not an IPv4 address: {ip}"),
            ));
        };

        let outcomes: Vec<(String, ZoneOutcome)> = stream::iter(self.zones.iter().cloned())
            .map(|zone: String| {
                let reversed = reversed.as_str();
                async move {
                    let outcome = self.query_zone(reversed, &zone).await;
                    (zone, outcome)
                }
            })
            .buffered(RBL_CONCURRENCY)
            .collect()
            .await;

        let mut listed_in = Vec::new();
        let mut errors = Vec::new();
        for (zone, outcome) in outcomes {
            match outcome {
                ZoneOutcome::Listed(codes) => {
                    log::warn!("{target} ({ip}) listed in {zone}: {}", codes.join(", "));
                    listed_in.push(zone);
                }
                ZoneOutcome::Clean => {}
                ZoneOutcome::Failed(reason) => errors.push(reason),
            }
        }

        let (status, message) = if !listed_in.is_empty() {
            (Status::Critical, format!("Listed in {} blacklists", listed_in.len()))
        } else if !self.zones.is_empty() && errors.len() == self.zones.len() {
            // No zone answered, so "not listed" was never established
            (Status::Error, format!("All {} RBL lookups failed", errors.len()))
        } else {
            (Status::Ok, "Not listed in any common RBL".to_string())
        };

        Ok(CheckResult::new(target, MonitorKind::Blacklist, status, message).with_details(json!({
            "ip": ip,
            "listed_in": listed_in,
            "checked_rbls": self.zones.len(),
            "errors": errors,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::mock::MockTransport;
    use crate::error_handling::ResolutionError;

    fn check_with(rbl: MockTransport) -> (BlacklistCheck, Arc<MockTransport>) {
        let resolver = Arc::new(ResilientResolver::new(
            Arc::new(MockTransport::answering("primary", &["192.0.2.99"])),
            Arc::new(MockTransport::answering("fallback", &[])),
        ));
        let rbl = Arc::new(rbl);
        (BlacklistCheck::new(resolver, rbl.clone()), rbl)
    }

    #[test]
    fn test_is_listing_code_filters_reserved_answers() {
        assert!(is_listing_code("127.0.0.2"));
        assert!(is_listing_code("127.0.0.4"));
        assert!(!is_listing_code("127.255.255.254"));
        assert!(!is_listing_code("127.255.255.252"));
        assert!(!is_listing_code("127.0.0.10"));
        assert!(!is_listing_code("127.0.0.11"));
    }

    #[test]
    fn test_reverse_ipv4() {
        assert_eq!(reverse_ipv4("1.2.3.4").as_deref(), Some("4.3.2.1"));
        assert_eq!(reverse_ipv4("2001:db8::1"), None);
    }

    #[tokio::test]
    async fn test_not_listed_anywhere_is_ok() {
        let (check, rbl) = check_with(MockTransport::failing(
            "rbl",
            ResolutionError::not_found("x", "A"),
        ));
        let result = check.check("example.com").await.unwrap();
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.details["ip"], "192.0.2.99");
        assert_eq!(rbl.call_count(), RBL_ZONES.len());
        assert!(rbl.queried().contains(&"99.2.0.192.zen.spamhaus.org".to_string()));
    }

    #[tokio::test]
    async fn test_listing_is_critical_and_policy_codes_ignored() {
        let (check, _) = check_with(
            MockTransport::failing("rbl", ResolutionError::not_found("x", "A"))
                .with("99.2.0.192.bl.spamcop.net", Ok(vec!["127.0.0.2".to_string()]))
                .with("99.2.0.192.zen.spamhaus.org", Ok(vec!["127.0.0.11".to_string()]))
                .with("99.2.0.192.cbl.abuseat.org", Ok(vec!["127.255.255.254".to_string()])),
        );
        let result = check.check("example.com").await.unwrap();
        assert_eq!(result.status, Status::Critical);
        assert_eq!(result.message, "Listed in 1 blacklists");
        assert_eq!(result.details["listed_in"], json!(["bl.spamcop.net"]));
    }

    #[tokio::test]
    async fn test_all_zones_unreachable_is_error() {
        let (check, rbl) = check_with(MockTransport::failing(
            "rbl",
            ResolutionError::inconclusive("x", "timed out"),
        ));
        let result = check.check("example.com").await.unwrap();
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.message, format!("All {} RBL lookups failed", RBL_ZONES.len()));
        assert_eq!(result.details["errors"].as_array().map(Vec::len), Some(RBL_ZONES.len()));
        assert_eq!(rbl.call_count(), RBL_ZONES.len());
    }

    #[tokio::test]
    async fn test_some_zones_unreachable_is_still_ok() {
        let (check, _) = check_with(
            MockTransport::failing("rbl", ResolutionError::inconclusive("x", "timed out"))
                .with("99.2.0.192.zen.spamhaus.org", Err(ResolutionError::not_found("x", "A"))),
        );
        let result = check.check("example.com").await.unwrap();
        assert_eq!(result.status, Status::Ok);
        assert_eq!(
            result.details["errors"].as_array().map(Vec::len),
            Some(RBL_ZONES.len() - 1)
        );
    }

    #[tokio::test]
    async fn test_unresolvable_domain_is_error() {
        let resolver = Arc::new(ResilientResolver::new(
            Arc::new(MockTransport::failing("primary", ResolutionError::not_found("x", "A"))),
            Arc::new(MockTransport::answering("fallback", &[])),
        ));
        let check = BlacklistCheck::new(resolver, Arc::new(MockTransport::answering("rbl", &[])));
        let result = check.check("gone.example").await.unwrap();
        assert_eq!(result.status, Status::Error);
        assert!(result.message.starts_with("Could not resolve domain"));
    }
}
