//! Mock results for `--demo` runs.

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use serde_json::json;

use crate::models::{classify_expiry, CheckResult, MonitorKind, Status};

pub const DEMO_DOMAINS: &[&str] = &[
    "prod-api.com",
    "staging-app.net",
    "legacy-system.org",
    "marketing-site.com",
    "internal-tool.io",
];

const LISTED_DEMO_DOMAIN: &str = "legacy-system.org";

/// Plausible results for the demo domains: random expiry horizons, healthy
/// DNS, and one blacklisted domain.
pub fn demo_results(now: DateTime<Utc>) -> Vec<CheckResult> {
    let mut rng = rand::rng();
    let mut results = Vec::with_capacity(DEMO_DOMAINS.len() * 4);

    for domain in DEMO_DOMAINS {
        let days = *[5_i64, 45, 200, 15].choose(&mut rng).unwrap_or(&45);
        results.push(
            CheckResult::new(
                *domain,
                MonitorKind::Domain,
                classify_expiry(days),
                format!("Domain expires in {days} days"),
            )
            .with_expiry(now + Duration::days(days) + Duration::hours(1), now),
        );

        let ssl_days = *[3_i64, 100, 365].choose(&mut rng).unwrap_or(&100);
        results.push(
            CheckResult::new(
                *domain,
                MonitorKind::Ssl,
                classify_expiry(ssl_days),
                format!("Certificate expires in {ssl_days} days"),
            )
            .with_expiry(now + Duration::days(ssl_days) + Duration::hours(1), now),
        );

        results.push(
            CheckResult::new(*domain, MonitorKind::Dns, Status::Ok, "SPF and DMARC present")
                .with_details(json!({
                    "spf": "v=spf1 include:_spf.google.com ~all",
                    "dmarc": "v=DMARC1; p=reject;",
                })),
        );

        let blacklist = if *domain == LISTED_DEMO_DOMAIN {
            CheckResult::new(
                *domain,
                MonitorKind::Blacklist,
                Status::Critical,
                "Listed in 2 blacklists",
            )
            .with_details(json!({
                "ip": "192.0.2.10",
                "listed_in": ["zen.spamhaus.org", "dnsbl.sorbs.net"],
            }))
        } else {
            CheckResult::new(
                *domain,
                MonitorKind::Blacklist,
                Status::Ok,
                "Not listed in any common RBL",
            )
        };
        results.push(blacklist);
    }

    results
}
