//! Configuration constants.
//!
//! Timeouts, provider pools, thresholds and other operational parameters.

use std::time::Duration;

// Resolver
/// Per-query timeout for each public resolver attempt
pub const DNS_QUERY_TIMEOUT: Duration = Duration::from_secs(2);
/// Overall deadline for one query against the shuffled pool
pub const DNS_TOTAL_TIMEOUT: Duration = Duration::from_secs(5);
/// DNS-over-HTTPS fallback endpoint (JSON API)
pub const DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Public resolvers spanning independent operators.
pub const PUBLIC_RESOLVERS: &[&str] = &[
    "1.1.1.1",         // Cloudflare
    "1.0.0.1",         // Cloudflare
    "8.8.8.8",         // Google
    "8.8.4.4",         // Google
    "9.9.9.9",         // Quad9
    "149.112.112.112", // Quad9
    "208.67.222.222",  // OpenDNS
    "64.6.64.6",       // Verisign
];

// Connection checks
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// HTTP request timeout in seconds (security header check, DoH, channels)
pub const HTTP_TIMEOUT_SECS: u64 = 5;
/// Timeout for each legacy protocol probe
pub const LEGACY_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
/// SMTP connection and command timeout
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(10);
/// Hard ceiling on a single adapter invocation
pub const ADAPTER_TIMEOUT: Duration = Duration::from_secs(30);

// WHOIS
/// Deadline for one RDAP/WHOIS lookup, referrals included
pub const WHOIS_TIMEOUT: Duration = Duration::from_secs(15);
/// WHOIS cache TTL: 7 days
pub const WHOIS_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
pub const WHOIS_CACHE_DIR: &str = ".whois_cache";

// Blacklist
pub const RBL_ZONES: &[&str] = &[
    "zen.spamhaus.org",
    "bl.spamcop.net",
    "cbl.abuseat.org",
    "dnsbl.sorbs.net",
    "b.barracudacentral.org",
    "dnsbl-1.uceprotect.net",
];
/// RBL queries in flight at once per domain
pub const RBL_CONCURRENCY: usize = 3;

// Thresholds
pub const EXPIRY_CRITICAL_DAYS: i64 = 7;
pub const EXPIRY_WARNING_DAYS: i64 = 30;

// Alerting
/// Minimum hours between repeat alerts for a still-open issue
pub const DEFAULT_RESEND_AFTER_HOURS: i64 = 24;
/// Detail lines shown per digest entry
pub const DIGEST_DETAIL_LINES: usize = 3;
/// A store lock file older than this is left over from a crashed cycle
pub const STATE_LOCK_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

// Defaults for file-based settings
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_STATE_FILE: &str = "reports/notification_state.json";
pub const DEFAULT_SMTP_PORT: u16 = 587;

pub const USER_AGENT: &str = concat!("domain_watch/", env!("CARGO_PKG_VERSION"));
