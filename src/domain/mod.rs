//! Hostname normalization and per-domain target selection.
//!
//! Every configured domain is turned into a `HostnameTriple` once per cycle:
//! - `cleaned` - the bare lowercase hostname
//! - `parent` - the last two labels, used for WHOIS and DNS-auth queries
//! - `connectable` - a name that actually resolves, used for connection checks
//!
//! `parent_domain()` is a naive SLD+TLD heuristic: it is not Public Suffix List
//! aware and yields `co.uk` for `foo.co.uk`. This is a known limitation.

use std::sync::Arc;

use crate::dns::ResilientResolver;
use crate::models::TargetPolicy;

/// The three hostnames derived from one configured domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameTriple {
    /// As configured by the user
    pub raw: String,
    pub cleaned: String,
    pub parent: String,
    /// `None` when neither `cleaned` nor `www.<cleaned>` resolves
    pub connectable: Option<String>,
}

impl HostnameTriple {
    /// The hostname a monitor with `policy` should query, if any.
    pub fn target_for(&self, policy: TargetPolicy) -> Option<&str> {
        match policy {
            TargetPolicy::Parent => Some(self.parent.as_str()),
            TargetPolicy::Cleaned => Some(self.cleaned.as_str()),
            TargetPolicy::Connectable => self.connectable.as_deref(),
        }
    }
}

/// Strips scheme, path, query and port, then lowercases and trims.
///
/// The host is taken verbatim: no IDNA, percent-decoding or IPv4 shorthand
/// normalization is applied.
///
/// ```
/// use domain_watch::domain::clean_domain;
/// assert_eq!(clean_domain("https://www.Example.com:8443/status"), "www.example.com");
/// ```
pub fn clean_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = match trimmed.split_once("://") {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    let host_port = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    // [v6]:port
    if let Some(bracketed) = host_port.strip_prefix('[') {
        if let Some((host, _)) = bracketed.split_once(']') {
            return host.to_lowercase();
        }
    }

    let host = match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    };
    host.trim().to_lowercase()
}

/// Joins the last two labels of `cleaned`; names with two labels or fewer are
/// returned unchanged.
pub fn parent_domain(cleaned: &str) -> String {
    let labels: Vec<&str> = cleaned.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        cleaned.to_string()
    }
}

/// Derives hostname triples, probing resolvability through the resilient resolver.
pub struct TargetSelector {
    resolver: Arc<ResilientResolver>,
}

impl TargetSelector {
    pub fn new(resolver: Arc<ResilientResolver>) -> Self {
        TargetSelector { resolver }
    }

    /// Builds the triple for `raw`. Resolves at most two names: `cleaned`, then
    /// `www.<cleaned>` if the first fails.
    pub async fn select(&self, raw: &str) -> HostnameTriple {
        let cleaned = clean_domain(raw);
        let parent = parent_domain(&cleaned);
        let connectable = self.find_connectable(&cleaned).await;
        if connectable.is_none() {
            log::warn!("{cleaned}: neither {cleaned} nor www.{cleaned} resolves");
        }
        HostnameTriple {
            raw: raw.to_string(),
            cleaned,
            parent,
            connectable,
        }
    }

    async fn find_connectable(&self, cleaned: &str) -> Option<String> {
        if cleaned.is_empty() {
            return None;
        }
        match self.resolver.get_ip(cleaned).await {
            Ok(ip) => {
                log::debug!("{cleaned} resolves to {ip}");
                return Some(cleaned.to_string());
            }
            Err(e) => log::debug!("{cleaned} not directly resolvable: {e}"),
        }

        let www = format!("www.{cleaned}");
        match self.resolver.get_ip(&www).await {
            Ok(ip) => {
                log::info!("{cleaned}: using {www} ({ip}) for connection checks");
                Some(www)
            }
            Err(e) => {
                log::debug!("{www} not resolvable: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests;
