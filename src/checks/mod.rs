//! Check adapters.
//!
//! One adapter per monitor kind. Every adapter takes the hostname chosen by
//! the target selector and returns a `CheckResult` labelled with that
//! hostname; the aggregator relabels it with the user-facing domain.
//!
//! An `Err` from `check` is an adapter fault. The aggregator converts it to a
//! `status=error` result, so adapters may use `?` freely.

mod blacklist;
mod certificate;
mod dns_auth;
mod expiry;
mod security;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::dns::{DnsTransport, ResilientResolver};
use crate::models::{CheckResult, MonitorKind};
use crate::whois::WhoisClient;

pub use blacklist::{is_listing_code, reverse_ipv4, BlacklistCheck};
pub use certificate::CertificateCheck;
pub use dns_auth::DnsAuthCheck;
pub use expiry::{expiry_message, ExpiryCheck};
pub use security::{evaluate_headers, HeaderFindings, SecurityCheck};

/// A probe for one monitor kind.
#[async_trait]
pub trait CheckAdapter: Send + Sync {
    fn kind(&self) -> MonitorKind;

    async fn check(&self, target: &str) -> Result<CheckResult>;
}

/// Shared clients the concrete adapters are built from.
#[derive(Clone)]
pub struct CheckContext {
    pub client: reqwest::Client,
    pub insecure_client: reqwest::Client,
    pub resolver: Arc<ResilientResolver>,
    /// Used for RBL zone queries
    pub rbl_transport: Arc<dyn DnsTransport>,
    pub whois: WhoisClient,
}

/// Builds the adapters for `kinds`, in the given order.
pub fn build_adapters(kinds: &[MonitorKind], ctx: &CheckContext) -> Vec<Arc<dyn CheckAdapter>> {
    kinds
        .iter()
        .map(|kind| -> Arc<dyn CheckAdapter> {
            match kind {
                MonitorKind::Domain => Arc::new(ExpiryCheck::new(ctx.whois.clone())),
                MonitorKind::Ssl => Arc::new(CertificateCheck),
                MonitorKind::Dns => Arc::new(DnsAuthCheck::new(ctx.resolver.clone())),
                MonitorKind::Security => Arc::new(SecurityCheck::new(
                    ctx.client.clone(),
                    ctx.insecure_client.clone(),
                )),
                MonitorKind::Blacklist => Arc::new(BlacklistCheck::new(
                    ctx.resolver.clone(),
                    ctx.rbl_transport.clone(),
                )),
            }
        })
        .collect()
}
