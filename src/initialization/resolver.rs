//! DNS resolver initialization.
//!
//! Builds the resilient resolver (shuffled public pool, DoH fallback) and the
//! system-configured transport used for RBL lookups.

use std::net::IpAddr;
use std::sync::Arc;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{
    DNS_QUERY_TIMEOUT, DNS_TOTAL_TIMEOUT, DOH_ENDPOINT, PUBLIC_RESOLVERS,
};
use crate::dns::{DnsTransport, DohTransport, PublicPoolTransport, ResilientResolver, SystemTransport};
use crate::error_handling::InitializationError;

/// Initializes the resilient resolver used by every connectivity-dependent check.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver pool
/// contains an unparsable address.
pub fn init_resolver(client: reqwest::Client) -> Result<Arc<ResilientResolver>, InitializationError> {
    let pool = PUBLIC_RESOLVERS
        .iter()
        .map(|ip| {
            ip.parse::<IpAddr>().map_err(|e| {
                InitializationError::DnsResolverError(format!("invalid resolver address {ip}: {e}"))
            })
        })
        .collect::<Result<Vec<IpAddr>, _>>()?;

    let primary = PublicPoolTransport::new(pool, DNS_QUERY_TIMEOUT, DNS_TOTAL_TIMEOUT);
    let fallback = DohTransport::new(client, DOH_ENDPOINT);
    Ok(Arc::new(ResilientResolver::new(
        Arc::new(primary),
        Arc::new(fallback),
    )))
}

/// Initializes a transport over the host's resolver configuration.
///
/// Falls back to the library default configuration when the system
/// configuration cannot be read (e.g. no `/etc/resolv.conf` in a container).
pub fn init_system_transport() -> Arc<dyn DnsTransport> {
    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            log::warn!("Failed to read system DNS configuration, using defaults: {e}");
            let mut opts = ResolverOpts::default();
            opts.timeout = DNS_QUERY_TIMEOUT;
            opts.attempts = 2;
            opts.ndots = 0;
            TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
        }
    };
    Arc::new(SystemTransport::new(resolver, DNS_TOTAL_TIMEOUT))
}
