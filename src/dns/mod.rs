//! DNS resolution and record querying.
//!
//! This module provides async DNS operations:
//! - `DnsTransport` implementations: shuffled public resolver pool, the host's
//!   system resolver, and DNS-over-HTTPS
//! - `ResilientResolver`, which composes a primary transport with a single
//!   fallback and distinguishes authoritative negatives from inconclusive failures
//! - SPF/DMARC extraction from TXT answers

mod doh;
mod extract;
mod resolver;
mod transport;

// Re-export public API
pub use doh::DohTransport;
pub use extract::{extract_dmarc_record, extract_spf_record};
pub use resolver::ResilientResolver;
pub use transport::{DnsTransport, PublicPoolTransport, SystemTransport};

#[cfg(test)]
pub(crate) mod mock;
