//! Resilient resolution: primary transport with a single DoH fallback.

use std::sync::Arc;

use hickory_resolver::proto::rr::RecordType;

use super::transport::DnsTransport;
use crate::error_handling::ResolutionError;

/// Resolver used by every check that needs connectivity.
///
/// An authoritative negative from the primary transport is returned as-is.
/// An inconclusive failure triggers exactly one attempt on the fallback
/// transport; if that fails too, the result is inconclusive.
pub struct ResilientResolver {
    primary: Arc<dyn DnsTransport>,
    fallback: Arc<dyn DnsTransport>,
}

impl ResilientResolver {
    pub fn new(primary: Arc<dyn DnsTransport>, fallback: Arc<dyn DnsTransport>) -> Self {
        ResilientResolver { primary, fallback }
    }

    /// Resolves `name` for `record_type`.
    ///
    /// # Errors
    ///
    /// `ResolutionError::NotFound` when the name or record does not exist,
    /// `ResolutionError::Inconclusive` when neither transport produced an answer.
    pub async fn resolve(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        let primary_err = match self.primary.query(name, record_type).await {
            Ok(answers) => return Ok(answers),
            Err(e) if e.is_authoritative_negative() => {
                log::debug!("{} {record_type} via {}: {e}", name, self.primary.name());
                return Err(e);
            }
            Err(e) => e,
        };

        log::debug!(
            "{} {record_type} inconclusive via {} ({primary_err}), trying {}",
            name,
            self.primary.name(),
            self.fallback.name()
        );

        match self.fallback.query(name, record_type).await {
            Ok(answers) => Ok(answers),
            Err(fallback_err) => {
                log::warn!(
                    "Resolution of {name} {record_type} failed on all transports: {fallback_err}"
                );
                // A fallback NXDOMAIN after a failed primary is still reported
                // as inconclusive: the primary never confirmed it.
                Err(ResolutionError::inconclusive(
                    name,
                    format!("{primary_err}; fallback: {fallback_err}"),
                ))
            }
        }
    }

    /// Returns the first IPv4 address of `domain`.
    ///
    /// # Errors
    ///
    /// `ResolutionError::NoAddress` if the answer set is empty, otherwise
    /// whatever `resolve` returned.
    pub async fn get_ip(&self, domain: &str) -> Result<String, ResolutionError> {
        self.resolve(domain, RecordType::A)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResolutionError::NoAddress(domain.to_string()))
    }
}
