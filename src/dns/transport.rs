//! DNS transports backed by `hickory-resolver`.
//!
//! A transport answers one query and classifies failures as authoritative
//! negative (`NotFound`) or `Inconclusive`. The resilient resolver composes a
//! primary and a fallback transport on top of this seam.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{
    NameServerConfigGroup, ResolverConfig, ResolverOpts, ServerOrderingStrategy,
};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::lookup::Lookup;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use rand::seq::SliceRandom;

use crate::error_handling::ResolutionError;

/// One way of answering a DNS query.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Returns the answer values (text form) for `name`/`record_type`.
    async fn query(&self, name: &str, record_type: RecordType)
        -> Result<Vec<String>, ResolutionError>;
}

/// Queries a pool of public resolvers, shuffled on every call.
///
/// Each call builds a resolver whose nameserver list is the shuffled pool in
/// user-provided order, so a filtered resolver is not always hit first.
pub struct PublicPoolTransport {
    pool: Vec<IpAddr>,
    query_timeout: Duration,
    total_timeout: Duration,
}

impl PublicPoolTransport {
    pub fn new(pool: Vec<IpAddr>, query_timeout: Duration, total_timeout: Duration) -> Self {
        PublicPoolTransport {
            pool,
            query_timeout,
            total_timeout,
        }
    }

    fn shuffled_pool(&self) -> Vec<IpAddr> {
        let mut pool = self.pool.clone();
        pool.shuffle(&mut rand::rng());
        pool
    }

    fn build_resolver(&self) -> TokioAsyncResolver {
        let pool = self.shuffled_pool();
        let group = NameServerConfigGroup::from_ips_clear(&pool, 53, true);
        let config = ResolverConfig::from_parts(None, vec![], group);

        let mut opts = ResolverOpts::default();
        opts.timeout = self.query_timeout;
        opts.attempts = 1;
        opts.ndots = 0;
        opts.cache_size = 0;
        opts.server_ordering_strategy = ServerOrderingStrategy::UserProvidedOrder;

        TokioAsyncResolver::tokio(config, opts)
    }
}

#[async_trait]
impl DnsTransport for PublicPoolTransport {
    fn name(&self) -> &str {
        "public-pool"
    }

    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        if self.pool.is_empty() {
            return Err(ResolutionError::inconclusive(name, "resolver pool is empty"));
        }
        let resolver = self.build_resolver();
        match tokio::time::timeout(self.total_timeout, resolver.lookup(name, record_type)).await {
            Ok(result) => answers_from_lookup(name, record_type, result),
            Err(_) => Err(ResolutionError::inconclusive(
                name,
                format!("deadline of {}s exceeded", self.total_timeout.as_secs()),
            )),
        }
    }
}

/// Uses the host's configured resolver. RBL zones often answer the local
/// resolver where public resolvers are refused.
pub struct SystemTransport {
    resolver: TokioAsyncResolver,
    total_timeout: Duration,
}

impl SystemTransport {
    pub fn new(resolver: TokioAsyncResolver, total_timeout: Duration) -> Self {
        SystemTransport {
            resolver,
            total_timeout,
        }
    }
}

#[async_trait]
impl DnsTransport for SystemTransport {
    fn name(&self) -> &str {
        "system"
    }

    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        match tokio::time::timeout(self.total_timeout, self.resolver.lookup(name, record_type))
            .await
        {
            Ok(result) => answers_from_lookup(name, record_type, result),
            Err(_) => Err(ResolutionError::inconclusive(name, "system resolver timed out")),
        }
    }
}

fn answers_from_lookup(
    name: &str,
    record_type: RecordType,
    result: Result<Lookup, ResolveError>,
) -> Result<Vec<String>, ResolutionError> {
    let lookup = result.map_err(|e| classify_resolve_error(name, record_type, &e))?;
    let answers: Vec<String> = lookup
        .iter()
        .filter(|rdata| rdata.record_type() == record_type)
        .map(rdata_to_string)
        .collect();
    if answers.is_empty() {
        return Err(ResolutionError::not_found(name, record_type));
    }
    Ok(answers)
}

/// NXDOMAIN and NODATA are authoritative; everything else (timeouts, SERVFAIL,
/// REFUSED, I/O, malformed responses) is inconclusive.
pub(crate) fn classify_resolve_error(
    name: &str,
    record_type: RecordType,
    err: &ResolveError,
) -> ResolutionError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match response_code {
            ResponseCode::NXDomain | ResponseCode::NoError => {
                ResolutionError::not_found(name, record_type)
            }
            other => ResolutionError::inconclusive(name, format!("server answered {other:?}")),
        },
        ResolveErrorKind::Timeout => ResolutionError::inconclusive(name, "timed out"),
        _ => ResolutionError::inconclusive(name, err),
    }
}

fn rdata_to_string(rdata: &RData) -> String {
    match rdata {
        // TXT records can contain multiple strings - join them
        RData::TXT(txt) => txt
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect::<Vec<String>>()
            .join(""),
        other => other.to_string(),
    }
}
