//! WHOIS/RDAP domain lookup using the `whois-service` crate.
//!
//! `whois-service` tries RDAP first and falls back to WHOIS, discovers the
//! registry through the IANA bootstrap and rate-limits per server. Results
//! with an expiration date are cached on disk for seven days.

mod cache;
mod parse;
mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::{WHOIS_CACHE_DIR, WHOIS_TIMEOUT};

pub use types::WhoisRecord;

use cache::{load_from_cache, save_to_cache};
use parse::convert_parsed_data;

/// Where uncached registration data comes from.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<WhoisRecord>;
}

/// Live lookups through `whois_service::WhoisClient`.
pub struct WhoisServiceSource;

#[async_trait]
impl WhoisSource for WhoisServiceSource {
    async fn fetch(&self, domain: &str) -> Result<WhoisRecord> {
        // The client is lightweight; build one per lookup
        let client = whois_service::WhoisClient::new()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create WHOIS client: {}", e))?;
        let response = client
            .lookup(domain)
            .await
            .map_err(|e| anyhow::anyhow!("WHOIS lookup failed for {}: {}", domain, e))?;
        Ok(convert_parsed_data(&response))
    }
}

/// Cached WHOIS lookups.
#[derive(Clone)]
pub struct WhoisClient {
    source: Arc<dyn WhoisSource>,
    timeout: Duration,
    cache_dir: PathBuf,
}

impl Default for WhoisClient {
    fn default() -> Self {
        WhoisClient {
            source: Arc::new(WhoisServiceSource),
            timeout: WHOIS_TIMEOUT,
            cache_dir: PathBuf::from(WHOIS_CACHE_DIR),
        }
    }
}

impl WhoisClient {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        WhoisClient {
            cache_dir: cache_dir.into(),
            ..Default::default()
        }
    }

    /// Replaces the live lookup (used by tests).
    pub fn with_source(mut self, source: Arc<dyn WhoisSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Looks up `domain`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or exceeds the deadline. An
    /// unreadable cache entry is ignored.
    pub async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
        match load_from_cache(&self.cache_dir, domain) {
            Ok(Some(record)) => {
                log::debug!("WHOIS cache hit for {}", domain);
                return Ok(record);
            }
            Ok(None) => {}
            Err(e) => log::debug!("Ignoring unreadable WHOIS cache for {domain}: {e:#}"),
        }

        log::info!("Starting WHOIS lookup for domain: {}", domain);
        let record = tokio::time::timeout(self.timeout, self.source.fetch(domain))
            .await
            .with_context(|| format!("WHOIS lookup for {domain} timed out"))??;

        if record.expiration_date.is_some() {
            if let Err(e) = save_to_cache(&self.cache_dir, domain, &record) {
                log::warn!("Failed to cache WHOIS result for {domain}: {e:#}");
            }
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        record: WhoisRecord,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(record: WhoisRecord) -> Arc<Self> {
            Arc::new(FakeSource {
                record,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WhoisSource for FakeSource {
        async fn fetch(&self, _domain: &str) -> Result<WhoisRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    struct SlowSource;

    #[async_trait]
    impl WhoisSource for SlowSource {
        async fn fetch(&self, _domain: &str) -> Result<WhoisRecord> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(WhoisRecord::default())
        }
    }

    #[tokio::test]
    async fn test_lookup_caches_records_with_expiration() {
        let source = FakeSource::new(WhoisRecord {
            expiration_date: Utc.with_ymd_and_hms(2030, 8, 13, 4, 0, 0).single(),
            registrar: Some("Example Registrar".to_string()),
            ..Default::default()
        });
        let cache = tempfile::tempdir().unwrap();
        let client = WhoisClient::new(cache.path()).with_source(source.clone());

        let record = client.lookup("example.com").await.unwrap();
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar"));

        let cached = client.lookup("example.com").await.unwrap();
        assert_eq!(cached, record);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(cache::cache_file(cache.path(), "example.com").exists());
    }

    #[tokio::test]
    async fn test_lookup_without_expiration_is_not_cached() {
        let source = FakeSource::new(WhoisRecord::default());
        let cache = tempfile::tempdir().unwrap();
        let client = WhoisClient::new(cache.path()).with_source(source.clone());

        assert_eq!(client.lookup("nothing.test").await.unwrap().expiration_date, None);
        client.lookup("nothing.test").await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(std::fs::read_dir(cache.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_lookup_times_out() {
        let cache = tempfile::tempdir().unwrap();
        let client = WhoisClient::new(cache.path())
            .with_source(Arc::new(SlowSource))
            .with_timeout(Duration::from_millis(20));

        let err = client.lookup("example.com").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
