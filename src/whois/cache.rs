//! WHOIS cache management.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::types::{WhoisCacheEntry, WhoisRecord};
use crate::config::WHOIS_CACHE_TTL_SECS;

pub(crate) fn cache_file(cache_path: &Path, domain: &str) -> PathBuf {
    cache_path.join(format!("{}.json", domain.replace('.', "_")))
}

/// Loads a cached WHOIS record from disk. Expired entries are deleted.
pub(crate) fn load_from_cache(cache_path: &Path, domain: &str) -> Result<Option<WhoisRecord>> {
    let cache_file = cache_file(cache_path, domain);

    if !cache_file.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&cache_file).context("Failed to read cache file")?;
    let entry: WhoisCacheEntry =
        serde_json::from_str(&content).context("Failed to parse cache file")?;

    let age = entry.cached_at.elapsed().unwrap_or_default();
    if age.as_secs() > WHOIS_CACHE_TTL_SECS || entry.domain != domain {
        let _ = std::fs::remove_file(&cache_file);
        return Ok(None);
    }

    Ok(Some(entry.record))
}

/// Saves a WHOIS record to the disk cache.
pub(crate) fn save_to_cache(cache_path: &Path, domain: &str, record: &WhoisRecord) -> Result<()> {
    std::fs::create_dir_all(cache_path).context("Failed to create cache directory")?;

    let entry = WhoisCacheEntry {
        record: record.clone(),
        cached_at: SystemTime::now(),
        domain: domain.to_string(),
    };

    let content =
        serde_json::to_string_pretty(&entry).context("Failed to serialize cache entry")?;
    std::fs::write(cache_file(cache_path, domain), content).context("Failed to write cache file")?;

    Ok(())
}
