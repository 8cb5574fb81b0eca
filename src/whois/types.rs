//! WHOIS data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Registration data for one domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// Registration expiry
    pub expiration_date: Option<DateTime<Utc>>,
    /// Domain creation date
    pub creation_date: Option<DateTime<Utc>>,
    /// Registrar name
    pub registrar: Option<String>,
    /// EPP status codes (e.g., "clientTransferProhibited")
    #[serde(default)]
    pub status: Vec<String>,
    /// Nameservers from the registry
    #[serde(default)]
    pub nameservers: Vec<String>,
}

/// A cached lookup, stored as one JSON file per domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WhoisCacheEntry {
    pub(crate) record: WhoisRecord,
    pub(crate) cached_at: SystemTime,
    pub(crate) domain: String,
}
