//! Error type definitions.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing a DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// DNS resolution failure.
///
/// `NotFound` is an authoritative negative answer (NXDOMAIN or no records of the
/// requested type) and must not trigger a fallback. `Inconclusive` covers
/// timeouts, refusals, network and decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no {record_type} record for {name}")]
    NotFound { name: String, record_type: String },

    #[error("lookup of {name} inconclusive: {reason}")]
    Inconclusive { name: String, reason: String },

    #[error("no address found for {0}")]
    NoAddress(String),
}

impl ResolutionError {
    pub fn not_found(name: &str, record_type: impl ToString) -> Self {
        ResolutionError::NotFound {
            name: name.to_string(),
            record_type: record_type.to_string(),
        }
    }

    pub fn inconclusive(name: &str, reason: impl ToString) -> Self {
        ResolutionError::Inconclusive {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for answers that prove the name or record does not exist.
    pub fn is_authoritative_negative(&self) -> bool {
        matches!(
            self,
            ResolutionError::NotFound { .. } | ResolutionError::NoAddress(_)
        )
    }
}

/// Issue-store read/write failures. Never fatal to a cycle.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to read issue store {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("issue store {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write issue store {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("issue store {0} is locked by another cycle")]
    Locked(PathBuf),
}

/// Config file failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}
