//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{HTTP_TIMEOUT_SECS, USER_AGENT};

/// Initializes the shared HTTP client.
///
/// Used for DoH, notification channels, heartbeat and API upload, and the
/// verified leg of the security check. Rustls backend, 5s timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
}

/// Initializes a client that skips certificate verification.
///
/// Only used by the security check to tell "certificate untrusted" apart from
/// "host unreachable" after a verified request failed.
pub fn init_insecure_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(true)
        .build()
}
