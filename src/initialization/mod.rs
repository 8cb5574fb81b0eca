//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger (plain or JSON)
//! - HTTP clients (verifying and non-verifying)
//! - The resilient resolver and the system DNS transport
//! - The rustls crypto provider
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio_util::sync::CancellationToken;

// Re-export public API
pub use client::{init_client, init_insecure_client};
pub use logger::init_logger_with;
pub use resolver::{init_resolver, init_system_transport};

/// Initializes the crypto provider for TLS operations.
///
/// Configures the global crypto provider for `rustls`. This must be called before
/// any TLS connections are established.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}

/// Creates the cycle cancellation token and cancels it on Ctrl-C.
///
/// The aggregator checks the token between domains, so an interrupted cycle
/// finishes the domain in progress and then stops.
pub fn init_cancellation() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Received Ctrl-C, stopping after the current domain");
            signal_token.cancel();
        }
    });
    token
}
