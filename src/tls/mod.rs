//! TLS certificate inspection and legacy protocol probing.
//!
//! This module connects to HTTPS endpoints and extracts certificate details:
//! - Subject, issuer and issuer CN
//! - Expiry (`not_after`)
//! - Subject Alternative Names (SANs)
//! - Negotiated TLS version and key algorithm
//!
//! Uses `tokio-rustls` with the webpki root store for the verified handshake
//! and `x509-parser` for certificate parsing. TLS 1.0/1.1 acceptance is probed
//! separately with a raw ClientHello (see `legacy`).

mod extract;
mod legacy;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};

use extract::{common_name, extract_certificate_sans, key_algorithm_name};

pub use legacy::{accepts_legacy_protocol, LegacyProtocol};

/// Leaf certificate details from a verified handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateInfo {
    pub tls_version: String,
    pub subject: String,
    pub issuer: String,
    pub issuer_cn: Option<String>,
    pub not_after: DateTime<Utc>,
    pub subject_alternative_names: Vec<String>,
    pub key_algorithm: String,
}

fn client_config() -> Result<ClientConfig> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .context("Failed to configure TLS protocol versions")?
    .with_root_certificates(root_store)
    .with_no_client_auth();
    Ok(config)
}

/// Retrieves certificate information for `domain:443`.
///
/// # Errors
///
/// Returns an error if:
/// - The domain name is invalid
/// - TCP connection fails or times out
/// - TLS handshake or certificate verification fails
/// - Certificate parsing fails
pub async fn get_ssl_certificate_info(domain: &str) -> Result<CertificateInfo> {
    log::debug!("Attempting to get SSL info for domain: {domain}");

    let server_name = ServerName::try_from(domain.to_string())
        .map_err(|e| anyhow::anyhow!("Invalid domain name: {}", e))?;

    let sock = tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((domain, 443)),
    )
    .await
    .map_err(|_| {
        anyhow::anyhow!(
            "TCP connection timeout for {}:443 ({}s)",
            domain,
            TCP_CONNECT_TIMEOUT_SECS
        )
    })?
    .with_context(|| format!("Failed to connect to {}:443", domain))?;

    let connector = TlsConnector::from(Arc::new(client_config()?));
    let tls_stream = tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    .map_err(|_| {
        anyhow::anyhow!(
            "TLS handshake timeout for {} ({}s)",
            domain,
            TLS_HANDSHAKE_TIMEOUT_SECS
        )
    })?
    .with_context(|| format!("TLS connection failed for {}", domain))?;

    let connection = tls_stream.get_ref().1;
    let tls_version = connection
        .protocol_version()
        .map(|v| format!("{v:?}"))
        .unwrap_or_else(|| "Unknown".to_string());

    let leaf = connection
        .peer_certificates()
        .and_then(|certs| certs.first())
        .ok_or_else(|| anyhow::anyhow!("No certificate presented by {}", domain))?;

    let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to parse certificate for {}: {}", domain, e))?;
    let tbs_cert = &cert.tbs_certificate;

    let not_after = DateTime::from_timestamp(tbs_cert.validity.not_after.timestamp(), 0)
        .ok_or_else(|| anyhow::anyhow!("Certificate not_after out of range"))?;

    let sans = extract_certificate_sans(&cert);
    if !sans.is_empty() {
        log::debug!("Found {} SAN(s) for domain {}: {:?}", sans.len(), domain, sans);
    }

    Ok(CertificateInfo {
        tls_version,
        subject: tbs_cert.subject.to_string(),
        issuer: tbs_cert.issuer.to_string(),
        issuer_cn: common_name(&tbs_cert.issuer),
        not_after,
        subject_alternative_names: sans,
        key_algorithm: key_algorithm_name(&tbs_cert.subject_pki.algorithm.algorithm.to_string()),
    })
}
