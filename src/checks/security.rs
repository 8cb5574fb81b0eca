//! HTTP security posture: headers, version disclosure and legacy TLS.

use std::error::Error as _;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::{json, Map, Value};

use super::CheckAdapter;
use crate::config::{
    DISCLOSURE_HEADERS, HEADER_CONTENT_SECURITY_POLICY, HEADER_STRICT_TRANSPORT_SECURITY,
    SECURITY_HEADERS,
};
use crate::models::{CheckResult, MonitorKind, Status};
use crate::tls::{accepts_legacy_protocol, LegacyProtocol};

/// What the response headers reveal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFindings {
    /// Present security headers by name (`None` when absent)
    pub headers: Map<String, Value>,
    pub issues: Vec<String>,
    pub info_leakage: Vec<String>,
}

/// Flags missing HSTS/CSP and software version disclosure.
pub fn evaluate_headers(headers: &HeaderMap) -> HeaderFindings {
    let mut findings = HeaderFindings::default();

    for name in SECURITY_HEADERS {
        let value = headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(|v| Value::String(v.to_string()))
            .unwrap_or(Value::Null);
        findings.headers.insert(name.to_string(), value);
    }

    if !headers.contains_key(HEADER_STRICT_TRANSPORT_SECURITY) {
        findings.issues.push("Missing HSTS (OWASP A05)".to_string());
    }
    if !headers.contains_key(HEADER_CONTENT_SECURITY_POLICY) {
        findings
            .issues
            .push("Missing CSP (OWASP A05 - XSS Risk)".to_string());
    }

    for (name, label) in DISCLOSURE_HEADERS {
        if let Some(value) = headers.get(*name) {
            let value = String::from_utf8_lossy(value.as_bytes());
            findings.info_leakage.push(format!("{label}: {value}"));
        }
    }
    findings.issues.extend(findings.info_leakage.iter().cloned());

    findings
}

/// True when the error chain points at TLS rather than plain connectivity.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if ["certificate", "tls", "handshake", "ssl"]
            .iter()
            .any(|needle| text.contains(needle))
        {
            return true;
        }
        source = inner.source();
    }
    false
}

pub struct SecurityCheck {
    client: reqwest::Client,
    insecure_client: reqwest::Client,
    scheme: &'static str,
    probe_legacy: bool,
}

impl SecurityCheck {
    pub fn new(client: reqwest::Client, insecure_client: reqwest::Client) -> Self {
        SecurityCheck {
            client,
            insecure_client,
            scheme: "https",
            probe_legacy: true,
        }
    }

    /// Plain-HTTP variant without the TLS probe, for tests against local servers.
    pub fn plain_http(client: reqwest::Client) -> Self {
        SecurityCheck {
            insecure_client: client.clone(),
            client,
            scheme: "http",
            probe_legacy: false,
        }
    }

    async fn weak_protocols(&self, target: &str) -> Vec<String> {
        if !self.probe_legacy {
            return Vec::new();
        }
        let mut weak = Vec::new();
        for protocol in [LegacyProtocol::Tls10, LegacyProtocol::Tls11] {
            match accepts_legacy_protocol(target, 443, protocol).await {
                Ok(true) => weak.push(protocol.label().to_string()),
                Ok(false) => {}
                Err(e) => log::debug!("{target}: {} probe failed: {e:#}", protocol.label()),
            }
        }
        weak
    }

    async fn classify_failure(&self, target: &str, url: &str, err: reqwest::Error) -> CheckResult {
        if err.is_timeout() {
            log::warn!("Timeout connecting to {target}");
            return CheckResult::new(target, MonitorKind::Security, Status::Warning, "Connection Timeout");
        }

        let verified_err = err.to_string();
        let tls_failure = is_tls_failure(&err);
        if tls_failure {
            // Reachable without verification means the chain or root is the problem
            if self.insecure_client.head(url).send().await.is_ok() {
                log::warn!("SSL valid but untrusted for {target}: {verified_err}");
                return CheckResult::new(
                    target,
                    MonitorKind::Security,
                    Status::Warning,
                    "SSL Certificate Untrusted (Check Chain/Root)",
                )
                .with_details(Value::String(verified_err));
            }
            log::warn!("SSL verification failed for {target}: {verified_err}");
            return CheckResult::new(
                target,
                MonitorKind::Security,
                Status::Critical,
                "SSL Verification Failed",
            )
            .with_details(Value::String(verified_err));
        }

        log::warn!("Could not check security headers for {target}: {verified_err}");
        CheckResult::error(target, MonitorKind::Security, "Connection Failed")
            .with_details(Value::String(verified_err))
    }
}

#[async_trait]
impl CheckAdapter for SecurityCheck {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Security
    }

    async fn check(&self, target: &str) -> Result<CheckResult> {
        let url = format!("{}://{}", self.scheme, target);
        let response = match self.client.head(&url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(self.classify_failure(target, &url, e).await),
        };

        let mut findings = evaluate_headers(response.headers());
        let weak_protocols = self.weak_protocols(target).await;
        if !weak_protocols.is_empty() {
            findings.issues.push(format!(
                "Weak Protocols Accepted: {} (OWASP A02: Cryptographic Failures)",
                weak_protocols.join(", ")
            ));
        }

        let status = if !weak_protocols.is_empty() {
            Status::Critical
        } else if !findings.issues.is_empty() {
            Status::Warning
        } else {
            Status::Ok
        };
        let message = if findings.issues.is_empty() {
            "Secure".to_string()
        } else {
            format!("{} Security Issues", findings.issues.len())
        };

        Ok(
            CheckResult::new(target, MonitorKind::Security, status, message).with_details(json!({
                "issues": findings.issues,
                "headers": findings.headers,
                "info_leakage": findings.info_leakage,
                "weak_protocols": weak_protocols,
            })),
        )
    }
}
