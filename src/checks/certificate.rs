//! TLS certificate health.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::expiry::expiry_message;
use super::CheckAdapter;
use crate::models::{classify_expiry, days_until, CheckResult, MonitorKind};
use crate::tls::get_ssl_certificate_info;

/// Verified handshake to `target:443`; a handshake or verification failure is
/// an adapter fault and surfaces as `status=error`.
pub struct CertificateCheck;

#[async_trait]
impl CheckAdapter for CertificateCheck {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Ssl
    }

    async fn check(&self, target: &str) -> Result<CheckResult> {
        let info = get_ssl_certificate_info(target).await?;

        let now = Utc::now();
        let days = days_until(info.not_after, now);
        let status = classify_expiry(days);

        Ok(CheckResult::new(
            target,
            MonitorKind::Ssl,
            status,
            expiry_message("Certificate", days),
        )
        .with_details(json!({
            "issuer": info.issuer_cn.clone().unwrap_or_else(|| "Unknown".to_string()),
            "issuer_dn": info.issuer,
            "subject": info.subject,
            "subject_alternative_names": info.subject_alternative_names,
            "tls_version": info.tls_version,
            "key_algorithm": info.key_algorithm,
        }))
        .with_expiry(info.not_after, now))
    }
}
