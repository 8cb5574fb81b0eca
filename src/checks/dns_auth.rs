//! SPF and DMARC presence.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;
use serde_json::json;

use super::CheckAdapter;
use crate::dns::{extract_dmarc_record, extract_spf_record, ResilientResolver};
use crate::error_handling::ResolutionError;
use crate::models::{CheckResult, MonitorKind, Status};

pub struct DnsAuthCheck {
    resolver: Arc<ResilientResolver>,
}

impl DnsAuthCheck {
    pub fn new(resolver: Arc<ResilientResolver>) -> Self {
        DnsAuthCheck { resolver }
    }

    /// TXT answers for `name`; an authoritative negative is an empty set.
    async fn txt(&self, name: &str) -> Result<Vec<String>, ResolutionError> {
        match self.resolver.resolve(name, RecordType::TXT).await {
            Ok(records) => Ok(records),
            Err(e) if e.is_authoritative_negative() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

fn record_json(record: &Option<String>) -> serde_json::Value {
    match record {
        Some(r) => json!({"status": "present", "record": r}),
        None => json!({"status": "missing", "record": null}),
    }
}

#[async_trait]
impl CheckAdapter for DnsAuthCheck {
    fn kind(&self) -> MonitorKind {
        MonitorKind::Dns
    }

    async fn check(&self, target: &str) -> Result<CheckResult> {
        let dmarc_name = format!("_dmarc.{target}");
        let (txt, dmarc_txt) = tokio::join!(self.txt(target), self.txt(&dmarc_name));

        if let (Err(spf_err), Err(dmarc_err)) = (&txt, &dmarc_txt) {
            return Ok(CheckResult::error(
                target,
                MonitorKind::Dns,
                format!("DNS lookups failed: {spf_err}"),
            )
            .with_details(json!([spf_err.to_string(), dmarc_err.to_string()])));
        }

        let txt = txt.unwrap_or_default();
        let spf = extract_spf_record(&txt);
        let dmarc = extract_dmarc_record(&dmarc_txt.unwrap_or_default());

        let mut missing = Vec::new();
        if spf.is_none() {
            missing.push("SPF");
        }
        if dmarc.is_none() {
            missing.push("DMARC");
        }
        let (status, message) = if missing.is_empty() {
            (Status::Ok, "SPF and DMARC present".to_string())
        } else {
            (Status::Warning, format!("Missing {}", missing.join(" and ")))
        };

        Ok(CheckResult::new(target, MonitorKind::Dns, status, message).with_details(json!({
            "spf": record_json(&spf),
            "dmarc": record_json(&dmarc),
            "txt": txt,
        })))
    }
}
