#![allow(dead_code)]

// Shared test helpers: scripted DNS transports and check adapters.
//
// This module provides fakes for the resolver and adapter seams so integration
// tests run without network access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;

use domain_watch::checks::CheckAdapter;
use domain_watch::dns::{DnsTransport, ResilientResolver};
use domain_watch::error_handling::ResolutionError;
use domain_watch::{CheckResult, MonitorKind, Status};

/// Answers A queries for a fixed set of names; everything else is NXDOMAIN.
pub struct StaticTransport {
    answers: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticTransport {
    pub fn new(resolvable: &[(&str, &str)]) -> Self {
        StaticTransport {
            answers: resolvable
                .iter()
                .map(|(name, ip)| (name.to_string(), ip.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsTransport for StaticTransport {
    fn name(&self) -> &str {
        "static"
    }

    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answers.get(name) {
            Some(ip) if record_type == RecordType::A => Ok(vec![ip.clone()]),
            _ => Err(ResolutionError::not_found(name, record_type)),
        }
    }
}

/// Resolver whose primary answers from `resolvable` and whose fallback is never needed.
pub fn static_resolver(resolvable: &[(&str, &str)]) -> Arc<ResilientResolver> {
    Arc::new(ResilientResolver::new(
        Arc::new(StaticTransport::new(resolvable)),
        Arc::new(StaticTransport::new(&[])),
    ))
}

/// Adapter returning a fixed status and recording the targets it was given.
pub struct ScriptedAdapter {
    kind: MonitorKind,
    status: Status,
    pub targets: std::sync::Mutex<Vec<String>>,
}

impl ScriptedAdapter {
    pub fn new(kind: MonitorKind, status: Status) -> Arc<Self> {
        Arc::new(ScriptedAdapter {
            kind,
            status,
            targets: std::sync::Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CheckAdapter for ScriptedAdapter {
    fn kind(&self) -> MonitorKind {
        self.kind
    }

    async fn check(&self, target: &str) -> anyhow::Result<CheckResult> {
        self.targets.lock().unwrap().push(target.to_string());
        if target.starts_with("explode.") {
            anyhow::bail!("adapter fault for {target}");
        }
        Ok(CheckResult::new(
            target,
            self.kind,
            self.status,
            format!("{} scripted", self.kind),
        ))
    }
}
