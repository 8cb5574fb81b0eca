//! Scripted DNS transport for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;

use super::transport::DnsTransport;
use crate::error_handling::ResolutionError;

/// Answers from a per-name script, with a default for unscripted names, and
/// records every queried name.
pub(crate) struct MockTransport {
    label: &'static str,
    script: HashMap<String, Result<Vec<String>, ResolutionError>>,
    default: Result<Vec<String>, ResolutionError>,
    queried: Mutex<Vec<String>>,
}

impl MockTransport {
    pub(crate) fn answering(label: &'static str, answers: &[&str]) -> Self {
        Self::with_default(label, Ok(answers.iter().map(|a| a.to_string()).collect()))
    }

    pub(crate) fn failing(label: &'static str, err: ResolutionError) -> Self {
        Self::with_default(label, Err(err))
    }

    fn with_default(label: &'static str, default: Result<Vec<String>, ResolutionError>) -> Self {
        MockTransport {
            label,
            script: HashMap::new(),
            default,
            queried: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with(mut self, name: &str, result: Result<Vec<String>, ResolutionError>) -> Self {
        self.script.insert(name.to_string(), result);
        self
    }

    pub(crate) fn queried(&self) -> Vec<String> {
        self.queried.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.queried().len()
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    fn name(&self) -> &str {
        self.label
    }

    async fn query(
        &self,
        name: &str,
        _record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        if let Ok(mut queried) = self.queried.lock() {
            queried.push(name.to_string());
        }
        self.script
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}
