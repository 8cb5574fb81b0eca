//! Per-domain alert digests.

use serde::Serialize;
use serde_json::Value;

use crate::config::DIGEST_DETAIL_LINES;
use crate::models::{CheckResult, MonitorKind, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue selected for notification this cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestEntry {
    pub monitor: MonitorKind,
    pub status: Status,
    pub message: String,
    pub details: Vec<String>,
    /// Alert count from the issue record after this cycle's transition
    pub count: u32,
}

impl DigestEntry {
    pub fn from_result(result: &CheckResult, count: u32) -> Self {
        DigestEntry {
            monitor: result.monitor,
            status: result.status,
            message: result.message.clone(),
            details: detail_lines(&result.details),
            count,
        }
    }

    /// "New" for a first alert, else "Repeated N×".
    pub fn annotation(&self) -> String {
        if self.count <= 1 {
            "New".to_string()
        } else {
            format!("Repeated {}×", self.count)
        }
    }

    /// Critical sorts first; warning and error share a rank.
    fn rank(&self) -> u8 {
        match self.status {
            Status::Critical => 0,
            _ => 1,
        }
    }

    fn icon(&self) -> &'static str {
        match self.status {
            Status::Critical => "🔴",
            Status::Error => "❌",
            _ => "⚠️",
        }
    }
}

/// Up to three human-readable lines from a result's details payload.
///
/// Lists contribute their first items, a string contributes itself, and an
/// object contributes its `issues` list if it has one.
pub fn detail_lines(details: &Value) -> Vec<String> {
    let render = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match details {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items.iter().take(DIGEST_DETAIL_LINES).map(render).collect(),
        Value::Object(map) => match map.get("issues") {
            Some(Value::Array(items)) => {
                items.iter().take(DIGEST_DETAIL_LINES).map(render).collect()
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// All issues alerted for one domain in one cycle. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDigest {
    pub domain: String,
    pub entries: Vec<DigestEntry>,
}

impl AlertDigest {
    /// Builds a digest with entries sorted by severity, then monitor name.
    pub fn new(domain: impl Into<String>, mut entries: Vec<DigestEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.rank()
                .cmp(&b.rank())
                .then_with(|| a.monitor.as_str().cmp(b.monitor.as_str()))
        });
        AlertDigest {
            domain: domain.into(),
            entries,
        }
    }

    pub fn title(&self) -> String {
        format!("🚨 Security Alert: {}", self.domain)
    }

    pub fn level(&self) -> AlertLevel {
        if self
            .entries
            .iter()
            .any(|e| matches!(e.status, Status::Critical | Status::Error))
        {
            AlertLevel::Critical
        } else {
            AlertLevel::Warning
        }
    }

    /// Multi-line body shared by every channel.
    pub fn message(&self) -> String {
        let mut lines = vec![format!(
            "Found {} issues for **{}**:",
            self.entries.len(),
            self.domain
        )];
        for entry in &self.entries {
            lines.push(format!(
                "{} **{}**: {} ({})",
                entry.icon(),
                entry.monitor.as_str().to_uppercase(),
                entry.message,
                entry.annotation()
            ));
            lines.extend(entry.details.iter().map(|d| format!("   - {d}")));
        }
        lines.join("\n")
    }
}
