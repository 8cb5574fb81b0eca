//! JSON report: summary counts followed by the ordered results.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::{CheckResult, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
    pub error: usize,
    /// Distinct domains with at least one result
    pub domains: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let count = |status: Status| results.iter().filter(|r| r.status == status).count();
        let domains: HashSet<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        ReportSummary {
            total: results.len(),
            ok: count(Status::Ok),
            warning: count(Status::Warning),
            critical: count(Status::Critical),
            error: count(Status::Error),
            domains: domains.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub summary: ReportSummary,
    pub results: &'a [CheckResult],
}

pub(super) fn write_json_report(
    path: &Path,
    results: &[CheckResult],
    generated_at: DateTime<Local>,
) -> Result<()> {
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        summary: ReportSummary::from_results(results),
        results,
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &report)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
