//! CSV report: one row per result, details flattened to a JSON string.

use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::models::CheckResult;

pub(super) fn write_csv_report(path: &Path, results: &[CheckResult]) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    writer.write_record([
        "domain",
        "monitor",
        "status",
        "message",
        "days_until_expiry",
        "expiration_date",
        "details",
    ])?;

    for result in results {
        let days = result
            .days_until_expiry
            .map(|d| d.to_string())
            .unwrap_or_default();
        let expiration = result
            .expiration_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let details = if result.details.is_null() {
            String::new()
        } else {
            result.details.to_string()
        };
        writer.write_record([
            result.domain.as_str(),
            result.monitor.as_str(),
            result.status.as_str(),
            result.message.as_str(),
            days.as_str(),
            expiration.as_str(),
            details.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
