//! Report artifacts.
//!
//! Each cycle's ordered results are written to the output directory as
//! `report_<YYYYmmdd_HHMMSS>.<ext>`, one file per configured format.

mod csv;
mod json;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

pub use json::{JsonReport, ReportSummary};

use crate::config::ReportFormat;
use crate::models::CheckResult;

/// Receives the full result sequence of a cycle.
pub trait ReportEmitter {
    /// Writes the report and returns the paths of the artifacts created.
    fn emit(&self, results: &[CheckResult]) -> Result<Vec<PathBuf>>;
}

/// Writes JSON and/or CSV reports into a directory.
#[derive(Debug, Clone)]
pub struct FileReporter {
    output_dir: PathBuf,
    formats: Vec<ReportFormat>,
}

impl FileReporter {
    pub fn new(output_dir: impl Into<PathBuf>, formats: Vec<ReportFormat>) -> Self {
        FileReporter {
            output_dir: output_dir.into(),
            formats,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the report stamped with `generated_at`.
    pub fn emit_at(
        &self,
        results: &[CheckResult],
        generated_at: DateTime<Local>,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create report directory: {}",
                self.output_dir.display()
            )
        })?;

        let stem = format!("report_{}", generated_at.format("%Y%m%d_%H%M%S"));
        let mut written = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let path = self
                .output_dir
                .join(format!("{stem}.{}", format.extension()));
            match format {
                ReportFormat::Json => json::write_json_report(&path, results, generated_at)?,
                ReportFormat::Csv => csv::write_csv_report(&path, results)?,
            }
            log::info!("Report written: {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

impl ReportEmitter for FileReporter {
    fn emit(&self, results: &[CheckResult]) -> Result<Vec<PathBuf>> {
        self.emit_at(results, Local::now())
    }
}
