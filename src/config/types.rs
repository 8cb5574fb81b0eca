//! Configuration types and CLI options.
//!
//! `Opt` is the command-line surface; `ScanConfig` is the merged, explicit
//! configuration the library runs from. It is built once at startup and passed
//! by reference into the alert manager and the notification fan-out.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::config::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_REPORT_DIR, DEFAULT_RESEND_AFTER_HOURS, DEFAULT_STATE_FILE,
};
use crate::config::file::{FileConfig, NotificationSettings};
use crate::models::MonitorKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report artifact formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

/// Command-line options.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "domain_watch",
    version,
    about = "Audits domains for expiry, TLS, DNS authentication, HTTP security and blacklisting"
)]
pub struct Opt {
    /// Path to the TOML config file
    #[arg(long, env = "DOMAINMATE_CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Send alert digests to the configured notification channels
    #[arg(long)]
    pub notify: bool,

    /// Generate a report from mock data instead of scanning
    #[arg(long)]
    pub demo: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Domains scanned in parallel (1 = sequential)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub concurrency: u16,

    /// Override the issue-state file location
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Override the report output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use domain_watch::ScanConfig;
///
/// let config = ScanConfig {
///     domains: vec!["example.com".to_string()],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Raw domain strings, in configured order
    pub domains: Vec<String>,

    /// Enabled monitors, in execution order
    pub monitors: Vec<MonitorKind>,

    /// Domains processed in parallel
    pub concurrency: usize,

    /// Whether alert digests are delivered
    pub notify: bool,

    /// Report output directory
    pub report_dir: PathBuf,

    /// Report formats written each cycle
    pub report_formats: Vec<ReportFormat>,

    /// Issue-state file
    pub state_file: PathBuf,

    /// Minimum hours between repeat alerts
    pub resend_after_hours: i64,

    /// Notification channel settings
    pub notifications: NotificationSettings,

    /// Dead man's switch URL pinged after each cycle
    pub heartbeat_url: Option<String>,

    /// Endpoint receiving the full result set as JSON
    pub api_url: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            monitors: vec![
                MonitorKind::Domain,
                MonitorKind::Ssl,
                MonitorKind::Dns,
                MonitorKind::Security,
            ],
            concurrency: 1,
            notify: false,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            report_formats: vec![ReportFormat::Json],
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            resend_after_hours: DEFAULT_RESEND_AFTER_HOURS,
            notifications: NotificationSettings::default(),
            heartbeat_url: None,
            api_url: None,
        }
    }
}

impl ScanConfig {
    /// Merges CLI options over the file config. CLI overrides win.
    pub fn from_parts(opt: &Opt, file: FileConfig) -> Self {
        let monitors = file.monitors.enabled_kinds();
        ScanConfig {
            domains: file.domains,
            monitors,
            concurrency: usize::from(opt.concurrency.max(1)),
            notify: opt.notify,
            report_dir: opt
                .output_dir
                .clone()
                .unwrap_or(file.reports.output_dir),
            report_formats: file.reports.formats,
            state_file: opt.state_file.clone().unwrap_or(file.alerts.state_file),
            resend_after_hours: file.alerts.resend_after_hours,
            notifications: file.notifications.with_env_overrides(),
            heartbeat_url: file.heartbeat_url,
            api_url: file.api_url,
        }
    }
}
