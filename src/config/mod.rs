//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, resolver pools, thresholds)
//! - HTTP header name constants
//! - CLI option types and the merged `ScanConfig`
//! - The TOML config file layout

mod constants;
mod file;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use file::{
    load_file_config, AlertSettings, EmailSettings, FileConfig, GithubSettings, GitlabSettings,
    MonitorToggles, NotificationSettings, ReportSettings, TeamsSettings, TelegramSettings,
    WebhookSettings,
};
pub use headers::*;
pub use types::{LogFormat, LogLevel, Opt, ReportFormat, ScanConfig};
