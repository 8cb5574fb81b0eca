//! TOML config file and notification settings.
//!
//! Secrets for notification channels may also come from the environment
//! (or a `.env` file); environment values take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::constants::{
    DEFAULT_REPORT_DIR, DEFAULT_RESEND_AFTER_HOURS, DEFAULT_SMTP_PORT, DEFAULT_STATE_FILE,
};
use crate::config::types::ReportFormat;
use crate::error_handling::ConfigError;
use crate::models::MonitorKind;

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub domains: Vec<String>,
    pub heartbeat_url: Option<String>,
    pub api_url: Option<String>,
    pub monitors: MonitorToggles,
    pub reports: ReportSettings,
    pub alerts: AlertSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Toggle {
    pub enabled: bool,
}

impl Toggle {
    const ON: Toggle = Toggle { enabled: true };
    const OFF: Toggle = Toggle { enabled: false };
}

/// `[monitors.<kind>] enabled = ..` tables. Blacklist is opt-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorToggles {
    pub domain: Toggle,
    pub ssl: Toggle,
    pub dns: Toggle,
    pub security: Toggle,
    pub blacklist: Toggle,
}

impl Default for MonitorToggles {
    fn default() -> Self {
        MonitorToggles {
            domain: Toggle::ON,
            ssl: Toggle::ON,
            dns: Toggle::ON,
            security: Toggle::ON,
            blacklist: Toggle::OFF,
        }
    }
}

impl MonitorToggles {
    /// Enabled monitors in execution order.
    pub fn enabled_kinds(&self) -> Vec<MonitorKind> {
        [
            (MonitorKind::Domain, self.domain),
            (MonitorKind::Ssl, self.ssl),
            (MonitorKind::Dns, self.dns),
            (MonitorKind::Security, self.security),
            (MonitorKind::Blacklist, self.blacklist),
        ]
        .into_iter()
        .filter(|(_, toggle)| toggle.enabled)
        .map(|(kind, _)| kind)
        .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub formats: Vec<ReportFormat>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            output_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            formats: vec![ReportFormat::Json],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub state_file: PathBuf,
    pub resend_after_hours: i64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        AlertSettings {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            resend_after_hours: DEFAULT_RESEND_AFTER_HOURS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub token: Option<String>,
    /// `owner/repo`
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitlabSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamsSettings {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub url: Option<String>,
}

/// `[notifications.email]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_server: Option<String>,
    pub smtp_port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    /// Comma-separated recipient list
    pub to: Option<String>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings {
            smtp_server: None,
            smtp_port: DEFAULT_SMTP_PORT,
            user: None,
            password: None,
            from: None,
            to: None,
        }
    }
}

impl EmailSettings {
    pub fn recipients(&self) -> Vec<String> {
        self.to
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Per-channel notification settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub github: GithubSettings,
    pub gitlab: GitlabSettings,
    pub telegram: TelegramSettings,
    pub teams: TeamsSettings,
    pub webhook: WebhookSettings,
    pub email: EmailSettings,
}

impl NotificationSettings {
    /// Applies `GITHUB_TOKEN`, `TELEGRAM_CHAT_ID`, ... from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup; non-empty values win.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let apply = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = get(key) {
                *slot = Some(value);
            }
        };

        apply(&mut self.github.token, "GITHUB_TOKEN");
        apply(&mut self.github.repo, "GITHUB_REPO");
        apply(&mut self.gitlab.url, "GITLAB_URL");
        apply(&mut self.gitlab.token, "GITLAB_TOKEN");
        apply(&mut self.gitlab.project_id, "GITLAB_PROJECT_ID");
        apply(&mut self.telegram.bot_token, "TELEGRAM_BOT_TOKEN");
        apply(&mut self.telegram.chat_id, "TELEGRAM_CHAT_ID");
        apply(&mut self.teams.webhook_url, "TEAMS_WEBHOOK_URL");
        apply(&mut self.webhook.url, "GENERIC_WEBHOOK_URL");
        apply(&mut self.email.smtp_server, "EMAIL_SMTP_SERVER");
        apply(&mut self.email.user, "EMAIL_USER");
        apply(&mut self.email.password, "EMAIL_PASSWORD");
        apply(&mut self.email.from, "EMAIL_FROM");
        apply(&mut self.email.to, "EMAIL_TO");
        match get("EMAIL_SMTP_PORT").map(|port| port.trim().parse::<u16>()) {
            Some(Ok(port)) => self.email.smtp_port = port,
            Some(Err(e)) => log::warn!("Ignoring invalid EMAIL_SMTP_PORT: {e}"),
            None => {}
        }
        self
    }
}

impl FileConfig {
    /// Checks values serde cannot constrain.
    pub fn validate(&self) -> Result<(), String> {
        let hours = self.alerts.resend_after_hours;
        if hours <= 0 || chrono::Duration::try_hours(hours).is_none() {
            return Err(format!(
                "alerts.resend_after_hours must be a positive number of hours, got {hours}"
            ));
        }
        Ok(())
    }
}

/// Reads, parses and validates the TOML config file.
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read,
/// `ConfigError::Parse` if it is not valid TOML for `FileConfig` and
/// `ConfigError::Invalid` if a value is out of range.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate().map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(config)
}
