//! Channel implementations.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::Notifier;
use crate::alerts::{AlertDigest, AlertLevel};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

async fn post_json(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
    channel: &str,
) -> Result<()> {
    request
        .json(body)
        .send()
        .await
        .with_context(|| format!("{channel} request failed"))?
        .error_for_status()
        .with_context(|| format!("{channel} rejected the alert"))?;
    Ok(())
}

/// Generic JSON webhook: `{title, message, level, timestamp}`.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        WebhookNotifier {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let body = json!({
            "title": digest.title(),
            "message": digest.message(),
            "level": digest.level(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        post_json(self.client.post(&self.url), &body, self.name()).await
    }
}

/// Microsoft Teams incoming webhook (MessageCard).
pub struct TeamsNotifier {
    client: reqwest::Client,
    url: String,
}

impl TeamsNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        TeamsNotifier {
            client,
            url: url.into(),
        }
    }

    pub(crate) fn card(digest: &AlertDigest) -> serde_json::Value {
        let level = digest.level();
        let theme_color = match level {
            AlertLevel::Critical => "FF0000",
            AlertLevel::Warning => "00FF00",
        };
        json!({
            "@type": "MessageCard",
            "@context": "http://schema.org/extensions",
            "themeColor": theme_color,
            "summary": digest.title(),
            "sections": [{
                "activityTitle": digest.title(),
                "activitySubtitle": format!("Level: {level}"),
                "text": digest.message(),
                "markdown": true,
            }],
        })
    }
}

#[async_trait]
impl Notifier for TeamsNotifier {
    fn name(&self) -> &str {
        "teams"
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        post_json(self.client.post(&self.url), &Self::card(digest), self.name()).await
    }
}

/// Telegram Bot API `sendMessage`.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        TelegramNotifier {
            client,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        );
        let body = json!({
            "chat_id": self.chat_id,
            "text": format!("*{}*\n\n{}", digest.title(), digest.message()),
            "parse_mode": "Markdown",
        });
        post_json(self.client.post(url), &body, self.name()).await
    }
}

/// Opens a GitHub issue for critical digests.
pub struct GithubNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    repo: String,
}

impl GithubNotifier {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        token: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        GithubNotifier {
            client,
            api_base: api_base.into(),
            token: token.into(),
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl Notifier for GithubNotifier {
    fn name(&self) -> &str {
        "github"
    }

    fn accepts(&self, level: AlertLevel) -> bool {
        level == AlertLevel::Critical
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let url = format!(
            "{}/repos/{}/issues",
            self.api_base.trim_end_matches('/'),
            self.repo
        );
        let body = json!({
            "title": format!("[CRITICAL] {}", digest.title()),
            "body": digest.message(),
            "labels": ["security", "critical"],
        });
        let request = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json");
        post_json(request, &body, self.name()).await
    }
}

/// Opens a GitLab issue for critical digests.
pub struct GitlabNotifier {
    client: reqwest::Client,
    url: String,
    token: String,
    project_id: String,
}

impl GitlabNotifier {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        token: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        GitlabNotifier {
            client,
            url: url.into(),
            token: token.into(),
            project_id: project_id.into(),
        }
    }
}

#[async_trait]
impl Notifier for GitlabNotifier {
    fn name(&self) -> &str {
        "gitlab"
    }

    fn accepts(&self, level: AlertLevel) -> bool {
        level == AlertLevel::Critical
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let url = format!(
            "{}/api/v4/projects/{}/issues",
            self.url.trim_end_matches('/'),
            self.project_id
        );
        let body = json!({
            "title": format!("[CRITICAL] {}", digest.title()),
            "description": digest.message(),
            "labels": "security,critical",
        });
        let request = self.client.post(url).header("PRIVATE-TOKEN", &self.token);
        post_json(request, &body, self.name()).await
    }
}
