//! Notification fan-out.
//!
//! Delivers each alert digest to every configured channel. Channels are
//! independent: a failing channel is logged and the others still receive the
//! digest.

mod channels;
mod email;


use std::sync::Arc;

use async_trait::async_trait;

pub use channels::{
    GithubNotifier, GitlabNotifier, TeamsNotifier, TelegramNotifier, WebhookNotifier,
    GITHUB_API_BASE, TELEGRAM_API_BASE,
};
pub use email::{EmailNotifier, DEFAULT_EMAIL_FROM};

use crate::alerts::{AlertDigest, AlertLevel};
use crate::config::NotificationSettings;

/// A delivery channel for alert digests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Whether digests of this level go to this channel.
    fn accepts(&self, _level: AlertLevel) -> bool {
        true
    }

    async fn send(&self, digest: &AlertDigest) -> anyhow::Result<()>;
}

/// Every configured channel, in a fixed order.
#[derive(Default)]
pub struct NotificationFanOut {
    channels: Vec<Arc<dyn Notifier>>,
}

impl NotificationFanOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the channels whose settings are complete.
    pub fn from_settings(settings: &NotificationSettings, client: &reqwest::Client) -> Self {
        let mut fan_out = NotificationFanOut::new();

        if let (Some(token), Some(repo)) = (&settings.github.token, &settings.github.repo) {
            fan_out = fan_out.with_channel(Arc::new(GithubNotifier::new(
                client.clone(),
                GITHUB_API_BASE,
                token,
                repo,
            )));
        }
        if let (Some(url), Some(token), Some(project_id)) = (
            &settings.gitlab.url,
            &settings.gitlab.token,
            &settings.gitlab.project_id,
        ) {
            fan_out = fan_out.with_channel(Arc::new(GitlabNotifier::new(
                client.clone(),
                url,
                token,
                project_id,
            )));
        }
        if let (Some(bot_token), Some(chat_id)) =
            (&settings.telegram.bot_token, &settings.telegram.chat_id)
        {
            fan_out = fan_out.with_channel(Arc::new(TelegramNotifier::new(
                client.clone(),
                TELEGRAM_API_BASE,
                bot_token,
                chat_id,
            )));
        }
        if let Some(url) = &settings.teams.webhook_url {
            fan_out = fan_out.with_channel(Arc::new(TeamsNotifier::new(client.clone(), url)));
        }
        if let Some(url) = &settings.webhook.url {
            fan_out = fan_out.with_channel(Arc::new(WebhookNotifier::new(client.clone(), url)));
        }
        if let Some(email) = EmailNotifier::from_settings(&settings.email) {
            fan_out = fan_out.with_channel(Arc::new(email));
        }

        fan_out
    }

    pub fn with_channel(mut self, channel: Arc<dyn Notifier>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Sends one digest to every accepting channel. Returns how many succeeded.
    pub async fn send(&self, digest: &AlertDigest) -> usize {
        let level = digest.level();
        let mut delivered = 0;
        for channel in self.channels.iter().filter(|c| c.accepts(level)) {
            match channel.send(digest).await {
                Ok(()) => {
                    log::info!("Sent {} alert for {} via {}", level, digest.domain, channel.name());
                    delivered += 1;
                }
                Err(e) => {
                    log::error!(
                        "Failed to send alert for {} via {}: {e:#}",
                        digest.domain,
                        channel.name()
                    );
                }
            }
        }
        delivered
    }

    /// Sends every digest. Returns the total number of successful deliveries.
    pub async fn send_all(&self, digests: &[AlertDigest]) -> usize {
        let mut delivered = 0;
        for digest in digests {
            delivered += self.send(digest).await;
        }
        delivered
    }
}
