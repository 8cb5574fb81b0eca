//! SMTP email channel.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::Notifier;
use crate::alerts::AlertDigest;
use crate::config::{EmailSettings, SMTP_TIMEOUT};

/// Sender used when none is configured.
pub const DEFAULT_EMAIL_FROM: &str = "monitor@domain-watch.local";

/// Plain-text digest mail to one or more recipients.
///
/// With credentials the connection is upgraded with STARTTLS before login;
/// without them the relay is used as-is.
pub struct EmailNotifier {
    server: String,
    port: u16,
    credentials: Option<Credentials>,
    from: String,
    to: Vec<String>,
}

impl EmailNotifier {
    pub fn new(server: impl Into<String>, port: u16, from: impl Into<String>, to: Vec<String>) -> Self {
        EmailNotifier {
            server: server.into(),
            port,
            credentials: None,
            from: from.into(),
            to,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(user.into(), password.into()));
        self
    }

    /// `None` unless a server and at least one recipient are configured.
    pub fn from_settings(settings: &EmailSettings) -> Option<Self> {
        let server = settings.smtp_server.as_deref()?;
        let to = settings.recipients();
        if to.is_empty() {
            return None;
        }
        let from = settings.from.as_deref().unwrap_or(DEFAULT_EMAIL_FROM);
        let notifier = EmailNotifier::new(server, settings.smtp_port, from, to);
        Some(match (&settings.user, &settings.password) {
            (Some(user), Some(password)) => notifier.with_credentials(user, password),
            _ => notifier,
        })
    }

    pub(crate) fn build_message(&self, digest: &AlertDigest) -> Result<Message> {
        let from: Mailbox = self
            .from
            .parse()
            .with_context(|| format!("invalid sender address {}", self.from))?;
        let mut builder = Message::builder().from(from).subject(digest.title());
        for to in &self.to {
            let mailbox: Mailbox = to
                .parse()
                .with_context(|| format!("invalid recipient address {to}"))?;
            builder = builder.to(mailbox);
        }
        builder
            .header(ContentType::TEXT_PLAIN)
            .body(digest.message())
            .context("Failed to build email")
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = match &self.credentials {
            Some(credentials) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)
                .with_context(|| format!("invalid SMTP relay {}", self.server))?
                .credentials(credentials.clone()),
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.server),
        };
        Ok(builder
            .port(self.port)
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, digest: &AlertDigest) -> Result<()> {
        let message = self.build_message(digest)?;
        self.transport()?
            .send(message)
            .await
            .with_context(|| format!("SMTP delivery via {}:{} failed", self.server, self.port))?;
        Ok(())
    }
}
