use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::template::render_invitation;
use super::{FeedbackInvite, Notifier};
use crate::config::MailConfig;

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: String,
    to: &'a str,
    subject: String,
    html: String,
}

/// Delivers invitations by POSTing them to an HTTP mail relay.
pub struct WebhookNotifier {
    client: reqwest::Client,
    relay_url: String,
    mail: MailConfig,
}

impl WebhookNotifier {
    pub fn new(relay_url: &str, mail: &MailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(mail.request_timeout_seconds))
            .user_agent(concat!("feedbackd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build mail relay client: {e}"))?;

        Ok(Self {
            client,
            relay_url: relay_url.to_string(),
            mail: mail.clone(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, invite: &FeedbackInvite) -> anyhow::Result<()> {
        let email = render_invitation(invite, &self.mail);
        let message = RelayMessage {
            from: format!("\"{}\" <{}>", self.mail.sender_name, self.mail.from_address),
            to: &invite.candidate_email,
            subject: email.subject,
            html: email.html,
        };

        self.client
            .post(&self.relay_url)
            .json(&message)
            .send()
            .await
            .context("Mail relay request failed")?
            .error_for_status()
            .context("Mail relay rejected the message")?;

        Ok(())
    }
}
