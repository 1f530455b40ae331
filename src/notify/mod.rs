//! Candidate notification.
//!
//! Issuing a request enqueues an invitation; a background worker renders and
//! delivers it. Delivery is best effort and never fails the issuing call.

pub mod template;
pub mod webhook;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::config::MailConfig;
pub use template::{RenderedEmail, render_invitation, submission_link};
pub use webhook::WebhookNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackInvite {
    pub candidate_email: String,
    pub candidate_name: Option<String>,
    pub token: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, invite: &FeedbackInvite) -> anyhow::Result<()>;
}

/// Logs invitations instead of sending them. Used when no relay is configured.
pub struct LogNotifier {
    feedback_url_base: String,
}

impl LogNotifier {
    #[must_use]
    pub fn new(feedback_url_base: &str) -> Self {
        Self {
            feedback_url_base: feedback_url_base.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, invite: &FeedbackInvite) -> anyhow::Result<()> {
        info!(
            to = %invite.candidate_email,
            link = %submission_link(&self.feedback_url_base, &invite.token),
            "Feedback invitation (no mail relay configured)"
        );
        Ok(())
    }
}

pub fn build_notifier(mail: &MailConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match mail.relay_url.as_deref() {
        Some(url) => {
            info!(relay = %url, "Mail relay configured");
            Ok(Arc::new(WebhookNotifier::new(url, mail)?))
        }
        None => Ok(Arc::new(LogNotifier::new(&mail.feedback_url_base))),
    }
}

/// Hands invitations to a background worker over a bounded queue.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: Option<mpsc::Sender<FeedbackInvite>>,
}

impl NotificationDispatcher {
    /// Spawns the delivery worker on the current runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, queue_size: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<FeedbackInvite>(queue_size.max(1));

        tokio::spawn(async move {
            while let Some(invite) = rx.recv().await {
                match notifier.send(&invite).await {
                    Ok(()) => debug!(to = %invite.candidate_email, "Invitation delivered"),
                    Err(e) => {
                        metrics::counter!("notifications_failed_total").increment(1);
                        warn!(
                            to = %invite.candidate_email,
                            error = %e,
                            "Failed to deliver feedback invitation"
                        );
                    }
                }
            }
            debug!("Notification worker stopped");
        });

        Self { tx: Some(tx) }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn from_config(mail: &MailConfig) -> anyhow::Result<Self> {
        if !mail.enabled {
            info!("Candidate notifications disabled");
            return Ok(Self::disabled());
        }

        Ok(Self::spawn(build_notifier(mail)?, mail.queue_size))
    }

    /// Enqueue without waiting. A full or closed queue is logged and the
    /// invitation dropped.
    pub fn dispatch(&self, invite: FeedbackInvite) {
        let Some(tx) = &self.tx else {
            debug!(to = %invite.candidate_email, "Notifications disabled, invitation dropped");
            return;
        };

        match tx.try_send(invite) {
            Ok(()) => {}
            Err(TrySendError::Full(invite)) => {
                metrics::counter!("notifications_failed_total").increment(1);
                warn!(to = %invite.candidate_email, "Notification queue full, invitation dropped");
            }
            Err(TrySendError::Closed(invite)) => {
                metrics::counter!("notifications_failed_total").increment(1);
                warn!(to = %invite.candidate_email, "Notification worker gone, invitation dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<FeedbackInvite>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, invite: &FeedbackInvite) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(invite.clone());
            if self.fail {
                anyhow::bail!("relay down");
            }
            Ok(())
        }
    }

    fn invite(token: &str) -> FeedbackInvite {
        FeedbackInvite {
            candidate_email: "jane@example.com".to_string(),
            candidate_name: None,
            token: token.to_string(),
        }
    }

    async fn wait_for(recorder: &Recorder, count: usize) {
        for _ in 0..100 {
            if recorder.sent.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn worker_delivers_in_order() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = NotificationDispatcher::spawn(recorder.clone(), 8);

        dispatcher.dispatch(invite("one"));
        dispatcher.dispatch(invite("two"));
        wait_for(&recorder, 2).await;

        let tokens: Vec<String> = recorder
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.token.clone())
            .collect();
        assert_eq!(tokens, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn delivery_failure_does_not_stop_worker() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let dispatcher = NotificationDispatcher::spawn(recorder.clone(), 8);

        dispatcher.dispatch(invite("one"));
        dispatcher.dispatch(invite("two"));
        wait_for(&recorder, 2).await;

        assert_eq!(recorder.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn disabled_dispatcher_drops_silently() {
        NotificationDispatcher::disabled().dispatch(invite("one"));
    }
}
