//! Fire-and-forget email notifications.

use std::future::Future;
use std::sync::Arc;

use loandesk_shared::{EmailContent, EmailService};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Dispatches emails on background tasks.
///
/// Delivery failures are logged and never reach the caller.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    email: Option<Arc<EmailService>>,
}

impl Notifier {
    /// Notifier backed by `email`.
    #[must_use]
    pub fn new(email: EmailService) -> Self {
        Self {
            email: Some(Arc::new(email)),
        }
    }

    /// Notifier that drops every message.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { email: None }
    }

    /// Whether messages are actually sent.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.email.is_some()
    }

    /// Runs a notification job (recipient lookups plus sends) on a background
    /// task so it never delays or fails the request that triggered it.
    ///
    /// Dropped unrun when notifications are disabled.
    pub fn dispatch<F>(&self, job: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.is_enabled().then(|| tokio::spawn(job))
    }

    /// Sends `content` to `to` without waiting for delivery.
    ///
    /// Returns the delivery task, or `None` when notifications are disabled.
    /// The task never fails; send errors are logged.
    pub fn notify(&self, to: String, content: EmailContent) -> Option<JoinHandle<()>> {
        let Some(email) = self.email.clone() else {
            debug!(to = %to, subject = %content.subject, "email notifications disabled");
            return None;
        };

        Some(tokio::spawn(async move {
            if let Err(e) = email.send(&to, &content).await {
                warn!(to = %to, subject = %content.subject, error = %e, "notification failed");
            }
        }))
    }
}
