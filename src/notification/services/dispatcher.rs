//! Recipient deduplication and best-effort delivery.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::identity::domain::User;
use crate::notification::{
    domain::{NotificationEvent, render_notice},
    ports::NotificationChannel,
};

/// Dispatches one notification event to a set of recipients.
///
/// Each recipient receives exactly one notice per dispatch call regardless
/// of how many candidate groups they arrived in. An empty recipient set is
/// a no-op. Rendering and delivery failures are logged and swallowed;
/// dispatch never fails the calling transaction.
#[derive(Clone)]
pub struct NotificationDispatcher<N>
where
    N: NotificationChannel,
{
    channel: Arc<N>,
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationChannel,
{
    /// Creates a dispatcher over the given channel.
    #[must_use]
    pub const fn new(channel: Arc<N>) -> Self {
        Self { channel }
    }

    /// Delivers the event to every distinct, non-deleted recipient.
    ///
    /// Returns the number of successful deliveries.
    pub async fn dispatch(&self, event: &NotificationEvent, recipients: &[User]) -> usize {
        let mut seen: BTreeSet<_> = BTreeSet::new();
        let mut delivered = 0_usize;
        for recipient in recipients {
            if recipient.is_deleted() || !seen.insert(recipient.id()) {
                continue;
            }
            let notice = match render_notice(event, recipient.name()) {
                Ok(notice) => notice,
                Err(error) => {
                    tracing::warn!(
                        kind = event.kind().as_str(),
                        recipient = %recipient.id(),
                        %error,
                        "notification template failed to render",
                    );
                    continue;
                }
            };
            match self.channel.deliver(recipient, &notice).await {
                Ok(()) => delivered += 1,
                Err(error) => {
                    tracing::warn!(
                        kind = event.kind().as_str(),
                        recipient = %recipient.id(),
                        %error,
                        "notification delivery failed",
                    );
                }
            }
        }
        delivered
    }
}
