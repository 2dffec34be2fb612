//! Recording notification channel for tests and reference wiring.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::identity::domain::{User, UserId};
use crate::notification::{
    domain::{EventKind, Notice},
    ports::{DeliveryError, NotificationChannel},
};

/// One delivery observed by the recording channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    /// Recipient the notice was delivered to.
    pub recipient: UserId,
    /// Event kind of the delivered notice.
    pub kind: EventKind,
    /// Rendered subject line.
    pub subject_line: String,
    /// Rendered body.
    pub body: String,
}

#[derive(Debug, Default)]
struct RecordingState {
    deliveries: Vec<RecordedDelivery>,
    failing_recipients: HashSet<UserId>,
}

/// Channel that records every delivery instead of sending anything.
///
/// Recipients registered through [`RecordingChannel::fail_deliveries_to`]
/// get a [`DeliveryError`] instead, which exercises the best-effort
/// dispatch path.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingChannel {
    /// Creates an empty recording channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future delivery to the given recipient fail.
    pub fn fail_deliveries_to(&self, recipient: UserId) {
        if let Ok(mut state) = self.state.write() {
            state.failing_recipients.insert(recipient);
        }
    }

    /// Returns every recorded delivery, in delivery order.
    #[must_use]
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.state
            .read()
            .map(|state| state.deliveries.clone())
            .unwrap_or_default()
    }

    /// Returns the recorded deliveries addressed to one recipient.
    #[must_use]
    pub fn deliveries_to(&self, recipient: UserId) -> Vec<RecordedDelivery> {
        self.deliveries()
            .into_iter()
            .filter(|delivery| delivery.recipient == recipient)
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn deliver(&self, recipient: &User, notice: &Notice) -> Result<(), DeliveryError> {
        let mut state = self.state.write().map_err(|err| DeliveryError {
            recipient: recipient.id(),
            reason: err.to_string(),
        })?;
        if state.failing_recipients.contains(&recipient.id()) {
            return Err(DeliveryError {
                recipient: recipient.id(),
                reason: "injected failure".to_owned(),
            });
        }
        state.deliveries.push(RecordedDelivery {
            recipient: recipient.id(),
            kind: notice.kind,
            subject_line: notice.subject_line.clone(),
            body: notice.body.clone(),
        });
        Ok(())
    }
}
