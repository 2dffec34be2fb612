//! Delivery port for rendered notifications.

use crate::identity::domain::{User, UserId};
use crate::notification::domain::Notice;
use async_trait::async_trait;
use thiserror::Error;

/// Outbound delivery contract: fire-and-observe.
///
/// A failed delivery is loggable but non-fatal to the caller; the dispatch
/// layer never propagates it into the calling transaction.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Requests delivery of a rendered notice to one recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the channel could not deliver.
    async fn deliver(&self, recipient: &User, notice: &Notice) -> Result<(), DeliveryError>;
}

/// Error reported by a notification channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery to {recipient} failed: {reason}")]
pub struct DeliveryError {
    /// Recipient the delivery was addressed to.
    pub recipient: UserId,
    /// Channel-reported reason.
    pub reason: String,
}
