//! Port contracts for the notification context.

mod channel;

pub use channel::{DeliveryError, NotificationChannel};
