//! In-memory adapters for the notification context.

mod channel;

pub use channel::{RecordedDelivery, RecordingChannel};
