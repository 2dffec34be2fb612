//! Orchestration services for the notification context.

mod dispatcher;
mod sweep;

pub use dispatcher::NotificationDispatcher;
pub use sweep::{
    AtRiskSweep, DueSoonSweep, SweepError, SweepReport, DEFAULT_DUE_SOON_DAYS,
};
