use std::time::Duration;

use chrono::NaiveDateTime;

use crate::ApplicationError;

pub trait Clock {
    /// Local wall-clock time, used for display and alarm matching.
    fn now_local(&self) -> NaiveDateTime;

    /// Monotonic milliseconds from an arbitrary origin, used for elapsed time.
    fn monotonic_ms(&self) -> u64;
}

/// Starts periodic timers. Each returned handle owns one timer.
pub trait IntervalScheduler {
    fn every(&self, period: Duration) -> Result<Box<dyn IntervalHandle>, ApplicationError>;
}

/// A running periodic timer. Implementations must stop delivering ticks once
/// cancelled and must cancel themselves when dropped.
pub trait IntervalHandle {
    /// Number of periods that fired since the last call. Never blocks.
    fn drain_ticks(&mut self) -> u64;

    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}
