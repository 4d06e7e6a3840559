mod clock;
mod interval;

pub use clock::SystemClock;
pub use interval::{ThreadIntervalHandle, ThreadIntervalScheduler};
