pub mod presenters;
pub mod system;

pub use presenters::{present_alarm_row, present_clock_json, present_clock_reading, present_lap_rows};
pub use system::{SystemClock, ThreadIntervalHandle, ThreadIntervalScheduler};
