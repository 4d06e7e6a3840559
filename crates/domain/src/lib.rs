mod alarm;
mod clock;
mod error;
mod notification;
mod stopwatch;
mod time_of_day;

pub use alarm::{
    Alarm, AlarmId, AlarmRegistry, AlarmTrigger, DEFAULT_ALARM_LABEL, MAX_ALARM_LABEL_CHARS,
};
pub use clock::ClockReading;
pub use error::DomainError;
pub use notification::{Notification, NotificationKind, NotificationSlot};
pub use stopwatch::{format_elapsed, lap_number, LapId, LapRecord, Stopwatch};
pub use time_of_day::TimeOfDay;
