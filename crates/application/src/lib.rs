mod error;
mod ports;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{Clock, IntervalHandle, IntervalScheduler};
pub use service::ApplicationService;
pub use use_cases::{
    ActiveAlarmCountQuery, AddAlarmCommand, BootstrapCommand, ClockReadingQuery,
    DeleteAlarmCommand, LapStopwatchCommand, LapsQuery, ListAlarmsQuery, PumpReport,
    PumpTimersCommand, ResetStopwatchCommand, ServiceConfig, StartStopwatchCommand,
    StopStopwatchCommand, StopwatchDisplayQuery, ToggleAlarmCommand,
};
