use std::time::Duration;

use chronodeck_domain::AlarmId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub clock_period: Duration,
    pub stopwatch_period: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            clock_period: Duration::from_millis(1_000),
            stopwatch_period: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub clock_ticks: u64,
    pub stopwatch_ticks: u64,
}

impl PumpReport {
    pub fn is_idle(&self) -> bool {
        self.clock_ticks == 0 && self.stopwatch_ticks == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct BootstrapCommand;

#[derive(Debug, Clone, Default)]
pub struct PumpTimersCommand;

#[derive(Debug, Clone, Default)]
pub struct ClockReadingQuery;

#[derive(Debug, Clone, Default)]
pub struct StartStopwatchCommand;

#[derive(Debug, Clone, Default)]
pub struct StopStopwatchCommand;

#[derive(Debug, Clone, Default)]
pub struct LapStopwatchCommand;

#[derive(Debug, Clone, Default)]
pub struct ResetStopwatchCommand;

#[derive(Debug, Clone, Default)]
pub struct StopwatchDisplayQuery;

#[derive(Debug, Clone, Default)]
pub struct LapsQuery;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddAlarmCommand {
    pub time: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ToggleAlarmCommand {
    pub alarm_id: AlarmId,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteAlarmCommand {
    pub alarm_id: AlarmId,
}

#[derive(Debug, Clone, Default)]
pub struct ListAlarmsQuery;

#[derive(Debug, Clone, Default)]
pub struct ActiveAlarmCountQuery;
