use chronodeck_domain::{
    format_elapsed, Alarm, AlarmId, AlarmRegistry, ClockReading, LapRecord, Notification,
    NotificationSlot, Stopwatch,
};
use tracing::{debug, info};

use crate::{
    ActiveAlarmCountQuery, AddAlarmCommand, ApplicationError, BootstrapCommand, Clock,
    ClockReadingQuery, DeleteAlarmCommand, IntervalHandle, IntervalScheduler, LapStopwatchCommand,
    LapsQuery, ListAlarmsQuery, PumpReport, PumpTimersCommand, ResetStopwatchCommand,
    ServiceConfig, StartStopwatchCommand, StopStopwatchCommand, StopwatchDisplayQuery,
    ToggleAlarmCommand,
};

pub struct ApplicationService {
    clock: Box<dyn Clock>,
    scheduler: Box<dyn IntervalScheduler>,
    config: ServiceConfig,
    reading: ClockReading,
    stopwatch: Stopwatch,
    alarms: AlarmRegistry,
    notifications: NotificationSlot,
    clock_timer: Option<Box<dyn IntervalHandle>>,
    stopwatch_timer: Option<Box<dyn IntervalHandle>>,
}

impl ApplicationService {
    pub fn new(
        clock: Box<dyn Clock>,
        scheduler: Box<dyn IntervalScheduler>,
        config: ServiceConfig,
    ) -> Self {
        let reading = ClockReading::from_local(clock.now_local());
        Self {
            clock,
            scheduler,
            config,
            reading,
            stopwatch: Stopwatch::new(),
            alarms: AlarmRegistry::new(),
            notifications: NotificationSlot::default(),
            clock_timer: None,
            stopwatch_timer: None,
        }
    }

    /// Takes a fresh reading and starts the clock timer. Calling it again is a
    /// no-op while the clock timer is running.
    pub fn bootstrap(&mut self, _command: BootstrapCommand) -> Result<(), ApplicationError> {
        if self.clock_timer.is_some() {
            return Ok(());
        }
        self.clock_timer = Some(self.scheduler.every(self.config.clock_period)?);
        debug!(
            period_ms = self.config.clock_period.as_millis() as u64,
            "clock timer started"
        );
        self.clock_tick();
        Ok(())
    }

    /// Consumes due timer ticks. The clock is handled first so alarm matching
    /// always sees the newest minute key before anything reads it.
    pub fn pump(&mut self, _command: PumpTimersCommand) -> PumpReport {
        let clock_ticks = self
            .clock_timer
            .as_mut()
            .map_or(0, |timer| timer.drain_ticks());
        if clock_ticks > 0 {
            self.clock_tick();
        }

        let stopwatch_ticks = self
            .stopwatch_timer
            .as_mut()
            .map_or(0, |timer| timer.drain_ticks());

        PumpReport {
            clock_ticks,
            stopwatch_ticks,
        }
    }

    pub fn clock_tick(&mut self) -> &ClockReading {
        self.reading = ClockReading::from_local(self.clock.now_local());
        if let Some(trigger) = self.alarms.match_and_trigger(self.reading.minute_key) {
            info!(
                alarm_id = trigger.id.get(),
                label = %trigger.label,
                time = %trigger.time_of_day,
                "alarm triggered"
            );
            self.notifications.post(Notification::alarm_fired(&trigger));
        }
        &self.reading
    }

    pub fn clock_reading(&self, _query: ClockReadingQuery) -> ClockReading {
        self.reading.clone()
    }

    pub fn start_stopwatch(
        &mut self,
        _command: StartStopwatchCommand,
    ) -> Result<(), ApplicationError> {
        if self.stopwatch.is_running() {
            debug!("start ignored, stopwatch already running");
            return Ok(());
        }

        let timer = self.scheduler.every(self.config.stopwatch_period)?;
        let now = self.clock.monotonic_ms();
        self.stopwatch.start(now);
        self.cancel_stopwatch_timer();
        self.stopwatch_timer = Some(timer);
        info!(
            elapsed_ms = self.stopwatch.elapsed_ms(now),
            "stopwatch started"
        );
        Ok(())
    }

    pub fn stop_stopwatch(&mut self, _command: StopStopwatchCommand) {
        let now = self.clock.monotonic_ms();
        if !self.stopwatch.stop(now) {
            debug!("stop ignored, stopwatch not running");
            return;
        }
        self.cancel_stopwatch_timer();
        info!(
            elapsed_ms = self.stopwatch.elapsed_ms(now),
            "stopwatch stopped"
        );
    }

    pub fn lap_stopwatch(&mut self, _command: LapStopwatchCommand) -> Option<LapRecord> {
        let lap = self.stopwatch.lap(self.clock.monotonic_ms());
        match lap {
            Some(record) => debug!(
                lap_id = record.id.get(),
                elapsed_ms = record.elapsed_ms,
                "lap recorded"
            ),
            None => debug!("lap ignored, stopwatch not running"),
        }
        lap
    }

    pub fn reset_stopwatch(&mut self, _command: ResetStopwatchCommand) {
        if self.stopwatch.reset() {
            debug!("stopwatch reset");
        } else {
            debug!("reset ignored, stopwatch running");
        }
    }

    pub fn stopwatch_display(&self, _query: StopwatchDisplayQuery) -> String {
        format_elapsed(self.stopwatch_elapsed_ms())
    }

    pub fn stopwatch_elapsed_ms(&self) -> u64 {
        self.stopwatch.elapsed_ms(self.clock.monotonic_ms())
    }

    pub fn stopwatch_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    pub fn can_reset_stopwatch(&self) -> bool {
        self.stopwatch.can_reset()
    }

    /// Most recent lap first.
    pub fn laps(&self, _query: LapsQuery) -> Vec<LapRecord> {
        self.stopwatch.laps().to_vec()
    }

    /// On a validation failure the registry is left untouched and the error is
    /// also posted as a notification.
    pub fn add_alarm(&mut self, command: AddAlarmCommand) -> Result<AlarmId, ApplicationError> {
        match self.alarms.add(&command.time, &command.label) {
            Ok(alarm_id) => {
                info!(alarm_id = alarm_id.get(), time = %command.time.trim(), "alarm added");
                Ok(alarm_id)
            }
            Err(error) => {
                debug!(%error, "alarm rejected");
                self.notifications.post(Notification::validation(&error));
                Err(error.into())
            }
        }
    }

    /// Returns the new `active` flag, or `None` when the id is unknown.
    pub fn toggle_alarm(&mut self, command: ToggleAlarmCommand) -> Option<bool> {
        let toggled = self.alarms.toggle(command.alarm_id);
        if toggled.is_none() {
            debug!(alarm_id = command.alarm_id.get(), "toggle ignored, unknown alarm");
        }
        toggled
    }

    pub fn delete_alarm(&mut self, command: DeleteAlarmCommand) -> bool {
        let deleted = self.alarms.delete(command.alarm_id);
        if !deleted {
            debug!(alarm_id = command.alarm_id.get(), "delete ignored, unknown alarm");
        }
        deleted
    }

    pub fn list_alarms(&self, _query: ListAlarmsQuery) -> Vec<Alarm> {
        self.alarms.alarms().to_vec()
    }

    pub fn active_alarm_count(&self, _query: ActiveAlarmCountQuery) -> usize {
        self.alarms.active_count()
    }

    pub fn peek_notification(&self) -> Option<Notification> {
        self.notifications.peek().cloned()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notifications.take()
    }

    /// Cancels every timer. Also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(mut timer) = self.clock_timer.take() {
            timer.cancel();
            debug!("clock timer cancelled");
        }
        self.cancel_stopwatch_timer();
    }

    fn cancel_stopwatch_timer(&mut self) {
        if let Some(mut timer) = self.stopwatch_timer.take() {
            timer.cancel();
            debug!("stopwatch timer cancelled");
        }
    }
}

impl Drop for ApplicationService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime};
    use chronodeck_domain::{DomainError, NotificationKind};

    use super::*;

    fn local(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid instant")
    }

    #[derive(Clone)]
    struct FakeClock {
        local: Rc<Cell<NaiveDateTime>>,
        monotonic_ms: Rc<Cell<u64>>,
    }

    impl FakeClock {
        fn new(local_time: NaiveDateTime) -> Self {
            Self {
                local: Rc::new(Cell::new(local_time)),
                monotonic_ms: Rc::new(Cell::new(0)),
            }
        }

        fn advance_ms(&self, ms: u64) {
            self.monotonic_ms.set(self.monotonic_ms.get() + ms);
        }

        fn set_local(&self, local_time: NaiveDateTime) {
            self.local.set(local_time);
        }
    }

    impl Clock for FakeClock {
        fn now_local(&self) -> NaiveDateTime {
            self.local.get()
        }

        fn monotonic_ms(&self) -> u64 {
            self.monotonic_ms.get()
        }
    }

    struct FakeTimer {
        period: Duration,
        pending: Cell<u64>,
        cancelled: Cell<bool>,
    }

    #[derive(Clone, Default)]
    struct FakeScheduler {
        timers: Rc<RefCell<Vec<Rc<FakeTimer>>>>,
        fail: Rc<Cell<bool>>,
    }

    impl FakeScheduler {
        fn timers_with_period(&self, period: Duration) -> Vec<Rc<FakeTimer>> {
            self.timers
                .borrow()
                .iter()
                .filter(|timer| timer.period == period)
                .cloned()
                .collect()
        }

        fn live_timers(&self) -> usize {
            self.timers
                .borrow()
                .iter()
                .filter(|timer| !timer.cancelled.get())
                .count()
        }

        fn fire(&self, period: Duration, ticks: u64) {
            for timer in self.timers_with_period(period) {
                if !timer.cancelled.get() {
                    timer.pending.set(timer.pending.get() + ticks);
                }
            }
        }
    }

    struct FakeHandle {
        timer: Rc<FakeTimer>,
    }

    impl IntervalHandle for FakeHandle {
        fn drain_ticks(&mut self) -> u64 {
            if self.timer.cancelled.get() {
                return 0;
            }
            self.timer.pending.replace(0)
        }

        fn cancel(&mut self) {
            self.timer.cancelled.set(true);
        }

        fn is_active(&self) -> bool {
            !self.timer.cancelled.get()
        }
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.cancel();
        }
    }

    impl IntervalScheduler for FakeScheduler {
        fn every(&self, period: Duration) -> Result<Box<dyn IntervalHandle>, ApplicationError> {
            if self.fail.get() {
                return Err(ApplicationError::Io("timer unavailable".to_string()));
            }
            let timer = Rc::new(FakeTimer {
                period,
                pending: Cell::new(0),
                cancelled: Cell::new(false),
            });
            self.timers.borrow_mut().push(Rc::clone(&timer));
            Ok(Box::new(FakeHandle { timer }))
        }
    }

    const CLOCK: Duration = Duration::from_millis(1_000);
    const STOPWATCH: Duration = Duration::from_millis(10);

    fn service_at(local_time: NaiveDateTime) -> (ApplicationService, FakeClock, FakeScheduler) {
        let clock = FakeClock::new(local_time);
        let scheduler = FakeScheduler::default();
        let service = ApplicationService::new(
            Box::new(clock.clone()),
            Box::new(scheduler.clone()),
            ServiceConfig::default(),
        );
        (service, clock, scheduler)
    }

    #[test]
    fn bootstrap_starts_clock_timer_once() {
        let (mut service, _clock, scheduler) = service_at(local(9, 0, 0));
        service.bootstrap(BootstrapCommand).expect("bootstrap");
        service.bootstrap(BootstrapCommand).expect("bootstrap again");

        assert_eq!(scheduler.timers_with_period(CLOCK).len(), 1);
        let reading = service.clock_reading(ClockReadingQuery);
        assert_eq!(reading.display_time, "09:00:00 AM");
    }

    #[test]
    fn clock_tick_refreshes_reading_and_fires_alarm_in_same_pump() {
        let (mut service, clock, scheduler) = service_at(local(7, 59, 58));
        service.bootstrap(BootstrapCommand).expect("bootstrap");
        service
            .add_alarm(AddAlarmCommand {
                time: "08:00".to_string(),
                label: "Wake up".to_string(),
            })
            .expect("add alarm");

        assert!(service.pump(PumpTimersCommand).is_idle());
        assert!(service.peek_notification().is_none());

        clock.set_local(local(8, 0, 1));
        scheduler.fire(CLOCK, 1);
        let report = service.pump(PumpTimersCommand);
        assert_eq!(report.clock_ticks, 1);
        assert_eq!(
            service.clock_reading(ClockReadingQuery).minute_key.to_string(),
            "08:00"
        );

        let notification = service.take_notification().expect("alarm fired");
        assert_eq!(notification.kind, NotificationKind::AlarmFired);
        assert_eq!(notification.message, "Wake up (08:00)");
        assert_eq!(service.active_alarm_count(ActiveAlarmCountQuery), 0);

        clock.set_local(local(8, 0, 2));
        scheduler.fire(CLOCK, 1);
        service.pump(PumpTimersCommand);
        assert!(service.take_notification().is_none());
    }

    #[test]
    fn duplicate_alarms_fire_on_consecutive_ticks_and_overwrite_slot() {
        let (mut service, _clock, _scheduler) = service_at(local(8, 0, 0));
        for label in ["First", "Second"] {
            service
                .add_alarm(AddAlarmCommand {
                    time: "08:00".to_string(),
                    label: label.to_string(),
                })
                .expect("add alarm");
        }

        service.clock_tick();
        assert_eq!(service.active_alarm_count(ActiveAlarmCountQuery), 1);
        service.clock_tick();
        assert_eq!(service.active_alarm_count(ActiveAlarmCountQuery), 0);

        let pending = service.take_notification().expect("pending");
        assert_eq!(pending.message, "Second (08:00)");
        assert!(service.take_notification().is_none());
    }

    #[test]
    fn start_and_stop_own_the_stopwatch_timer() {
        let (mut service, clock, scheduler) = service_at(local(12, 0, 0));
        service.start_stopwatch(StartStopwatchCommand).expect("start");
        service.start_stopwatch(StartStopwatchCommand).expect("start again");
        assert_eq!(scheduler.timers_with_period(STOPWATCH).len(), 1);
        assert!(service.stopwatch_running());

        clock.advance_ms(250);
        scheduler.fire(STOPWATCH, 25);
        assert_eq!(service.pump(PumpTimersCommand).stopwatch_ticks, 25);

        service.stop_stopwatch(StopStopwatchCommand);
        assert!(!service.stopwatch_running());
        assert_eq!(scheduler.live_timers(), 0);
        assert_eq!(service.stopwatch_display(StopwatchDisplayQuery), "00:00:00.250");

        scheduler.fire(STOPWATCH, 3);
        assert!(service.pump(PumpTimersCommand).is_idle());
    }

    #[test]
    fn delayed_and_irregular_ticks_do_not_drift() {
        let (mut service, clock, scheduler) = service_at(local(12, 0, 0));
        service.start_stopwatch(StartStopwatchCommand).expect("start");

        let mut wall_ms = 0;
        for (delay_ms, ticks) in [(7, 0), (37, 1), (1_503, 1), (10, 1), (64_019, 0)] {
            clock.advance_ms(delay_ms);
            wall_ms += delay_ms;
            scheduler.fire(STOPWATCH, ticks);
            service.pump(PumpTimersCommand);
            assert_eq!(service.stopwatch_elapsed_ms(), wall_ms);
        }
        assert_eq!(service.stopwatch_display(StopwatchDisplayQuery), "00:01:05.576");

        service.stop_stopwatch(StopStopwatchCommand);
        clock.advance_ms(30_000);
        service.start_stopwatch(StartStopwatchCommand).expect("resume");
        clock.advance_ms(424);
        service.stop_stopwatch(StopStopwatchCommand);
        assert_eq!(service.stopwatch_elapsed_ms(), wall_ms + 424);
    }

    #[test]
    fn lap_while_stopped_and_reset_while_running_are_ignored() {
        let (mut service, clock, _scheduler) = service_at(local(12, 0, 0));
        assert!(service.lap_stopwatch(LapStopwatchCommand).is_none());
        assert!(service.laps(LapsQuery).is_empty());

        service.start_stopwatch(StartStopwatchCommand).expect("start");
        clock.advance_ms(1_200);
        service.lap_stopwatch(LapStopwatchCommand).expect("lap");
        clock.advance_ms(800);
        service.lap_stopwatch(LapStopwatchCommand).expect("lap");

        service.reset_stopwatch(ResetStopwatchCommand);
        assert!(service.stopwatch_running());
        assert!(!service.can_reset_stopwatch());
        let laps = service.laps(LapsQuery);
        assert_eq!(
            laps.iter().map(|lap| lap.elapsed_ms).collect::<Vec<_>>(),
            vec![2_000, 1_200]
        );

        service.stop_stopwatch(StopStopwatchCommand);
        assert!(service.can_reset_stopwatch());
        service.reset_stopwatch(ResetStopwatchCommand);
        assert!(service.laps(LapsQuery).is_empty());
        assert_eq!(service.stopwatch_display(StopwatchDisplayQuery), "00:00:00.000");
    }

    #[test]
    fn add_alarm_with_empty_time_posts_validation_and_keeps_registry() {
        let (mut service, _clock, _scheduler) = service_at(local(12, 0, 0));
        let result = service.add_alarm(AddAlarmCommand {
            time: String::new(),
            label: "Gym".to_string(),
        });

        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::MissingAlarmTime))
        ));
        assert!(service.list_alarms(ListAlarmsQuery).is_empty());
        let notification = service.peek_notification().expect("validation message");
        assert_eq!(notification.kind, NotificationKind::Validation);
    }

    #[test]
    fn toggle_and_delete_unknown_alarm_are_noops() {
        let (mut service, _clock, _scheduler) = service_at(local(12, 0, 0));
        let alarm_id = service
            .add_alarm(AddAlarmCommand {
                time: "13:00".to_string(),
                label: String::new(),
            })
            .expect("add alarm");
        assert!(service.delete_alarm(DeleteAlarmCommand { alarm_id }));

        assert_eq!(service.toggle_alarm(ToggleAlarmCommand { alarm_id }), None);
        assert!(!service.delete_alarm(DeleteAlarmCommand { alarm_id }));
        assert!(service.list_alarms(ListAlarmsQuery).is_empty());
        assert!(service.peek_notification().is_none());
    }

    #[test]
    fn failed_timer_leaves_stopwatch_stopped() {
        let (mut service, _clock, scheduler) = service_at(local(12, 0, 0));
        scheduler.fail.set(true);
        let result = service.start_stopwatch(StartStopwatchCommand);
        assert!(matches!(result, Err(ApplicationError::Io(_))));
        assert!(!service.stopwatch_running());
    }

    #[test]
    fn shutdown_and_drop_cancel_all_timers() {
        let (mut service, _clock, scheduler) = service_at(local(12, 0, 0));
        service.bootstrap(BootstrapCommand).expect("bootstrap");
        service.start_stopwatch(StartStopwatchCommand).expect("start");
        assert_eq!(scheduler.live_timers(), 2);

        service.shutdown();
        assert_eq!(scheduler.live_timers(), 0);

        service.bootstrap(BootstrapCommand).expect("bootstrap again");
        assert_eq!(scheduler.live_timers(), 1);
        drop(service);
        assert_eq!(scheduler.live_timers(), 0);
    }
}
