use std::time::Duration;

use chronodeck_adapters::present_lap_rows;
use chronodeck_application::{
    ActiveAlarmCountQuery, AddAlarmCommand, ApplicationService, BootstrapCommand,
    ClockReadingQuery, DeleteAlarmCommand, LapStopwatchCommand, LapsQuery, ListAlarmsQuery,
    PumpTimersCommand, ResetStopwatchCommand, ServiceConfig, StartStopwatchCommand,
    StopStopwatchCommand, StopwatchDisplayQuery, ToggleAlarmCommand,
};
use chronodeck_domain::{NotificationKind, DEFAULT_ALARM_LABEL, MAX_ALARM_LABEL_CHARS};
use eframe::egui;
use tracing::warn;

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Clock,
    Stopwatch,
    Alarms,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Clock, Tab::Stopwatch, Tab::Alarms];

    fn title(self) -> &'static str {
        match self {
            Tab::Clock => "Digital Clock",
            Tab::Stopwatch => "Stopwatch",
            Tab::Alarms => "Alarms",
        }
    }
}

struct ChronodeckApp {
    service: ApplicationService,
    periods: ServiceConfig,
    tab: Tab,
    alarm_time: String,
    alarm_label: String,
}

impl ChronodeckApp {
    fn new(service: ApplicationService, periods: ServiceConfig) -> Self {
        Self {
            service,
            periods,
            tab: Tab::Clock,
            alarm_time: String::new(),
            alarm_label: String::new(),
        }
    }

    fn clock_tab(&self, ui: &mut egui::Ui) {
        let reading = self.service.clock_reading(ClockReadingQuery);
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(
                egui::RichText::new(&reading.display_time)
                    .size(44.0)
                    .monospace()
                    .strong(),
            );
            ui.label(egui::RichText::new(&reading.display_date).size(18.0));
            ui.add_space(12.0);
            ui.weak("Current system time");
        });
    }

    fn stopwatch_tab(&mut self, ui: &mut egui::Ui) {
        let running = self.service.stopwatch_running();
        let laps = self.service.laps(LapsQuery);

        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(
                egui::RichText::new(self.service.stopwatch_display(StopwatchDisplayQuery))
                    .size(40.0)
                    .monospace(),
            );
            ui.label(if running { "Running..." } else { "Paused / Stopped" });
            ui.add_space(12.0);

            let start_stop = if running { "Stop Timer" } else { "Start Timer" };
            if ui.button(start_stop).clicked() {
                if running {
                    self.service.stop_stopwatch(StopStopwatchCommand);
                } else if let Err(error) = self.service.start_stopwatch(StartStopwatchCommand) {
                    warn!(%error, "failed to start stopwatch");
                }
            }
            let lap_text = format!("Lap Time (Total Laps: {})", laps.len());
            if ui.add_enabled(running, egui::Button::new(lap_text)).clicked() {
                self.service.lap_stopwatch(LapStopwatchCommand);
            }
            if ui
                .add_enabled(self.service.can_reset_stopwatch(), egui::Button::new("Reset Timer"))
                .clicked()
            {
                self.service.reset_stopwatch(ResetStopwatchCommand);
            }
        });

        ui.separator();
        if laps.is_empty() {
            ui.weak("No laps recorded yet.");
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in present_lap_rows(&laps) {
                ui.monospace(row);
            }
        });
    }

    fn alarms_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.alarm_time)
                    .hint_text("HH:MM")
                    .desired_width(64.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.alarm_label)
                    .hint_text(DEFAULT_ALARM_LABEL)
                    .char_limit(MAX_ALARM_LABEL_CHARS)
                    .desired_width(180.0),
            );
            if ui.button("Set Alarm").clicked() {
                let command = AddAlarmCommand {
                    time: self.alarm_time.clone(),
                    label: self.alarm_label.clone(),
                };
                // Rejected input stays in the fields for correction.
                if self.service.add_alarm(command).is_ok() {
                    self.alarm_time.clear();
                    self.alarm_label.clear();
                }
            }
        });

        ui.label(format!(
            "Active alarms: {}",
            self.service.active_alarm_count(ActiveAlarmCountQuery)
        ));
        ui.separator();

        let alarms = self.service.list_alarms(ListAlarmsQuery);
        if alarms.is_empty() {
            ui.weak("No alarms set.");
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            for alarm in alarms {
                ui.horizontal(|ui| {
                    let mut active = alarm.active;
                    if ui.checkbox(&mut active, "").changed() {
                        self.service.toggle_alarm(ToggleAlarmCommand { alarm_id: alarm.id });
                    }
                    ui.monospace(alarm.time_of_day.to_string());
                    ui.label(&alarm.label);
                    if ui.small_button("Delete").clicked() {
                        self.service.delete_alarm(DeleteAlarmCommand { alarm_id: alarm.id });
                    }
                });
            }
        });
    }

    fn notification_modal(&mut self, ctx: &egui::Context) {
        let Some(notification) = self.service.peek_notification() else {
            return;
        };
        let title = match notification.kind {
            NotificationKind::AlarmFired => "Alarm",
            NotificationKind::Validation => "Check your input",
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notification.message);
                if ui.button("OK").clicked() {
                    self.service.take_notification();
                }
            });
    }
}

impl eframe::App for ChronodeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.service.pump(PumpTimersCommand);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.heading("Digital Clock & Stopwatch");
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, tab.title());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Clock => self.clock_tab(ui),
            Tab::Stopwatch => self.stopwatch_tab(ui),
            Tab::Alarms => self.alarms_tab(ui),
        });

        self.notification_modal(ctx);
        ctx.request_repaint_after(repaint_interval(
            self.service.stopwatch_running(),
            &self.periods,
        ));
    }
}

/// Redraw at the stopwatch cadence while it runs, otherwise once per clock tick.
fn repaint_interval(stopwatch_running: bool, periods: &ServiceConfig) -> Duration {
    if stopwatch_running {
        periods.stopwatch_period.min(periods.clock_period)
    } else {
        periods.clock_period
    }
}

pub fn launch_window(mut service: ApplicationService, config: &AppConfig) -> Result<(), String> {
    service
        .bootstrap(BootstrapCommand)
        .map_err(|error| format!("failed to start clock: {error}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };
    let app = ChronodeckApp::new(service, config.service_config());

    eframe::run_native("chronodeck", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|error| format!("failed to start UI: {error}"))
}
