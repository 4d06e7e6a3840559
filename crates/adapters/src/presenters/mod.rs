use chronodeck_application::ApplicationError;
use chronodeck_domain::{format_elapsed, lap_number, Alarm, ClockReading, LapRecord};

pub fn present_clock_reading(reading: &ClockReading) -> String {
    format!("{}\t{}", reading.display_time, reading.display_date)
}

pub fn present_clock_json(reading: &ClockReading) -> Result<String, ApplicationError> {
    serde_json::to_string(reading)
        .map_err(|error| ApplicationError::Io(format!("failed to encode clock reading: {error}")))
}

/// One row per lap, most recent first, numbered so the oldest lap is 1.
pub fn present_lap_rows(laps: &[LapRecord]) -> Vec<String> {
    laps.iter()
        .enumerate()
        .map(|(index, lap)| {
            format!(
                "Lap {}\t{}",
                lap_number(laps.len(), index),
                format_elapsed(lap.elapsed_ms)
            )
        })
        .collect()
}

pub fn present_alarm_row(alarm: &Alarm) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        alarm.id.get(),
        alarm.time_of_day,
        if alarm.active { "on" } else { "off" },
        alarm.label
    )
}
