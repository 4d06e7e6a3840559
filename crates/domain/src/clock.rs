use chrono::NaiveDateTime;
use serde::Serialize;

use crate::TimeOfDay;

const DISPLAY_TIME_FORMAT: &str = "%I:%M:%S %p";
const DISPLAY_DATE_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub instant: NaiveDateTime,
    pub display_time: String,
    pub display_date: String,
    pub minute_key: TimeOfDay,
}

impl ClockReading {
    pub fn from_local(instant: NaiveDateTime) -> Self {
        Self {
            display_time: instant.format(DISPLAY_TIME_FORMAT).to_string(),
            display_date: instant.format(DISPLAY_DATE_FORMAT).to_string(),
            minute_key: TimeOfDay::of(&instant),
            instant,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid instant")
    }

    #[test]
    fn afternoon_reading_uses_12_hour_display_and_24_hour_key() {
        let reading = ClockReading::from_local(at(14, 5, 9));
        assert_eq!(reading.display_time, "02:05:09 PM");
        assert_eq!(reading.display_date, "Sunday, October 18, 2026");
        assert_eq!(reading.minute_key.to_string(), "14:05");
    }

    #[test]
    fn midnight_displays_as_twelve_am() {
        let reading = ClockReading::from_local(at(0, 0, 0));
        assert_eq!(reading.display_time, "12:00:00 AM");
        assert_eq!(reading.minute_key.to_string(), "00:00");
    }

    #[test]
    fn single_digit_day_is_not_padded() {
        let instant = NaiveDate::from_ymd_opt(2026, 3, 4)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid instant");
        let reading = ClockReading::from_local(instant);
        assert_eq!(reading.display_date, "Wednesday, March 4, 2026");
    }
}
