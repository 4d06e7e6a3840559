use serde::{Deserialize, Serialize};

use crate::{DomainError, TimeOfDay};

pub const DEFAULT_ALARM_LABEL: &str = "Alarm";
pub const MAX_ALARM_LABEL_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlarmId(u64);

impl AlarmId {
    #[cfg(test)]
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: AlarmId,
    pub time_of_day: TimeOfDay,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmTrigger {
    pub id: AlarmId,
    pub time_of_day: TimeOfDay,
    pub label: String,
}

/// Alarms in insertion order. Several alarms may share a time.
#[derive(Debug, Clone)]
pub struct AlarmRegistry {
    alarms: Vec<Alarm>,
    next_id: u64,
}

impl Default for AlarmRegistry {
    fn default() -> Self {
        Self {
            alarms: Vec::new(),
            next_id: 1,
        }
    }
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, time: &str, label: &str) -> Result<AlarmId, DomainError> {
        let time = time.trim();
        if time.is_empty() {
            return Err(DomainError::MissingAlarmTime);
        }
        let time_of_day = time.parse::<TimeOfDay>()?;

        let id = AlarmId(self.next_id);
        self.next_id += 1;
        self.alarms.push(Alarm {
            id,
            time_of_day,
            label: normalize_label(label),
            active: true,
        });
        Ok(id)
    }

    /// Flips `active` and returns the new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: AlarmId) -> Option<bool> {
        let alarm = self.alarms.iter_mut().find(|alarm| alarm.id == id)?;
        alarm.active = !alarm.active;
        Some(alarm.active)
    }

    pub fn delete(&mut self, id: AlarmId) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|alarm| alarm.id != id);
        self.alarms.len() != before
    }

    /// Fires and deactivates the first active alarm set for `minute_key`.
    ///
    /// At most one alarm fires per call; later alarms with the same time stay
    /// active.
    pub fn match_and_trigger(&mut self, minute_key: TimeOfDay) -> Option<AlarmTrigger> {
        let alarm = self
            .alarms
            .iter_mut()
            .find(|alarm| alarm.active && alarm.time_of_day == minute_key)?;
        alarm.active = false;
        Some(AlarmTrigger {
            id: alarm.id,
            time_of_day: alarm.time_of_day,
            label: alarm.label.clone(),
        })
    }

    pub fn active_count(&self) -> usize {
        self.alarms.iter().filter(|alarm| alarm.active).count()
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|alarm| alarm.id == id)
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }
}

fn normalize_label(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        return DEFAULT_ALARM_LABEL.to_string();
    }
    label.chars().take(MAX_ALARM_LABEL_CHARS).collect()
}
