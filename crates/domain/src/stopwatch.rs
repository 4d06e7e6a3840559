use serde::{Deserialize, Serialize};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LapId(u64);

impl LapId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapRecord {
    pub id: LapId,
    pub elapsed_ms: u64,
}

/// Elapsed-time accumulator driven by caller-supplied monotonic milliseconds.
///
/// Elapsed time is always `accumulated_ms` plus the delta since the current
/// run started. Nothing here counts ticks, so the result is the same no matter
/// how often (or how late) it is polled.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    accumulated_ms: u64,
    run_started_at_ms: Option<u64>,
    laps: Vec<LapRecord>,
    next_lap_id: u64,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self {
            accumulated_ms: 0,
            run_started_at_ms: None,
            laps: Vec::new(),
            next_lap_id: 1,
        }
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.run_started_at_ms.is_some()
    }

    /// Returns `false` when already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.run_started_at_ms = Some(now_ms);
        true
    }

    /// Returns `false` when already stopped.
    pub fn stop(&mut self, now_ms: u64) -> bool {
        let Some(started) = self.run_started_at_ms.take() else {
            return false;
        };
        self.accumulated_ms += now_ms.saturating_sub(started);
        true
    }

    pub fn lap(&mut self, now_ms: u64) -> Option<LapRecord> {
        if !self.is_running() {
            return None;
        }
        let record = LapRecord {
            id: LapId(self.next_lap_id),
            elapsed_ms: self.elapsed_ms(now_ms),
        };
        self.next_lap_id += 1;
        self.laps.insert(0, record);
        Some(record)
    }

    /// Clears elapsed time and laps. Ignored while running.
    ///
    /// Lap ids keep counting up across resets.
    pub fn reset(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.accumulated_ms = 0;
        self.laps.clear();
        true
    }

    pub fn can_reset(&self) -> bool {
        !self.is_running() && (self.accumulated_ms > 0 || !self.laps.is_empty())
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.run_started_at_ms {
            Some(started) => self.accumulated_ms + now_ms.saturating_sub(started),
            None => self.accumulated_ms,
        }
    }

    /// Most recent lap first.
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }
}

/// Renders elapsed milliseconds as `HH:MM:SS.mmm`. Hours are not wrapped.
pub fn format_elapsed(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms / MS_PER_MINUTE) % 60;
    let seconds = (ms / MS_PER_SECOND) % 60;
    let millis = ms % MS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Display number for the lap at `index` in a most-recent-first list.
pub fn lap_number(count: usize, index: usize) -> usize {
    count - index
}
