//! Pomodoro timer history entries and their per-day summary.

use serde::{Deserialize, Serialize};

/// Seconds in one standard 25-minute pomodoro unit.
pub const POMODORO_UNIT_SECS: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroKind {
    Work,
    Break,
}

impl PomodoroKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroKind::Work => "work",
            PomodoroKind::Break => "break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Countdown,
    Countup,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "countdown",
            TimerMode::Countup => "countup",
        }
    }
}

/// One logged work or break interval. Entries for a date form an ordered
/// sequence; insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroEntry {
    pub kind: PomodoroKind,
    /// Planned length in seconds.
    pub duration: u64,
    /// Actual elapsed seconds; may differ from the planned length.
    pub actual_duration: u64,
    /// Fractional count of standard 25-minute units. Derived from
    /// `actual_duration` when not recorded explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro_count: Option<f64>,
    pub mode: TimerMode,
}

impl PomodoroEntry {
    /// Explicit unit count when present, otherwise `actual_duration / 1500`.
    pub fn units(&self) -> f64 {
        match self.pomodoro_count {
            Some(count) => count,
            None => self.actual_duration as f64 / POMODORO_UNIT_SECS,
        }
    }
}

/// Rolled-up pomodoro figures for one day, shown in day reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSummary {
    pub work_count: u32,
    pub break_count: u32,
    /// Seconds actually spent in work intervals.
    pub focused_secs: u64,
    /// Summed fractional pomodoro units across work intervals.
    pub units: f64,
}

impl PomodoroSummary {
    pub fn from_entries(entries: &[PomodoroEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                PomodoroKind::Work => {
                    summary.work_count += 1;
                    summary.focused_secs += entry.actual_duration;
                    summary.units += entry.units();
                }
                PomodoroKind::Break => summary.break_count += 1,
            }
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.work_count == 0 && self.break_count == 0
    }
}
