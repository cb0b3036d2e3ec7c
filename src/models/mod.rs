mod pomodoro;
mod record;

pub use pomodoro::{PomodoroEntry, PomodoroKind, PomodoroSummary, TimerMode};
pub use record::{DailyRecord, HistoryEntry, VideoWatchSegment};
