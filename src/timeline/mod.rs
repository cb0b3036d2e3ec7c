//! Timeline reconstruction: turns one day's watch segments into an ordered
//! watch/break event sequence and derives pattern insights from it.

pub mod render;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DailyRecord;
use crate::utils::time::format_duration;

/// Gap between two watch spans that counts as a break; anything shorter is
/// absorbed as natural pausing within continuous viewing.
pub const BREAK_GAP_SECS: i64 = 180;

/// Breaks shorter than this count towards "good continuity".
const SHORT_BREAK_SECS: u64 = 600;

/// Share of short breaks needed for the "good continuity" flag.
const GOOD_CONTINUITY_RATIO: f64 = 0.7;

/// A reconstructed, non-overlapping interval of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimelineEvent {
    #[serde(rename_all = "camelCase")]
    Video {
        video_id: String,
        title: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration_secs: u64,
    },
    #[serde(rename_all = "camelCase")]
    Break {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration_secs: u64,
    },
}

impl TimelineEvent {
    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            TimelineEvent::Video { start_time, .. } | TimelineEvent::Break { start_time, .. } => {
                *start_time
            }
        }
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        match self {
            TimelineEvent::Video { end_time, .. } | TimelineEvent::Break { end_time, .. } => {
                *end_time
            }
        }
    }

    pub fn duration_secs(&self) -> u64 {
        match self {
            TimelineEvent::Video { duration_secs, .. }
            | TimelineEvent::Break { duration_secs, .. } => *duration_secs,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TimelineEvent::Break { .. })
    }
}

/// Rebuild the day's chronological event list from its watch segments.
///
/// Segments without a recorded start time are skipped. A break event is
/// emitted between consecutive watch spans iff the gap exceeds
/// [`BREAK_GAP_SECS`]. Watch spans that would overlap the next start are
/// truncated so adjacent events never overlap.
pub fn reconstruct_timeline(
    record: &DailyRecord,
    titles: &HashMap<String, String>,
) -> Vec<TimelineEvent> {
    let mut watched: Vec<_> = record
        .videos
        .values()
        .filter_map(|segment| segment.start_timestamp.map(|start| (start, segment)))
        .collect();
    watched.sort_by_key(|(start, _)| *start);

    let mut events = Vec::with_capacity(watched.len() * 2);
    for (index, (start, segment)) in watched.iter().enumerate() {
        let mut end = *start + Duration::seconds(segment.watched_seconds as i64);

        // Truncate at the next segment's start so events never overlap.
        if let Some((next_start, _)) = watched.get(index + 1) {
            if end > *next_start {
                end = *next_start;
            }
        }
        let duration_secs = (end - *start).num_seconds().max(0) as u64;

        if let Some(last_end) = events.last().map(TimelineEvent::end_time) {
            let gap = (*start - last_end).num_seconds();
            if gap > BREAK_GAP_SECS {
                events.push(TimelineEvent::Break {
                    start_time: last_end,
                    end_time: *start,
                    duration_secs: gap as u64,
                });
            }
        }

        let title = segment
            .title
            .clone()
            .or_else(|| titles.get(&segment.video_id).cloned())
            .unwrap_or_else(|| segment.video_id.clone());

        events.push(TimelineEvent::Video {
            video_id: segment.video_id.clone(),
            title,
            start_time: *start,
            end_time: end,
            duration_secs,
        });
    }

    events
}

/// Insights derived from the reconstructed event list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternInsights {
    /// Hour of day (0-23) with the most watched time, and that total.
    pub peak_hour: Option<(u32, u64)>,
    pub break_count: u32,
    pub avg_break_secs: Option<u64>,
    /// Set when at least 70% of breaks stay under ten minutes.
    pub good_continuity: bool,
    pub longest_session_secs: Option<u64>,
}

pub fn analyze_patterns(events: &[TimelineEvent], longest_session: u64) -> PatternInsights {
    let mut by_hour: HashMap<u32, u64> = HashMap::new();
    let mut break_total: u64 = 0;
    let mut break_count: u32 = 0;
    let mut short_breaks: u32 = 0;

    for event in events {
        match event {
            TimelineEvent::Video {
                start_time,
                duration_secs,
                ..
            } => {
                *by_hour.entry(start_time.hour()).or_default() += duration_secs;
            }
            TimelineEvent::Break { duration_secs, .. } => {
                break_count += 1;
                break_total += duration_secs;
                if *duration_secs < SHORT_BREAK_SECS {
                    short_breaks += 1;
                }
            }
        }
    }

    // Ties resolve to the earlier hour so the result is deterministic.
    let peak_hour = by_hour
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .filter(|(_, total)| *total > 0);

    let avg_break_secs = (break_count > 0).then(|| break_total / u64::from(break_count));
    let good_continuity = break_count > 0
        && f64::from(short_breaks) / f64::from(break_count) >= GOOD_CONTINUITY_RATIO;

    PatternInsights {
        peak_hour,
        break_count,
        avg_break_secs,
        good_continuity,
        longest_session_secs: (longest_session > 0).then_some(longest_session),
    }
}

impl PatternInsights {
    /// Human-readable insight lines for the reports.
    pub fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();

        if let Some((hour, total)) = self.peak_hour {
            notes.push(format!(
                "最佳学习时段：{hour:02}:00-{:02}:00，共学习{}",
                (hour + 1) % 24,
                format_duration(total)
            ));
        }

        if self.break_count == 0 {
            notes.push("全程非常专注，没有中断。".to_string());
        } else if let Some(avg) = self.avg_break_secs {
            notes.push(format!(
                "共休息{}次，平均每次{}",
                self.break_count,
                format_duration(avg)
            ));
            if self.good_continuity {
                notes.push("大部分休息都在10分钟以内，学习连贯性很好。".to_string());
            }
        }

        if let Some(longest) = self.longest_session_secs {
            notes.push(format!("最长连续学习{}", format_duration(longest)));
        }

        notes
    }
}
