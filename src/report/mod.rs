//! Deterministic, side-effect-free report generation.
//!
//! Each generator maps already-fetched data to text; fetching, filename
//! selection and the actual download belong to the export layer and its
//! external collaborators.

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;

use serde::{Deserialize, Serialize};

use crate::models::{DailyRecord, PomodoroSummary};
use crate::quality::QualityScore;
use crate::timeline::{PatternInsights, TimelineEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportFormat {
    Markdown,
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Everything a single-day report renders, assembled by the export pipeline.
#[derive(Debug, Clone, Copy)]
pub struct DayReportData<'a> {
    pub record: &'a DailyRecord,
    pub quality: &'a QualityScore,
    pub events: &'a [TimelineEvent],
    pub insights: &'a PatternInsights,
    pub pomodoro: &'a PomodoroSummary,
    pub suggestions: &'a [String],
}

/// Input for a week/month report: the gap-free day sequence plus the
/// previous period's total for the trend note.
#[derive(Debug, Clone, Copy)]
pub struct PeriodReportData<'a> {
    pub title: &'a str,
    pub days: &'a [DailyRecord],
    pub previous_total_secs: Option<u64>,
}

impl PeriodReportData<'_> {
    pub fn total_secs(&self) -> u64 {
        self.days.iter().map(|day| day.total_time).sum()
    }

    pub fn total_videos(&self) -> u64 {
        self.days.iter().map(|day| u64::from(day.video_count)).sum()
    }

    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|day| !day.is_empty()).count()
    }

    /// Direction of the period-over-period total-time change.
    pub fn trend_note(&self) -> Option<String> {
        use crate::utils::time::format_duration;

        let previous = self.previous_total_secs?;
        let current = self.total_secs();
        let note = if current > previous {
            format!("比上一周期多学了{}", format_duration(current - previous))
        } else if current < previous {
            format!("比上一周期少学了{}", format_duration(previous - current))
        } else {
            "学习总时长与上一周期持平".to_string()
        };
        Some(note)
    }
}
