//! Daily study records and the per-video watch segments embedded in them.
//!
//! These are written by the capture subsystem and only read by this crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One video's recorded viewing activity for one calendar day.
///
/// Owned by its `DailyRecord`; never referenced from anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWatchSegment {
    pub video_id: String,
    /// Embedded title; may be absent, in which case the video-title index
    /// is consulted when rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub watched_seconds: u64,
    /// First moment the video was watched that day. Segments without one
    /// are ineligible for timeline reconstruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pause_count: u32,
    #[serde(default)]
    pub exit_fullscreen_count: u32,
    #[serde(default)]
    pub tab_switch_count: u32,
    pub playback_rate: f64,
}

/// Aggregated totals and embedded watch segments for one calendar day,
/// keyed by `YYYY-MM-DD`.
///
/// Invariants: `effective_time <= total_time` and
/// `video_count == videos.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: String,
    /// Total watched time in seconds.
    pub total_time: u64,
    /// Watched time excluding detected idle/paused spans, in seconds.
    pub effective_time: u64,
    pub video_count: u32,
    /// Longest unbroken watch span in seconds.
    pub longest_session: u64,
    pub pause_count: u32,
    pub exit_fullscreen_count: u32,
    pub tab_switch_count: u32,
    /// BTreeMap keeps serialization order deterministic.
    #[serde(default)]
    pub videos: BTreeMap<String, VideoWatchSegment>,
}

impl DailyRecord {
    /// Zero-filled placeholder for a date with no stored record.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            total_time: 0,
            effective_time: 0,
            video_count: 0,
            longest_session: 0,
            pause_count: 0,
            exit_fullscreen_count: 0,
            tab_switch_count: 0,
            videos: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_time == 0 && self.videos.is_empty()
    }
}

/// One row of the paginated watch history: a segment plus the day it
/// belongs to and its resolved title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: String,
    pub video_id: String,
    pub title: Option<String>,
    pub watched_seconds: u64,
    pub start_timestamp: DateTime<Utc>,
    pub playback_rate: f64,
}
