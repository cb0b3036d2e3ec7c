//! JSON raw export: pretty array of per-date objects preserving the full
//! DailyRecord shape, with titles resolved from the video-title index.
//!
//! Decoding the export yields records equivalent to the source, so any
//! report derived from the decoded data matches one derived directly.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::DailyRecord;

/// Serialize the day sequence, filling in titles segments lack.
pub fn export(days: &[DailyRecord], titles: &HashMap<String, String>) -> CoreResult<String> {
    let resolved: Vec<DailyRecord> = days.iter().map(|day| resolve_titles(day, titles)).collect();
    serde_json::to_string_pretty(&resolved).map_err(|err| CoreError::Render(err.to_string()))
}

/// Decode a previous export back into records.
pub fn import(text: &str) -> CoreResult<Vec<DailyRecord>> {
    serde_json::from_str(text)
        .map_err(|err| CoreError::Validation(format!("malformed JSON export: {err}")))
}

fn resolve_titles(day: &DailyRecord, titles: &HashMap<String, String>) -> DailyRecord {
    let mut day = day.clone();
    for segment in day.videos.values_mut() {
        if segment.title.is_none() {
            segment.title = titles.get(&segment.video_id).cloned();
        }
    }
    day
}
