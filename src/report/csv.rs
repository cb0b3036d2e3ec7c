//! CSV raw export.
//!
//! The header is fixed (and Chinese, matching the product UI); the file is
//! prefixed with a UTF-8 BOM so spreadsheet software picks the right
//! charset.

use std::fmt::Write;

use crate::models::DailyRecord;
use crate::utils::time::secs_to_minutes;

pub const CSV_BOM: &str = "\u{feff}";
pub const CSV_HEADER: &str = "日期,学习时长(分钟),学习视频数";

/// One row per date in the requested range, minutes rounded from stored
/// seconds.
pub fn export(days: &[DailyRecord]) -> String {
    let mut out = String::with_capacity(days.len() * 24 + 64);
    out.push_str(CSV_BOM);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for day in days {
        let _ = writeln!(
            out,
            "{},{},{}",
            day.date,
            secs_to_minutes(day.total_time),
            day.video_count
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, total: u64, videos: u32) -> DailyRecord {
        let mut record = DailyRecord::empty(date);
        record.total_time = total;
        record.video_count = videos;
        record
    }

    #[test]
    fn row_count_matches_requested_range() {
        let days = vec![
            day("2025-03-03", 3600, 2),
            day("2025-03-04", 0, 0),
            day("2025-03-05", 89, 1),
        ];
        let csv = export(&days);

        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 1 + days.len());
        assert_eq!(lines[0], format!("{CSV_BOM}{CSV_HEADER}"));
        assert_eq!(lines[1], "2025-03-03,60,2");
        assert_eq!(lines[2], "2025-03-04,0,0");
        // 89 seconds round to 1 minute.
        assert_eq!(lines[3], "2025-03-05,1,1");
    }

    #[test]
    fn empty_range_is_header_only() {
        let csv = export(&[]);
        assert_eq!(csv, format!("{CSV_BOM}{CSV_HEADER}\n"));
    }
}
