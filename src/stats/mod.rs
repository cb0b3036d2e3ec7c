//! Daily record aggregation: period ranges, gap-free daily buckets and the
//! paginated watch history.

use std::str::FromStr;

use chrono::{Days, Local, Months, NaiveDate, NaiveDateTime};
use log::debug;

use crate::db::Database;
use crate::error::{CoreError, CoreResult};
use crate::models::{DailyRecord, HistoryEntry};
use crate::utils::time::day_key;

/// Largest page the history query will serve in one call.
pub const MAX_HISTORY_LIMIT: u32 = 200;

/// Ceiling applied to the `all` period.
const ALL_PERIOD_MONTHS: u32 = 120;

/// Symbolic or explicit date range used to bucket daily records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
    All,
    Days(u32),
}

impl FromStr for Period {
    type Err = CoreError;

    /// Wire form used by UI callers: `week`, `month`, `year`, `all`, or a
    /// bare day count like `30`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => match other.parse::<u32>() {
                Ok(days) if days > 0 => Ok(Period::Days(days)),
                _ => Err(CoreError::Validation(format!("unknown period '{other}'"))),
            },
        }
    }
}

/// Inclusive date range, start pinned to 00:00:00.000 and end to
/// 23:59:59.999 of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodRange {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Every date in the range, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date();
        self.start_date()
            .iter_days()
            .take_while(move |date| *date <= end)
    }

    pub fn day_count(&self) -> usize {
        (self.end_date() - self.start_date()).num_days() as usize + 1
    }
}

/// Map a period to the inclusive range ending at `today` 23:59:59.999.
pub fn resolve_period_range(period: Period, today: NaiveDate) -> PeriodRange {
    let start_date = match period {
        Period::Week => today.checked_sub_days(Days::new(7)),
        Period::Month => today.checked_sub_months(Months::new(1)),
        Period::Year => today.checked_sub_months(Months::new(12)),
        Period::All => today.checked_sub_months(Months::new(ALL_PERIOD_MONTHS)),
        Period::Days(days) => today.checked_sub_days(Days::new(u64::from(days))),
    }
    .unwrap_or(today);

    PeriodRange {
        start: start_date.and_hms_opt(0, 0, 0).expect("midnight is valid"),
        end: today
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("end of day is valid"),
    }
}

/// `resolve_period_range` against the local calendar clock.
pub fn resolve_period_range_now(period: Period) -> PeriodRange {
    resolve_period_range(period, Local::now().date_naive())
}

/// Every daily record in the period, ascending and gap-free: dates without a
/// stored record come back zero-filled so charts and heatmaps can index by
/// position.
pub async fn fetch_daily_stats(db: &Database, period: Period) -> CoreResult<Vec<DailyRecord>> {
    fetch_daily_stats_as_of(db, period, Local::now().date_naive()).await
}

pub async fn fetch_daily_stats_as_of(
    db: &Database,
    period: Period,
    today: NaiveDate,
) -> CoreResult<Vec<DailyRecord>> {
    let range = resolve_period_range(period, today);
    let start_key = day_key(range.start_date());
    let end_key = day_key(range.end_date());

    let stored = db
        .get_daily_records_between(&start_key, &end_key)
        .await
        .map_err(CoreError::data_unavailable)?;
    debug!(
        "Loaded {} stored records for {start_key}..{end_key}",
        stored.len()
    );

    let mut stored = stored.into_iter().peekable();
    let mut days = Vec::with_capacity(range.day_count());
    for date in range.dates() {
        let key = day_key(date);
        match stored.peek() {
            Some(record) if record.date == key => days.push(stored.next().expect("peeked")),
            _ => days.push(DailyRecord::empty(key)),
        }
    }

    Ok(days)
}

/// Up to `limit` most-recent watch segments across all dates, newest first,
/// with `offset` for pagination.
pub async fn fetch_history(
    db: &Database,
    limit: u32,
    offset: u32,
) -> CoreResult<Vec<HistoryEntry>> {
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(CoreError::Validation(format!(
            "history limit must be between 1 and {MAX_HISTORY_LIMIT}, got {limit}"
        )));
    }

    db.get_recent_segments(limit, offset)
        .await
        .map_err(CoreError::data_unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::VideoWatchSegment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_strings_parse() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("all".parse::<Period>().unwrap(), Period::All);
        assert_eq!("30".parse::<Period>().unwrap(), Period::Days(30));
        assert!(matches!(
            "fortnight".parse::<Period>(),
            Err(CoreError::Validation(_))
        ));
        assert!("0".parse::<Period>().is_err());
    }

    #[test]
    fn week_range_covers_eight_days() {
        let range = resolve_period_range(Period::Week, date(2025, 3, 10));
        assert_eq!(range.start_date(), date(2025, 3, 3));
        assert_eq!(range.end_date(), date(2025, 3, 10));
        assert_eq!(range.day_count(), 8);
        assert_eq!(range.start.time(), chrono::NaiveTime::MIN);
        assert_eq!(
            range.end,
            date(2025, 3, 10).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn month_and_year_use_calendar_offsets() {
        let range = resolve_period_range(Period::Month, date(2025, 3, 31));
        assert_eq!(range.start_date(), date(2025, 2, 28));

        let range = resolve_period_range(Period::Year, date(2024, 2, 29));
        assert_eq!(range.start_date(), date(2023, 2, 28));

        let range = resolve_period_range(Period::All, date(2025, 3, 10));
        assert_eq!(range.start_date(), date(2015, 3, 10));
    }

    #[tokio::test]
    async fn week_stats_are_gap_free_and_ascending() {
        let db = Database::in_memory().unwrap();

        let mut record = DailyRecord::empty("2025-03-08");
        record.total_time = 600;
        record.effective_time = 540;
        record.video_count = 1;
        record.videos.insert(
            "BV1x".into(),
            VideoWatchSegment {
                video_id: "BV1x".into(),
                title: Some("线性代数".into()),
                watched_seconds: 600,
                start_timestamp: Some(Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap()),
                pause_count: 0,
                exit_fullscreen_count: 0,
                tab_switch_count: 0,
                playback_rate: 1.0,
            },
        );
        db.upsert_daily_record(&record).await.unwrap();

        let days = fetch_daily_stats_as_of(&db, Period::Week, date(2025, 3, 10))
            .await
            .unwrap();

        assert_eq!(days.len(), 8);
        assert_eq!(days.first().unwrap().date, "2025-03-03");
        assert_eq!(days.last().unwrap().date, "2025-03-10");
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }

        let hit = days.iter().find(|d| d.date == "2025-03-08").unwrap();
        assert_eq!(hit.total_time, 600);
        assert_eq!(days.iter().filter(|d| d.is_empty()).count(), 7);
    }

    #[tokio::test]
    async fn history_limit_is_validated() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            fetch_history(&db, 0, 0).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            fetch_history(&db, MAX_HISTORY_LIMIT + 1, 0).await,
            Err(CoreError::Validation(_))
        ));
        assert!(fetch_history(&db, 10, 0).await.unwrap().is_empty());
    }
}
