//! End-to-end export tests: dialog selection protocol, sequential pipeline
//! and download hand-off, against an in-memory store.

use chrono::{NaiveDate, TimeZone, Utc};

use studytrace::export::{run_export_as_of, DownloadSink, ExportArtifact, ExportDialog, ExportScope};
use studytrace::models::{PomodoroEntry, PomodoroKind, TimerMode, VideoWatchSegment};
use studytrace::{CoreError, DailyRecord, Database, ExportOutcome, ReportFormat};

struct ScriptedDialog {
    scope: Option<ExportScope>,
    format: Option<ReportFormat>,
    day: Option<String>,
    steps_taken: Vec<&'static str>,
}

impl ScriptedDialog {
    fn new(scope: Option<ExportScope>, format: Option<ReportFormat>, day: Option<String>) -> Self {
        Self {
            scope,
            format,
            day,
            steps_taken: Vec::new(),
        }
    }
}

impl ExportDialog for ScriptedDialog {
    fn choose_scope(&mut self) -> Option<ExportScope> {
        self.steps_taken.push("scope");
        self.scope
    }

    fn choose_format(&mut self, _scope: ExportScope) -> Option<ReportFormat> {
        self.steps_taken.push("format");
        self.format
    }

    fn choose_day(&mut self) -> Option<String> {
        self.steps_taken.push("day");
        self.day.clone()
    }
}

#[derive(Default)]
struct CapturingSink {
    delivered: Vec<ExportArtifact>,
}

impl DownloadSink for CapturingSink {
    fn deliver(&mut self, artifact: ExportArtifact) {
        self.delivered.push(artifact);
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

async fn seeded_db() -> Database {
    let db = Database::in_memory().unwrap();

    let mut record = DailyRecord::empty("2025-03-10");
    record.total_time = 3600;
    record.effective_time = 3240;
    record.video_count = 2;
    record.longest_session = 2000;
    record.pause_count = 2;
    record.tab_switch_count = 1;
    for (id, hour, watched) in [("BV1a", 9u32, 1800u64), ("BV1b", 11, 1800)] {
        record.videos.insert(
            id.to_string(),
            VideoWatchSegment {
                video_id: id.to_string(),
                title: None,
                watched_seconds: watched,
                start_timestamp: Some(Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()),
                pause_count: 1,
                exit_fullscreen_count: 0,
                tab_switch_count: 0,
                playback_rate: 1.0,
            },
        );
    }
    db.upsert_daily_record(&record).await.unwrap();

    let mut earlier = DailyRecord::empty("2025-03-08");
    earlier.total_time = 1800;
    earlier.effective_time = 1500;
    earlier.video_count = 1;
    db.upsert_daily_record(&earlier).await.unwrap();

    db.upsert_video_title("BV1a", "数据结构 第5讲").await.unwrap();
    db.append_pomodoro_entry(
        "2025-03-10",
        &PomodoroEntry {
            kind: PomodoroKind::Work,
            duration: 1500,
            actual_duration: 1500,
            pomodoro_count: None,
            mode: TimerMode::Countdown,
        },
    )
    .await
    .unwrap();

    db
}

#[tokio::test]
async fn today_markdown_report_reaches_the_sink() {
    let db = seeded_db().await;
    let mut dialog = ScriptedDialog::new(
        Some(ExportScope::Today),
        Some(ReportFormat::Markdown),
        None,
    );
    let mut sink = CapturingSink::default();

    let outcome = run_export_as_of(&db, &mut dialog, &mut sink, today())
        .await
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Delivered(ReportFormat::Markdown));
    assert_eq!(sink.delivered.len(), 1);

    let artifact = &sink.delivered[0];
    assert_eq!(artifact.scope_label, "2025-03-10");
    assert!(artifact.content.contains("# 学习日报 2025-03-10"));
    // Title came from the index, break between the two sessions from the gap.
    assert!(artifact.content.contains("数据结构 第5讲"));
    assert!(artifact.content.contains("休息"));
    assert!(artifact.content.contains("## 番茄钟"));
}

#[tokio::test]
async fn cancelled_format_selection_aborts_before_fetch() {
    let db = seeded_db().await;
    let mut dialog = ScriptedDialog::new(Some(ExportScope::Week), None, None);
    let mut sink = CapturingSink::default();

    let outcome = run_export_as_of(&db, &mut dialog, &mut sink, today())
        .await
        .unwrap();

    assert_eq!(outcome, ExportOutcome::Cancelled);
    assert!(sink.delivered.is_empty());
    assert_eq!(dialog.steps_taken, vec!["scope", "format"]);
}

#[tokio::test]
async fn malformed_custom_date_is_a_validation_error() {
    let db = seeded_db().await;
    let mut dialog = ScriptedDialog::new(
        Some(ExportScope::Day),
        Some(ReportFormat::Csv),
        Some("03/10/2025".to_string()),
    );
    let mut sink = CapturingSink::default();

    let result = run_export_as_of(&db, &mut dialog, &mut sink, today()).await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert!(sink.delivered.is_empty());
}

#[tokio::test]
async fn week_csv_has_a_row_per_day_in_range() {
    let db = seeded_db().await;
    let mut dialog = ScriptedDialog::new(Some(ExportScope::Week), Some(ReportFormat::Csv), None);
    let mut sink = CapturingSink::default();

    run_export_as_of(&db, &mut dialog, &mut sink, today())
        .await
        .unwrap();

    let artifact = &sink.delivered[0];
    assert_eq!(artifact.scope_label, "2025-03-03_2025-03-10");

    let lines: Vec<&str> = artifact.content.trim_end().lines().collect();
    // Header plus 8 days (7 back + today), zero-filled where nothing stored.
    assert_eq!(lines.len(), 9);
    assert!(lines[0].ends_with("日期,学习时长(分钟),学习视频数"));
    assert!(lines.contains(&"2025-03-08,30,1"));
    assert!(lines.contains(&"2025-03-09,0,0"));
    assert!(lines.contains(&"2025-03-10,60,2"));
}

#[tokio::test]
async fn week_json_round_trips_to_identical_csv() {
    let db = seeded_db().await;

    let mut json_dialog =
        ScriptedDialog::new(Some(ExportScope::Week), Some(ReportFormat::Json), None);
    let mut json_sink = CapturingSink::default();
    run_export_as_of(&db, &mut json_dialog, &mut json_sink, today())
        .await
        .unwrap();

    let mut csv_dialog =
        ScriptedDialog::new(Some(ExportScope::Week), Some(ReportFormat::Csv), None);
    let mut csv_sink = CapturingSink::default();
    run_export_as_of(&db, &mut csv_dialog, &mut csv_sink, today())
        .await
        .unwrap();

    let decoded = studytrace::report::json::import(&json_sink.delivered[0].content).unwrap();
    assert_eq!(
        studytrace::report::csv::export(&decoded),
        csv_sink.delivered[0].content
    );
}

#[tokio::test]
async fn month_report_carries_a_trend_note() {
    let db = seeded_db().await;
    let mut dialog = ScriptedDialog::new(
        Some(ExportScope::Month),
        Some(ReportFormat::Markdown),
        None,
    );
    let mut sink = CapturingSink::default();

    run_export_as_of(&db, &mut dialog, &mut sink, today())
        .await
        .unwrap();

    let content = &sink.delivered[0].content;
    assert!(content.contains("# 本月学习报告"));
    // All seeded study happened this period; the previous one was empty.
    assert!(content.contains("比上一周期多学了"));
}
