//! studytrace: analytics core for a video study-time tracker.
//!
//! Turns stored per-video watch segments into daily aggregates, a weighted
//! focus-quality score, a reconstructed watch/break timeline and exportable
//! reports (Markdown/HTML/CSV/JSON). Capture, UI and download mechanics live
//! in the host shell; this crate only reads study data.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod quality;
pub mod query;
pub mod report;
pub mod stats;
pub mod timeline;
pub mod utils;

pub use db::Database;
pub use error::{CoreError, CoreResult};
pub use export::{
    run_export, DownloadSink, ExportArtifact, ExportDialog, ExportOutcome, ExportScope,
};
pub use models::{DailyRecord, HistoryEntry, PomodoroEntry, VideoWatchSegment};
pub use quality::{calculate_quality_score, DayMetrics, QualityScore};
pub use report::ReportFormat;
pub use stats::{fetch_daily_stats, fetch_history, resolve_period_range, Period};
pub use timeline::{analyze_patterns, reconstruct_timeline, TimelineEvent};
