//! Export orchestration: a finite selection protocol with the external
//! dialog, then a strictly sequential pipeline
//! fetch → aggregate → score → timeline → render → download hand-off.
//!
//! Any cancelled selection aborts before the fetch stage; no partial report
//! is ever produced. The orchestrator never writes study data.

use chrono::{Days, Local, NaiveDate};
use log::{debug, info};

use crate::db::Database;
use crate::error::{CoreError, CoreResult};
use crate::models::{DailyRecord, PomodoroSummary};
use crate::quality::{calculate_quality_score, generate_suggestions, DayMetrics};
use crate::report::{csv, html, json, markdown};
use crate::report::{DayReportData, PeriodReportData, ReportFormat};
use crate::stats::{fetch_daily_stats_as_of, resolve_period_range, Period};
use crate::timeline::{analyze_patterns, reconstruct_timeline};
use crate::utils::time::{day_key, parse_day_key};

/// What the report covers; chosen first in the dialog sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    Today,
    /// A specific day; the date is asked for in a follow-up selection.
    Day,
    Week,
    Month,
}

/// The selection protocol with the UI collaborator. Each step may return
/// `None` when the user abandons the dialog.
pub trait ExportDialog {
    fn choose_scope(&mut self) -> Option<ExportScope>;
    fn choose_format(&mut self, scope: ExportScope) -> Option<ReportFormat>;
    /// Raw user input for the custom date; only asked for `ExportScope::Day`.
    fn choose_day(&mut self) -> Option<String>;
}

/// External download mechanism. Filename and MIME selection happen behind
/// this boundary.
pub trait DownloadSink {
    fn deliver(&mut self, artifact: ExportArtifact);
}

/// A finished report ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ReportFormat,
    /// Date or date-range label the report covers, e.g. `2025-03-07`.
    pub scope_label: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Delivered(ReportFormat),
    Cancelled,
}

/// Run one export request against the local calendar clock.
pub async fn run_export(
    db: &Database,
    dialog: &mut dyn ExportDialog,
    sink: &mut dyn DownloadSink,
) -> CoreResult<ExportOutcome> {
    run_export_as_of(db, dialog, sink, Local::now().date_naive()).await
}

pub async fn run_export_as_of(
    db: &Database,
    dialog: &mut dyn ExportDialog,
    sink: &mut dyn DownloadSink,
    today: NaiveDate,
) -> CoreResult<ExportOutcome> {
    // All three selections resolve before anything is fetched.
    let Some(scope) = dialog.choose_scope() else {
        debug!("Export cancelled at scope selection");
        return Ok(ExportOutcome::Cancelled);
    };
    let Some(format) = dialog.choose_format(scope) else {
        debug!("Export cancelled at format selection");
        return Ok(ExportOutcome::Cancelled);
    };
    let date = match scope {
        ExportScope::Today => Some(today),
        ExportScope::Day => {
            let Some(raw) = dialog.choose_day() else {
                debug!("Export cancelled at date selection");
                return Ok(ExportOutcome::Cancelled);
            };
            Some(parse_day_key(raw.trim())?)
        }
        ExportScope::Week | ExportScope::Month => None,
    };

    let artifact = match scope {
        ExportScope::Today | ExportScope::Day => {
            build_day_artifact(db, format, date.expect("day scope has a date")).await?
        }
        ExportScope::Week => build_period_artifact(db, format, Period::Week, "本周学习报告", today).await?,
        ExportScope::Month => {
            build_period_artifact(db, format, Period::Month, "本月学习报告", today).await?
        }
    };

    info!(
        "Export ready: {} report for {}",
        artifact.format.as_str(),
        artifact.scope_label
    );
    sink.deliver(artifact);
    Ok(ExportOutcome::Delivered(format))
}

async fn build_day_artifact(
    db: &Database,
    format: ReportFormat,
    date: NaiveDate,
) -> CoreResult<ExportArtifact> {
    let key = day_key(date);

    let record = db
        .get_daily_record(&key)
        .await
        .map_err(CoreError::data_unavailable)?
        .unwrap_or_else(|| DailyRecord::empty(&key));
    let titles = db
        .get_video_titles()
        .await
        .map_err(CoreError::data_unavailable)?;
    let pomodoro_entries = db
        .get_pomodoro_entries(&key)
        .await
        .map_err(CoreError::data_unavailable)?;

    let metrics = DayMetrics::from(&record);
    let quality = calculate_quality_score(&metrics);
    let events = reconstruct_timeline(&record, &titles);
    let insights = analyze_patterns(&events, record.longest_session);
    let pomodoro = PomodoroSummary::from_entries(&pomodoro_entries);
    let suggestions = generate_suggestions(&quality, &metrics);

    let data = DayReportData {
        record: &record,
        quality: &quality,
        events: &events,
        insights: &insights,
        pomodoro: &pomodoro,
        suggestions: &suggestions,
    };

    let content = match format {
        ReportFormat::Markdown => markdown::day_report(&data),
        ReportFormat::Html => html::day_report(&data),
        ReportFormat::Csv => csv::export(std::slice::from_ref(&record)),
        ReportFormat::Json => json::export(std::slice::from_ref(&record), &titles)?,
    };

    Ok(ExportArtifact {
        format,
        scope_label: key,
        content,
    })
}

async fn build_period_artifact(
    db: &Database,
    format: ReportFormat,
    period: Period,
    title: &str,
    today: NaiveDate,
) -> CoreResult<ExportArtifact> {
    let days = fetch_daily_stats_as_of(db, period, today).await?;

    // Previous period total, for the trend note. Derived from the same
    // period length ending the day before this range starts.
    let range = resolve_period_range(period, today);
    let previous_total_secs = match range.start_date().checked_sub_days(Days::new(1)) {
        Some(previous_end) => {
            let previous = fetch_daily_stats_as_of(db, period, previous_end).await?;
            Some(previous.iter().map(|day| day.total_time).sum())
        }
        None => None,
    };

    let data = PeriodReportData {
        title,
        days: &days,
        previous_total_secs,
    };

    let content = match format {
        ReportFormat::Markdown => markdown::period_report(&data),
        ReportFormat::Html => html::period_report(&data),
        ReportFormat::Csv => csv::export(&days),
        ReportFormat::Json => {
            let titles = db
                .get_video_titles()
                .await
                .map_err(CoreError::data_unavailable)?;
            json::export(&days, &titles)?
        }
    };

    Ok(ExportArtifact {
        format,
        scope_label: format!("{}_{}", day_key(range.start_date()), day_key(range.end_date())),
        content,
    })
}
