//! SQLite-backed store for study data.
//!
//! All SQL runs on a dedicated worker thread; async callers are bridged with
//! a oneshot channel so a slow disk never blocks the runtime. The analytics
//! pipeline only reads; the write side exists for the capture subsystem that
//! owns the data (and for seeding tests).

use std::{
    collections::{BTreeMap, HashMap},
    convert::TryFrom,
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::oneshot;

mod migrations;

use crate::models::{
    DailyRecord, HistoryEntry, PomodoroEntry, PomodoroKind, TimerMode, VideoWatchSegment,
};
use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

fn to_u64(value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("value {value} is negative"))
}

fn to_u32(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("value {value} out of range for count"))
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

fn kind_from_str(value: &str) -> Result<PomodoroKind> {
    match value {
        "work" => Ok(PomodoroKind::Work),
        "break" => Ok(PomodoroKind::Break),
        _ => Err(anyhow!("unknown pomodoro kind '{value}'")),
    }
}

fn mode_from_str(value: &str) -> Result<TimerMode> {
    match value {
        "countdown" => Ok(TimerMode::Countdown),
        "countup" => Ok(TimerMode::Countup),
        _ => Err(anyhow!("unknown timer mode '{value}'")),
    }
}

#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Option<Arc<PathBuf>>,
}

impl Database {
    /// Open (and migrate) the store at `db_path`.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let path_for_thread = db_path.clone();
        let db = Self::spawn(move || Connection::open(&path_for_thread))?;
        info!("Database initialized at {}", db_path.display());

        Ok(Self {
            db_path: Some(Arc::new(db_path)),
            ..db
        })
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::spawn(Connection::open_in_memory)
    }

    fn spawn<F>(open: F) -> Result<Self>
    where
        F: FnOnce() -> rusqlite::Result<Connection> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("studytrace-db".into())
            .spawn(move || {
                let mut conn = match open() {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(
                            Err(anyhow::Error::new(err).context("failed to open SQLite database")),
                        );
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }
                if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
                    error!("Failed to enable foreign keys: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => task(&mut conn),
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref().map(PathBuf::as_path)
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }

    // ---- read contract (consumed by the analytics pipeline) ----

    pub async fn get_daily_record(&self, date: &str) -> Result<Option<DailyRecord>> {
        let date = date.to_string();
        self.execute(move |conn| {
            let record = conn
                .query_row(
                    "SELECT date, total_time, effective_time, video_count, longest_session,
                            pause_count, exit_fullscreen_count, tab_switch_count
                     FROM daily_records WHERE date = ?1",
                    params![date],
                    record_from_row,
                )
                .optional()
                .with_context(|| "failed to query daily record")?;

            let Some(mut record) = record.transpose()? else {
                return Ok(None);
            };
            record.videos = load_segments(conn, &record.date, &record.date)?
                .remove(&record.date)
                .unwrap_or_default();
            Ok(Some(record))
        })
        .await
    }

    /// Records with `start <= date <= end`, ascending by date. Dates with no
    /// stored record are absent here; the aggregator zero-fills them.
    pub async fn get_daily_records_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<DailyRecord>> {
        let start = start.to_string();
        let end = end.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, total_time, effective_time, video_count, longest_session,
                        pause_count, exit_fullscreen_count, tab_switch_count
                 FROM daily_records
                 WHERE date >= ?1 AND date <= ?2
                 ORDER BY date ASC",
            )?;

            let mut rows = stmt.query(params![start, end])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(record_from_row(row)??);
            }

            let mut segments = load_segments(conn, &start, &end)?;
            for record in &mut records {
                record.videos = segments.remove(&record.date).unwrap_or_default();
            }

            Ok(records)
        })
        .await
    }

    /// Most recent watch segments across all dates, newest first. Segments
    /// with no recorded start are excluded (they cannot be ordered).
    pub async fn get_recent_segments(&self, limit: u32, offset: u32) -> Result<Vec<HistoryEntry>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.date, s.video_id, COALESCE(s.title, t.title), s.watched_seconds,
                        s.start_timestamp, s.playback_rate
                 FROM watch_segments s
                 LEFT JOIN video_titles t ON t.video_id = s.video_id
                 WHERE s.start_timestamp IS NOT NULL
                 ORDER BY s.start_timestamp DESC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let mut rows = stmt.query(params![limit, offset])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(HistoryEntry {
                    date: row.get(0)?,
                    video_id: row.get(1)?,
                    title: row.get(2)?,
                    watched_seconds: to_u64(row.get(3)?)?,
                    start_timestamp: parse_datetime(&row.get::<_, String>(4)?)?,
                    playback_rate: row.get(5)?,
                });
            }

            Ok(entries)
        })
        .await
    }

    pub async fn get_pomodoro_entries(&self, date: &str) -> Result<Vec<PomodoroEntry>> {
        let date = date.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT kind, duration, actual_duration, pomodoro_count, mode
                 FROM pomodoro_entries
                 WHERE date = ?1
                 ORDER BY seq ASC",
            )?;

            let mut rows = stmt.query(params![date])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(PomodoroEntry {
                    kind: kind_from_str(&row.get::<_, String>(0)?)?,
                    duration: to_u64(row.get(1)?)?,
                    actual_duration: to_u64(row.get(2)?)?,
                    pomodoro_count: row.get(3)?,
                    mode: mode_from_str(&row.get::<_, String>(4)?)?,
                });
            }

            Ok(entries)
        })
        .await
    }

    pub async fn get_video_titles(&self) -> Result<HashMap<String, String>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare("SELECT video_id, title FROM video_titles")?;
            let mut rows = stmt.query([])?;
            let mut titles = HashMap::new();
            while let Some(row) = rows.next()? {
                titles.insert(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
            }
            Ok(titles)
        })
        .await
    }

    // ---- write side (owned by the capture subsystem) ----

    pub async fn upsert_daily_record(&self, record: &DailyRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO daily_records
                     (date, total_time, effective_time, video_count, longest_session,
                      pause_count, exit_fullscreen_count, tab_switch_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(date) DO UPDATE SET
                     total_time = excluded.total_time,
                     effective_time = excluded.effective_time,
                     video_count = excluded.video_count,
                     longest_session = excluded.longest_session,
                     pause_count = excluded.pause_count,
                     exit_fullscreen_count = excluded.exit_fullscreen_count,
                     tab_switch_count = excluded.tab_switch_count",
                params![
                    record.date,
                    to_i64(record.total_time)?,
                    to_i64(record.effective_time)?,
                    record.video_count,
                    to_i64(record.longest_session)?,
                    record.pause_count,
                    record.exit_fullscreen_count,
                    record.tab_switch_count,
                ],
            )
            .with_context(|| "failed to upsert daily record")?;

            tx.execute(
                "DELETE FROM watch_segments WHERE date = ?1",
                params![record.date],
            )?;
            for segment in record.videos.values() {
                tx.execute(
                    "INSERT INTO watch_segments
                         (date, video_id, title, watched_seconds, start_timestamp,
                          pause_count, exit_fullscreen_count, tab_switch_count, playback_rate)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        record.date,
                        segment.video_id,
                        segment.title,
                        to_i64(segment.watched_seconds)?,
                        segment.start_timestamp.map(|dt| dt.to_rfc3339()),
                        segment.pause_count,
                        segment.exit_fullscreen_count,
                        segment.tab_switch_count,
                        segment.playback_rate,
                    ],
                )
                .with_context(|| "failed to insert watch segment")?;
            }

            tx.commit().context("failed to commit daily record")
        })
        .await
    }

    pub async fn append_pomodoro_entry(&self, date: &str, entry: &PomodoroEntry) -> Result<()> {
        let date = date.to_string();
        let entry = entry.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO pomodoro_entries
                     (date, seq, kind, duration, actual_duration, pomodoro_count, mode)
                 SELECT ?1, COALESCE(MAX(seq), 0) + 1, ?2, ?3, ?4, ?5, ?6
                 FROM pomodoro_entries WHERE date = ?1",
                params![
                    date,
                    entry.kind.as_str(),
                    to_i64(entry.duration)?,
                    to_i64(entry.actual_duration)?,
                    entry.pomodoro_count,
                    entry.mode.as_str(),
                ],
            )
            .with_context(|| "failed to append pomodoro entry")?;
            Ok(())
        })
        .await
    }

    pub async fn upsert_video_title(&self, video_id: &str, title: &str) -> Result<()> {
        let video_id = video_id.to_string();
        let title = title.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO video_titles (video_id, title) VALUES (?1, ?2)
                 ON CONFLICT(video_id) DO UPDATE SET title = excluded.title",
                params![video_id, title],
            )
            .with_context(|| "failed to upsert video title")?;
            Ok(())
        })
        .await
    }
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<DailyRecord>> {
    let build = || -> Result<DailyRecord> {
        Ok(DailyRecord {
            date: row.get(0)?,
            total_time: to_u64(row.get(1)?)?,
            effective_time: to_u64(row.get(2)?)?,
            video_count: to_u32(row.get(3)?)?,
            longest_session: to_u64(row.get(4)?)?,
            pause_count: to_u32(row.get(5)?)?,
            exit_fullscreen_count: to_u32(row.get(6)?)?,
            tab_switch_count: to_u32(row.get(7)?)?,
            videos: BTreeMap::new(),
        })
    };
    Ok(build())
}

fn load_segments(
    conn: &Connection,
    start: &str,
    end: &str,
) -> Result<HashMap<String, BTreeMap<String, VideoWatchSegment>>> {
    let mut stmt = conn.prepare(
        "SELECT date, video_id, title, watched_seconds, start_timestamp,
                pause_count, exit_fullscreen_count, tab_switch_count, playback_rate
         FROM watch_segments
         WHERE date >= ?1 AND date <= ?2",
    )?;

    let mut rows = stmt.query(params![start, end])?;
    let mut by_date: HashMap<String, BTreeMap<String, VideoWatchSegment>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let date: String = row.get(0)?;
        let segment = VideoWatchSegment {
            video_id: row.get(1)?,
            title: row.get(2)?,
            watched_seconds: to_u64(row.get(3)?)?,
            start_timestamp: row
                .get::<_, Option<String>>(4)?
                .map(|s| parse_datetime(&s))
                .transpose()?,
            pause_count: to_u32(row.get(5)?)?,
            exit_fullscreen_count: to_u32(row.get(6)?)?,
            tab_switch_count: to_u32(row.get(7)?)?,
            playback_rate: row.get(8)?,
        };
        by_date
            .entry(date)
            .or_default()
            .insert(segment.video_id.clone(), segment);
    }

    Ok(by_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn segment(id: &str, start_hour: u32, watched: u64) -> VideoWatchSegment {
        VideoWatchSegment {
            video_id: id.to_string(),
            title: None,
            watched_seconds: watched,
            start_timestamp: Some(
                Utc.with_ymd_and_hms(2025, 3, 7, start_hour, 0, 0).unwrap(),
            ),
            pause_count: 1,
            exit_fullscreen_count: 0,
            tab_switch_count: 2,
            playback_rate: 1.25,
        }
    }

    fn record_with(date: &str, segments: Vec<VideoWatchSegment>) -> DailyRecord {
        let mut record = DailyRecord::empty(date);
        record.total_time = segments.iter().map(|s| s.watched_seconds).sum();
        record.effective_time = record.total_time;
        record.video_count = segments.len() as u32;
        record.videos = segments
            .into_iter()
            .map(|s| (s.video_id.clone(), s))
            .collect();
        record
    }

    #[tokio::test]
    async fn upsert_and_read_back_daily_record() {
        let db = Database::in_memory().unwrap();
        let record = record_with("2025-03-07", vec![segment("BV1x", 9, 1200)]);
        db.upsert_daily_record(&record).await.unwrap();

        let loaded = db.get_daily_record("2025-03-07").await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(db.get_daily_record("2025-03-08").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn range_query_returns_ascending_dates() {
        let db = Database::in_memory().unwrap();
        for date in ["2025-03-09", "2025-03-07", "2025-03-08"] {
            db.upsert_daily_record(&record_with(date, vec![segment("BV1x", 9, 60)]))
                .await
                .unwrap();
        }

        let records = db
            .get_daily_records_between("2025-03-07", "2025-03-08")
            .await
            .unwrap();
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-07", "2025-03-08"]);
    }

    #[tokio::test]
    async fn recent_segments_are_paginated_newest_first() {
        let db = Database::in_memory().unwrap();
        db.upsert_daily_record(&record_with(
            "2025-03-07",
            vec![segment("a", 8, 60), segment("b", 10, 60), segment("c", 12, 60)],
        ))
        .await
        .unwrap();
        db.upsert_video_title("a", "入门课").await.unwrap();

        let page = db.get_recent_segments(2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].video_id, "c");
        assert_eq!(page[1].video_id, "b");

        let rest = db.get_recent_segments(2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].video_id, "a");
        assert_eq!(rest[0].title.as_deref(), Some("入门课"));
    }

    #[tokio::test]
    async fn pomodoro_entries_keep_insertion_order() {
        let db = Database::in_memory().unwrap();
        let work = PomodoroEntry {
            kind: PomodoroKind::Work,
            duration: 1500,
            actual_duration: 1500,
            pomodoro_count: None,
            mode: TimerMode::Countdown,
        };
        let rest = PomodoroEntry {
            kind: PomodoroKind::Break,
            duration: 300,
            actual_duration: 310,
            pomodoro_count: None,
            mode: TimerMode::Countup,
        };

        db.append_pomodoro_entry("2025-03-07", &work).await.unwrap();
        db.append_pomodoro_entry("2025-03-07", &rest).await.unwrap();

        let entries = db.get_pomodoro_entries("2025-03-07").await.unwrap();
        assert_eq!(entries, vec![work, rest]);
        assert!(db.get_pomodoro_entries("2025-03-08").await.unwrap().is_empty());
    }
}
