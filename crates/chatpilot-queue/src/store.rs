//! SQLite persistence for jobs.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::QueueError;
use crate::job::{Job, JobStatus, NewJob};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Fallback mean processing time when no job has completed yet.
const DEFAULT_AVG_SECONDS: f64 = 60.0;

/// How many recent completions feed the processing-time average.
const AVG_SAMPLE_SIZE: u32 = 20;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    provider TEXT NOT NULL,
    prompt TEXT NOT NULL,
    system_prompt TEXT,
    attachment TEXT,
    output_format TEXT NOT NULL DEFAULT 'text',
    status TEXT NOT NULL DEFAULT 'pending',
    result TEXT,
    error TEXT,
    attempts INTEGER NOT NULL DEFAULT 0,
    max_attempts INTEGER NOT NULL DEFAULT 3,
    created_at TEXT NOT NULL,
    started_at TEXT,
    finished_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at);
"#;

const JOB_COLUMNS: &str = "id, provider, prompt, system_prompt, attachment, output_format, \
     status, result, error, attempts, max_attempts, created_at, started_at, finished_at";

/// Async job store over a SQLite database.
///
/// Claiming is a guarded UPDATE inside a transaction, so a job goes to at
/// most one worker even with several workers polling the same file.
#[derive(Clone)]
pub struct JobStore {
    conn: Connection,
}

impl JobStore {
    /// Open (and initialize) a file-backed store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, QueueError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())
            .await
            .map_err(|e| QueueError::Database(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open an in-memory store, used by tests.
    pub async fn open_in_memory() -> Result<Self, QueueError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| QueueError::Database(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, QueueError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    /// Insert a new pending job.
    pub async fn enqueue(&self, new: NewJob) -> Result<Job, QueueError> {
        let job = Job::from_new(new);
        let row = job.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO jobs (id, provider, prompt, system_prompt, attachment, \
                     output_format, status, attempts, max_attempts, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        row.id,
                        row.provider,
                        row.prompt,
                        row.system_prompt,
                        row.attachment.as_ref().map(|p| p.to_string_lossy().into_owned()),
                        row.output.as_str(),
                        row.status.as_str(),
                        row.attempts,
                        row.max_attempts,
                        row.created_at.to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await?;

        debug!(id = %job.id, provider = %job.provider, "Enqueued job");
        Ok(job)
    }

    /// Claim the oldest pending job, marking it running.
    ///
    /// FIFO by creation time; the claim increments `attempts` and stamps
    /// `started_at`.
    pub async fn claim_next(&self) -> Result<Option<Job>, QueueError> {
        let now = Utc::now();
        let claimed = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let job = {
                    let mut stmt = tx.prepare(&format!(
                        "SELECT {JOB_COLUMNS} FROM jobs WHERE status = 'pending' \
                         ORDER BY created_at ASC, id ASC LIMIT 1"
                    ))?;
                    let mut rows = stmt.query_map([], row_to_job)?;
                    rows.next().transpose()?
                };

                let Some(mut job) = job else {
                    return Ok(None);
                };

                let updated = tx.execute(
                    "UPDATE jobs SET status = 'running', started_at = ?1, \
                     attempts = attempts + 1 WHERE id = ?2 AND status = 'pending'",
                    params![now.to_rfc3339(), job.id],
                )?;
                tx.commit()?;

                if updated == 0 {
                    // Another worker got there between the SELECT and UPDATE.
                    return Ok(None);
                }

                job.status = JobStatus::Running;
                job.started_at = Some(now);
                job.attempts += 1;
                Ok(Some(job))
            })
            .await?;

        if let Some(job) = &claimed {
            debug!(id = %job.id, provider = %job.provider, attempt = job.attempts, "Claimed job");
        }
        Ok(claimed)
    }

    /// Record a successful run.
    pub async fn complete(&self, id: &str, result: &str) -> Result<(), QueueError> {
        let id_owned = id.to_string();
        let result = result.to_string();
        let now = Utc::now().to_rfc3339();

        let updated = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE jobs SET status = 'completed', result = ?1, error = NULL, \
                     finished_at = ?2 WHERE id = ?3",
                    params![result, now, id_owned],
                )?;
                Ok(n)
            })
            .await?;

        if updated == 0 {
            return Err(QueueError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Record a failed run. Jobs with attempts left go back to `pending`;
    /// exhausted jobs become terminal `failed`.
    pub async fn fail(&self, id: &str, error: &str) -> Result<JobStatus, QueueError> {
        let id_owned = id.to_string();
        let error = error.to_string();
        let now = Utc::now().to_rfc3339();

        let status = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let counters: Option<(u32, u32)> = {
                    let mut stmt = tx.prepare(
                        "SELECT attempts, max_attempts FROM jobs WHERE id = ?1",
                    )?;
                    let mut rows =
                        stmt.query_map([&id_owned], |row| Ok((row.get(0)?, row.get(1)?)))?;
                    rows.next().transpose()?
                };

                let Some((attempts, max_attempts)) = counters else {
                    return Ok(None);
                };

                let status = if attempts < max_attempts {
                    tx.execute(
                        "UPDATE jobs SET status = 'pending', error = ?1 WHERE id = ?2",
                        params![error, id_owned],
                    )?;
                    JobStatus::Pending
                } else {
                    tx.execute(
                        "UPDATE jobs SET status = 'failed', error = ?1, finished_at = ?2 \
                         WHERE id = ?3",
                        params![error, now, id_owned],
                    )?;
                    JobStatus::Failed
                };

                tx.commit()?;
                Ok(Some(status))
            })
            .await?;

        status.ok_or_else(|| QueueError::NotFound(id.to_string()))
    }

    /// Load a job by id.
    pub async fn get(&self, id: &str) -> Result<Option<Job>, QueueError> {
        let id = id.to_string();
        let job = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"
                ))?;
                let mut rows = stmt.query_map([&id], row_to_job)?;
                Ok(rows.next().transpose()?)
            })
            .await?;
        Ok(job)
    }

    /// Recent jobs, newest first, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<JobStatus>,
        limit: u32,
    ) -> Result<Vec<Job>, QueueError> {
        let jobs = self
            .conn
            .call(move |conn| {
                let jobs = match status {
                    Some(status) => {
                        let mut stmt = conn.prepare(&format!(
                            "SELECT {JOB_COLUMNS} FROM jobs WHERE status = ?1 \
                             ORDER BY created_at DESC LIMIT ?2"
                        ))?;
                        let rows = stmt.query_map(params![status.as_str(), limit], row_to_job)?;
                        rows.collect::<Result<Vec<_>, _>>()?
                    }
                    None => {
                        let mut stmt = conn.prepare(&format!(
                            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC LIMIT ?1"
                        ))?;
                        let rows = stmt.query_map(params![limit], row_to_job)?;
                        rows.collect::<Result<Vec<_>, _>>()?
                    }
                };
                Ok(jobs)
            })
            .await?;
        Ok(jobs)
    }

    /// Job counts per status.
    pub async fn counts(&self) -> Result<HashMap<JobStatus, u64>, QueueError> {
        let counts = self
            .conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT status, COUNT(*) FROM jobs GROUP BY status")?;
                let rows = stmt.query_map([], |row| {
                    let status: String = row.get(0)?;
                    let count: u64 = row.get(1)?;
                    Ok((status, count))
                })?;

                let mut counts = HashMap::new();
                for row in rows {
                    let (status, count) = row?;
                    if let Some(status) = JobStatus::parse(&status) {
                        counts.insert(status, count);
                    }
                }
                Ok(counts)
            })
            .await?;
        Ok(counts)
    }

    /// 1-based rank of a pending job among pending jobs, oldest first.
    ///
    /// `None` for jobs that are no longer pending.
    pub async fn queue_position(&self, id: &str) -> Result<Option<u64>, QueueError> {
        let job = self
            .get(id)
            .await?
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;
        if job.status != JobStatus::Pending {
            return Ok(None);
        }

        let created = job.created_at.to_rfc3339();
        let id = job.id;
        let position = self
            .conn
            .call(move |conn| {
                let position: u64 = conn.query_row(
                    "SELECT COUNT(*) FROM jobs WHERE status = 'pending' \
                     AND (created_at < ?1 OR (created_at = ?1 AND id <= ?2))",
                    params![created, id],
                    |row| row.get(0),
                )?;
                Ok(position)
            })
            .await?;
        Ok(Some(position))
    }

    /// Mean wall time of recent completed jobs, in seconds.
    pub async fn average_processing_seconds(&self) -> Result<f64, QueueError> {
        let avg = self
            .conn
            .call(|conn| {
                let avg: Option<f64> = conn.query_row(
                    "SELECT AVG(seconds) FROM ( \
                         SELECT (julianday(finished_at) - julianday(started_at)) * 86400.0 \
                         AS seconds FROM jobs \
                         WHERE status = 'completed' \
                         AND started_at IS NOT NULL AND finished_at IS NOT NULL \
                         ORDER BY finished_at DESC LIMIT ?1)",
                    params![AVG_SAMPLE_SIZE],
                    |row| row.get(0),
                )?;
                Ok(avg)
            })
            .await?;
        Ok(avg.unwrap_or(DEFAULT_AVG_SECONDS))
    }

    /// Estimated seconds until a pending job starts: jobs ahead of it (plus
    /// any currently running) times the recent average processing time.
    ///
    /// `None` for jobs that are no longer pending.
    pub async fn estimated_start_seconds(&self, id: &str) -> Result<Option<f64>, QueueError> {
        let Some(position) = self.queue_position(id).await? else {
            return Ok(None);
        };
        let counts = self.counts().await?;
        let running = counts.get(&JobStatus::Running).copied().unwrap_or(0);
        let average = self.average_processing_seconds().await?;
        Ok(Some((position - 1 + running) as f64 * average))
    }

    /// Delete terminal jobs older than the retention window. Returns how
    /// many were removed.
    pub async fn cleanup(&self, retain_days: u32) -> Result<u64, QueueError> {
        let cutoff = (Utc::now() - Duration::days(retain_days as i64)).to_rfc3339();
        let deleted = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    "DELETE FROM jobs WHERE status IN ('completed', 'failed') \
                     AND finished_at < ?1",
                    params![cutoff],
                )?;
                Ok(n as u64)
            })
            .await?;

        if deleted > 0 {
            debug!(deleted, "Removed old terminal jobs");
        }
        Ok(deleted)
    }
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    use chatpilot_flow::OutputFormat;

    let output_str: String = row.get(5)?;
    let status_str: String = row.get(6)?;
    let attachment: Option<String> = row.get(4)?;
    let created_str: String = row.get(11)?;
    let started_str: Option<String> = row.get(12)?;
    let finished_str: Option<String> = row.get(13)?;

    let status = JobStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            6,
            rusqlite::types::Type::Text,
            Box::new(QueueError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(Job {
        id: row.get(0)?,
        provider: row.get(1)?,
        prompt: row.get(2)?,
        system_prompt: row.get(3)?,
        attachment: attachment.map(Into::into),
        output: OutputFormat::parse(&output_str).unwrap_or_default(),
        status,
        result: row.get(7)?,
        error: row.get(8)?,
        attempts: row.get(9)?,
        max_attempts: row.get(10)?,
        created_at: parse_timestamp(&created_str),
        started_at: started_str.as_deref().map(parse_timestamp),
        finished_at: finished_str.as_deref().map(parse_timestamp),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
