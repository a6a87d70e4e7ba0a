//! SQLite-backed append-only upload journal.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::{runtime::runner::UploadSummary, types::now_ms};

use super::{
    ATTEMPT_FORMAT_VERSION, PersistError, PersistResult, RunId, StoredAttemptEnvelope,
    UploadAttempt, UploadSink,
};

/// Journaled run header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRow {
    /// Run identifier.
    pub id: RunId,
    /// Input file the run read from.
    pub source: String,
    /// Records the run expected to upload.
    pub total: usize,
    /// Final counts, present once the run finished.
    pub summary: Option<UploadSummary>,
}

/// SQLite implementation of [`crate::persist::UploadSink`].
pub struct SqliteUploadJournal {
    conn: Connection,
}

impl SqliteUploadJournal {
    /// Opens or creates a journal at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Loads all attempts of `run` in sequence order.
    pub fn load_attempts(&self, run: RunId) -> PersistResult<Vec<UploadAttempt>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM attempts WHERE run_id = ?1 ORDER BY seq ASC")?;

        let rows = stmt.query_map(params![run], |row| {
            let payload: Vec<u8> = row.get(0)?;
            decode_attempt_payload(&payload).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(
                    payload.len(),
                    rusqlite::types::Type::Blob,
                    Box::new(std::io::Error::other(err)),
                )
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Returns the most recently started run, if any.
    pub fn latest_run(&self) -> PersistResult<Option<RunRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, source, total, accepted, failed FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let id: RunId = row.get(0)?;
                    let source: String = row.get(1)?;
                    let total: i64 = row.get(2)?;
                    let accepted: Option<i64> = row.get(3)?;
                    let failed: Option<i64> = row.get(4)?;
                    Ok((id, source, total, accepted, failed))
                },
            )
            .optional()?;

        Ok(row.map(|(id, source, total, accepted, failed)| RunRow {
            id,
            source,
            total: total as usize,
            summary: accepted.zip(failed).map(|(accepted, failed)| UploadSummary {
                total: (accepted + failed) as usize,
                accepted: accepted as usize,
                failed: failed as usize,
            }),
        }))
    }

    /// Counts accepted attempts journaled for `run`.
    pub fn accepted_count(&self, run: RunId) -> PersistResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM attempts WHERE run_id = ?1 AND accepted = 1",
            params![run],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl UploadSink for SqliteUploadJournal {
    fn begin_run(&mut self, source: &str, total: usize) -> PersistResult<RunId> {
        self.conn.execute(
            "INSERT INTO runs(started_ms, source, total) VALUES (?1, ?2, ?3)",
            params![now_ms() as i64, source, total as i64],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn record_attempt(&mut self, run: RunId, attempt: &UploadAttempt) -> PersistResult<()> {
        let payload = serde_json::to_vec(&StoredAttemptEnvelope::new(attempt.clone()))?;
        self.conn.execute(
            "INSERT INTO attempts(run_id, seq, ts_ms, status, accepted, payload) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run,
                attempt.seq as i64,
                attempt.ts_ms as i64,
                attempt.result.status,
                attempt.accepted,
                payload,
            ],
        )?;
        Ok(())
    }

    fn finish_run(&mut self, run: RunId, summary: &UploadSummary) -> PersistResult<()> {
        let updated = self.conn.execute(
            "UPDATE runs SET finished_ms = ?1, accepted = ?2, failed = ?3 WHERE id = ?4",
            params![
                now_ms() as i64,
                summary.accepted as i64,
                summary.failed as i64,
                run
            ],
        )?;
        if updated == 0 {
            return Err(PersistError::Message(format!("unknown run id {run}")));
        }
        Ok(())
    }
}

fn decode_attempt_payload(payload: &[u8]) -> Result<UploadAttempt, String> {
    let envelope = serde_json::from_slice::<StoredAttemptEnvelope>(payload)
        .map_err(|e| format!("attempt payload decode failed: {e}"))?;
    if envelope.format_version != ATTEMPT_FORMAT_VERSION {
        return Err(format!(
            "unsupported attempt format version: {}",
            envelope.format_version
        ));
    }
    Ok(envelope.attempt)
}
