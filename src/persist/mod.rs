//! Upload journal abstraction and SQLite implementation.

pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::{
    adif::AdifRecord,
    runtime::runner::UploadSummary,
    types::RecordSeq,
    upload::UploadResult,
};

/// Version number for serialized [`StoredAttemptEnvelope`] payloads.
pub const ATTEMPT_FORMAT_VERSION: u16 = 1;

/// Identifier of one journaled run.
pub type RunId = i64;

/// Journal read or write failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Payload encode or decode error.
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    /// Any other journal failure.
    #[error("{0}")]
    Message(String),
}

/// Convenience alias for journal results.
pub type PersistResult<T> = Result<T, PersistError>;

/// One upload attempt as written to the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAttempt {
    /// One-based position in the run.
    pub seq: RecordSeq,
    /// Attempt timestamp in milliseconds since epoch.
    pub ts_ms: u64,
    /// Record that was sent.
    pub adif: AdifRecord,
    /// Raw service response.
    pub result: UploadResult,
    /// Classification of `result`.
    pub accepted: bool,
}

impl UploadAttempt {
    /// Builds an attempt record, classifying `result`.
    pub fn new(seq: RecordSeq, ts_ms: u64, adif: AdifRecord, result: UploadResult) -> Self {
        let accepted = result.is_accepted();
        Self {
            seq,
            ts_ms,
            adif,
            result,
            accepted,
        }
    }
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttemptEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped attempt.
    pub attempt: UploadAttempt,
}

impl StoredAttemptEnvelope {
    /// Constructs an envelope using [`ATTEMPT_FORMAT_VERSION`].
    pub fn new(attempt: UploadAttempt) -> Self {
        Self {
            format_version: ATTEMPT_FORMAT_VERSION,
            attempt,
        }
    }
}

/// Append-only destination for upload attempts.
pub trait UploadSink {
    /// Opens a run for `source` expecting `total` records.
    fn begin_run(&mut self, source: &str, total: usize) -> PersistResult<RunId>;
    /// Appends one attempt to `run`.
    fn record_attempt(&mut self, run: RunId, attempt: &UploadAttempt) -> PersistResult<()>;
    /// Closes `run` with its final counts.
    fn finish_run(&mut self, _run: RunId, _summary: &UploadSummary) -> PersistResult<()> {
        Ok(())
    }
}
