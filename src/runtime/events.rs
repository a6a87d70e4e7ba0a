//! Progress events emitted by the upload loop.

use crate::types::RecordSeq;

use super::runner::UploadSummary;

/// Events emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// The run is about to upload `total` records.
    Started {
        /// Records in the run.
        total: usize,
    },
    /// Record `seq` is about to be sent.
    Uploading {
        /// One-based record position.
        seq: RecordSeq,
        /// Records in the run.
        total: usize,
        /// Counts for the records before `seq`.
        summary: UploadSummary,
    },
    /// One record received a response.
    Uploaded {
        /// One-based record position.
        seq: RecordSeq,
        /// Records in the run.
        total: usize,
        /// Whether the service accepted the record.
        accepted: bool,
        /// Counts after folding in this record.
        summary: UploadSummary,
    },
    /// Every record received a response.
    Finished {
        /// Final counts.
        summary: UploadSummary,
    },
    /// A transport failure on `seq` stopped the run.
    Aborted {
        /// Record whose upload failed.
        seq: RecordSeq,
        /// Counts for the records before `seq`.
        summary: UploadSummary,
    },
}
