use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    adif::AdifRecord,
    persist::{RunId, UploadAttempt, UploadSink},
    types::{RecordSeq, now_ms},
    upload::{LogbookClient, STATUS_OK, TransportError},
};

use super::events::UploadEvent;

/// Counts for the records processed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Records that received a response.
    pub total: usize,
    /// Records the service accepted.
    pub accepted: usize,
    /// Records the service did not accept.
    pub failed: usize,
}

impl UploadSummary {
    /// Folds one classified response into the counts.
    pub fn tally(self, accepted: bool) -> Self {
        Self {
            total: self.total + 1,
            accepted: self.accepted + usize::from(accepted),
            failed: self.failed + usize::from(!accepted),
        }
    }
}

/// Failure that stops a run before every record was sent.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The HTTP exchange for record `seq` did not complete.
    #[error("transport failure on record {seq} of {total}: {source}")]
    Transport {
        /// Record whose upload failed.
        seq: RecordSeq,
        /// Records in the run.
        total: usize,
        /// Counts for records `1..seq`; record `seq` is not included.
        partial: UploadSummary,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
}

impl RunError {
    /// Counts gathered before the failure.
    pub fn partial(&self) -> UploadSummary {
        match self {
            Self::Transport { partial, .. } => *partial,
        }
    }
}

struct Journal<'a> {
    sink: &'a mut dyn UploadSink,
    source: String,
    run: Option<RunId>,
}

impl Journal<'_> {
    fn begin(&mut self, total: usize) {
        match self.sink.begin_run(&self.source, total) {
            Ok(run) => self.run = Some(run),
            Err(err) => warn!(error = %err, "journal disabled: could not open run"),
        }
    }

    fn attempt(&mut self, attempt: &UploadAttempt) {
        let Some(run) = self.run else { return };
        if let Err(err) = self.sink.record_attempt(run, attempt) {
            warn!(seq = attempt.seq, error = %err, "journal write failed");
        }
    }

    fn finish(&mut self, summary: &UploadSummary) {
        let Some(run) = self.run else { return };
        if let Err(err) = self.sink.finish_run(run, summary) {
            warn!(error = %err, "journal finish failed");
        }
    }
}

/// One pass over a list of encoded records.
pub struct UploadRun<'a, C> {
    client: &'a C,
    journal: Option<Journal<'a>>,
}

impl<'a, C: LogbookClient> UploadRun<'a, C> {
    /// Starts a run against `client`.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            journal: None,
        }
    }

    /// Journals every attempt to `sink` under a run named after `source`.
    /// Journal failures are logged and never stop the run.
    pub fn with_journal(
        mut self,
        sink: &'a mut dyn UploadSink,
        source: impl Into<String>,
    ) -> Self {
        self.journal = Some(Journal {
            sink,
            source: source.into(),
            run: None,
        });
        self
    }

    /// Uploads `records` strictly in order, one request at a time.
    ///
    /// Rejected records are counted as failed and the loop continues. A
    /// transport error stops the loop and is returned with the counts
    /// gathered before it.
    pub async fn run<F>(
        mut self,
        records: &[AdifRecord],
        mut on_event: F,
    ) -> Result<UploadSummary, RunError>
    where
        F: FnMut(&UploadEvent),
    {
        let total = records.len();
        if let Some(journal) = self.journal.as_mut() {
            journal.begin(total);
        }
        on_event(&UploadEvent::Started { total });

        let mut summary = UploadSummary::default();
        for (idx, record) in records.iter().enumerate() {
            let seq = idx + 1;
            info!(seq, total, accepted = summary.accepted, "uploading");
            info!(adif = %record, "record");
            on_event(&UploadEvent::Uploading {
                seq,
                total,
                summary,
            });

            let result = match self.client.insert(record).await {
                Ok(result) => result,
                Err(source) => {
                    error!(seq, total, error = %source, "transport failure, aborting run");
                    on_event(&UploadEvent::Aborted { seq, summary });
                    return Err(RunError::Transport {
                        seq,
                        total,
                        partial: summary,
                        source,
                    });
                }
            };

            if result.status != STATUS_OK {
                warn!(seq, status = result.status, body = %result.body, "unexpected http status");
            }
            let accepted = result.is_accepted();
            info!(seq, accepted, response = %result.status_text(), "response");

            summary = summary.tally(accepted);
            if let Some(journal) = self.journal.as_mut() {
                journal.attempt(&UploadAttempt::new(seq, now_ms(), record.clone(), result));
            }
            on_event(&UploadEvent::Uploaded {
                seq,
                total,
                accepted,
                summary,
            });
        }

        if let Some(journal) = self.journal.as_mut() {
            journal.finish(&summary);
        }
        info!(
            total = summary.total,
            accepted = summary.accepted,
            failed = summary.failed,
            "run finished"
        );
        on_event(&UploadEvent::Finished { summary });
        Ok(summary)
    }
}

/// Uploads `records` without a journal or event observer.
pub async fn upload_all<C: LogbookClient>(
    client: &C,
    records: &[AdifRecord],
) -> Result<UploadSummary, RunError> {
    UploadRun::new(client).run(records, |_| {}).await
}
