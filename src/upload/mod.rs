//! Logbook upload client abstraction and response classification.

pub mod qrz;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::adif::AdifRecord;

/// Substring the logbook service includes in a successful insert response.
pub const ACCEPTED_MARKER: &str = "RESULT=OK";

/// HTTP status treated as a clean transport outcome.
pub const STATUS_OK: u16 = 200;

/// Raw outcome of one insert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl UploadResult {
    /// Wraps a status code and response body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response text as logged: the body, prefixed by the status code when it
    /// is not 200.
    pub fn status_text(&self) -> String {
        if self.status == STATUS_OK {
            self.body.clone()
        } else {
            format!("{}{}", self.status, self.body)
        }
    }

    /// True when [`Self::status_text`] contains [`ACCEPTED_MARKER`].
    pub fn is_accepted(&self) -> bool {
        self.status_text().contains(ACCEPTED_MARKER)
    }
}

/// Failure to complete the HTTP exchange at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request could not be sent or the response could not be read.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// Transport failure from a [`LogbookClient`] that does not use reqwest.
    #[error("transport error: {0}")]
    Message(String),
}

/// A remote logbook that accepts ADIF inserts one record at a time.
pub trait LogbookClient {
    /// Submits one record and returns the raw response.
    ///
    /// Rejections come back as `Ok` with a non-accepted [`UploadResult`];
    /// only transport failures are `Err`.
    fn insert(
        &self,
        record: &AdifRecord,
    ) -> impl Future<Output = Result<UploadResult, TransportError>>;
}
