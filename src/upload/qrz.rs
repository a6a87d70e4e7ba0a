//! QRZ.com Logbook API client.

use std::fmt;

use tracing::debug;

use crate::{adif::AdifRecord, config::ApiKey};

use super::{LogbookClient, TransportError, UploadResult};

/// Production Logbook API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://logbook.qrz.com/api";

/// Action requested for every upload.
pub const INSERT_ACTION: &str = "INSERT";

/// HTTP client that posts `INSERT` actions to a QRZ-compatible endpoint.
///
/// No request timeout is configured; a stalled server stalls the caller.
pub struct QrzLogbookClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
}

impl QrzLogbookClient {
    /// Creates a client for the production endpoint.
    pub fn new(api_key: ApiKey) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Creates a client for an arbitrary endpoint URL.
    pub fn with_endpoint(api_key: ApiKey, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// Endpoint URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for QrzLogbookClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrzLogbookClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .finish()
    }
}

impl LogbookClient for QrzLogbookClient {
    async fn insert(&self, record: &AdifRecord) -> Result<UploadResult, TransportError> {
        let form = [
            ("KEY", self.api_key.expose()),
            ("ACTION", INSERT_ACTION),
            ("ADIF", record.as_str()),
        ];

        let response = self.http.post(&self.endpoint).form(&form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, body = %body, "logbook response");

        Ok(UploadResult::new(status, body))
    }
}
