//! HTTP client for the log ingestion API.
//!
//! # Responsibilities
//! - Build the ingestion URL (`tag`, `hostname`, `now` query parameters)
//! - POST one JSON batch with the `apikey` header
//! - Map transport failures and non-2xx statuses to [`IngestError`]
//!
//! # Design Decisions
//! - One attempt per batch, no retries
//! - The response body is never read
//! - The `reqwest::Client` is shared so connections are pooled across requests

use std::future::Future;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::IngestionSettings;
use crate::ingest::batch::IngestBatch;

/// Content type required by the ingestion API.
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Header carrying the ingestion key.
pub const API_KEY_HEADER: &str = "apikey";

/// Errors that can occur while delivering a batch.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The configured endpoint is not a URL.
    #[error("invalid ingestion endpoint '{endpoint}': {source}")]
    Url {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The ingestion key cannot be sent as a header value.
    #[error("invalid api key header: {0}")]
    ApiKey(#[from] reqwest::header::InvalidHeaderValue),

    /// The batch could not be serialized.
    #[error("failed to encode batch: {0}")]
    Encode(#[from] serde_json::Error),

    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("ingestion endpoint returned {0}")]
    Status(StatusCode),
}

/// Destination for flushed batches.
pub trait LogSink: Send + Sync {
    /// Deliver one batch built at `now_ms` (Unix milliseconds). Called at most
    /// once per request logger.
    fn send(
        &self,
        batch: &IngestBatch,
        now_ms: u64,
    ) -> impl Future<Output = Result<(), IngestError>> + Send;
}

/// Ingestion API client.
#[derive(Debug, Clone)]
pub struct IngestClient {
    client: reqwest::Client,
    settings: IngestionSettings,
}

impl IngestClient {
    /// Create a client with its own connection pool.
    pub fn new(settings: IngestionSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Create a client on top of an existing (shared) `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, settings: IngestionSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &IngestionSettings {
        &self.settings
    }

    /// The full ingestion URL for a batch sent at `now_ms`.
    pub fn ingest_url(&self, now_ms: u64) -> Result<Url, IngestError> {
        let mut url = Url::parse(&self.settings.endpoint).map_err(|source| IngestError::Url {
            endpoint: self.settings.endpoint.clone(),
            source,
        })?;
        url.query_pairs_mut()
            .append_pair("tag", &self.settings.tag)
            .append_pair("hostname", &self.settings.hostname)
            .append_pair("now", &now_ms.to_string());
        Ok(url)
    }
}

impl LogSink for IngestClient {
    async fn send(&self, batch: &IngestBatch, now_ms: u64) -> Result<(), IngestError> {
        let url = self.ingest_url(now_ms)?;
        let api_key = HeaderValue::from_str(&self.settings.api_key)?;
        let body = serde_json::to_vec(batch)?;

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .header(API_KEY_HEADER, api_key)
            .body(body);
        if let Some(timeout) = self.settings.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status(status));
        }

        tracing::debug!(lines = batch.len(), status = %status, "Delivered log batch");
        Ok(())
    }
}
