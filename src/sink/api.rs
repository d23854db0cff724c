//! HTTP ingestion sink
//!
//! Ships the complete extracted set to the downstream ingestion endpoint
//! as one JSON array. The endpoint owns dedup and ordering at its side;
//! this sink's contract is exactly one request per run, empty set included.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::core::ApiSink;
use crate::types::{PipelineError, SinkError, Transaction};

/// Request timeout covering connect plus the full body exchange
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API sink that posts the extracted record set to an HTTP endpoint.
pub struct HttpApiSink {
    client: Client,
    endpoint: String,
}

impl HttpApiSink {
    /// Builds the sink with a timeout-bounded HTTP client.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved pipeline configuration carrying the endpoint URL
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|error| {
                PipelineError::configuration(&format!("http client construction failed: {error}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl ApiSink for HttpApiSink {
    async fn accept_all(
        &self,
        records: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        let request = self.client.post(&self.endpoint).json(&records).send();

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(SinkError::new("cancelled during api delivery"));
            }
            outcome = request => outcome?,
        };

        if !response.status().is_success() {
            return Err(SinkError::new(format!(
                "ingestion endpoint returned {}",
                response.status()
            )));
        }

        debug!(records = records.len(), "api delivery accepted");
        Ok(())
    }
}
