//! Concurrent dual-sink dispatch of the extracted record set
//!
//! This module provides the `BatchDispatcher`, which partitions the record
//! sequence into bounded batches for the store while delivering the full
//! sequence to the ingestion API in a single call, running both deliveries
//! concurrently.
//!
//! # Architecture
//!
//! ```text
//! BatchDispatcher
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── StoreSink   (bulk persistence, one call per batch)
//!     └── ApiSink     (single-shot delivery of the full set)
//! ```
//!
//! # Concurrency
//!
//! Dispatch runs exactly two top-level activities with no ordering
//! dependency between them. The store activity fans out into concurrent
//! per-batch commits bounded by `max_concurrent_batches`; the API activity
//! is one call. Both share the record sequence read-only, so no locking
//! is involved.

use crate::core::traits::{ApiSink, StoreSink};
use crate::types::{PipelineError, Transaction};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Configuration for batch dispatch
///
/// Controls how records are batched for the store and how many batch
/// commits may be in flight at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per store batch
    pub batch_size: usize,
    /// Maximum number of batch commits in flight concurrently
    ///
    /// Bounds connection pressure on the store. The default is twice the
    /// host's available parallelism.
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get() * 2,
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning, so a
    /// misconfigured environment cannot stall dispatch entirely.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size (0), using default ({})",
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches (0), using default ({})",
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Outcome of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Records delivered to both sinks
    pub records: usize,
    /// Store batches committed
    pub batches: usize,
}

/// Concurrent dual-sink dispatcher
///
/// Owns no state beyond its two sinks and the batch configuration; the
/// record sequence is borrowed read-only for the duration of one
/// `dispatch` call.
pub struct BatchDispatcher<S, A> {
    store: S,
    api: A,
    config: BatchConfig,
}

impl<S: StoreSink, A: ApiSink> BatchDispatcher<S, A> {
    /// Create a new BatchDispatcher over the given sinks
    pub fn new(store: S, api: A, config: BatchConfig) -> Self {
        Self { store, api, config }
    }

    /// Deliver every record to both sinks
    ///
    /// Runs the batched store delivery and the single-shot API delivery
    /// concurrently and waits for both to finish before reporting. The
    /// overall outcome is the conjunction of the two activities.
    ///
    /// # Arguments
    ///
    /// * `records` - The full extracted record sequence, in input order
    /// * `cancel` - Run-scoped cancellation signal, honored by the sinks
    ///
    /// # Returns
    ///
    /// Result containing either:
    /// - Ok(DispatchReport) - Both activities completed
    /// - Err(PipelineError::StoreSink) - A batch commit failed
    /// - Err(PipelineError::ApiSink) - The API call failed
    ///
    /// # Guarantees
    ///
    /// - The store receives ⌈records / batch_size⌉ batches partitioning
    ///   the sequence contiguously in input order (delivery order across
    ///   batches is unspecified)
    /// - The API sink receives exactly one call with all records, even
    ///   when the sequence is empty
    /// - Neither activity's failure aborts the other mid-flight; batches
    ///   already committed stay committed
    /// - When both activities fail, the store failure is the one surfaced
    pub async fn dispatch(
        &self,
        records: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<DispatchReport, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let (store_outcome, api_outcome) = tokio::join!(
            self.deliver_to_store(records, cancel),
            self.deliver_to_api(records, cancel),
        );

        let batches = store_outcome?;
        api_outcome?;

        info!(records = records.len(), batches, "dispatch complete");

        Ok(DispatchReport {
            records: records.len(),
            batches,
        })
    }

    /// Commit the record sequence to the store in bounded-concurrency batches
    ///
    /// On the first failed batch the remaining uncommitted batches are
    /// abandoned; their transactions never start. Returns the number of
    /// batches committed.
    async fn deliver_to_store(
        &self,
        records: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<usize, PipelineError> {
        let commits = records
            .chunks(self.config.batch_size)
            .enumerate()
            .map(|(index, batch)| async move {
                self.store
                    .accept_batch(batch, cancel)
                    .await
                    .map_err(|error| PipelineError::store_sink(index, error))?;
                info!(batch = index, records = batch.len(), "store batch delivered");
                Ok::<_, PipelineError>(())
            });

        let mut in_flight =
            stream::iter(commits).buffer_unordered(self.config.max_concurrent_batches);

        let mut batches = 0;
        while let Some(outcome) = in_flight.next().await {
            outcome?;
            batches += 1;
        }

        Ok(batches)
    }

    /// Deliver the full record sequence to the API in one call
    async fn deliver_to_api(
        &self,
        records: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        self.api
            .accept_all(records, cancel)
            .await
            .map_err(PipelineError::api_sink)?;
        info!(records = records.len(), "api delivery complete");
        Ok(())
    }
}
