//! Core traits for the delivery boundary
//!
//! This module defines the narrow contracts through which the dispatcher
//! consumes external delivery capabilities. Implementations own their
//! transport concerns (connections, serialization, timeouts, rollback);
//! the dispatcher owns batching and concurrency.

use crate::types::{SinkError, Transaction};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Contract for the bulk relational store
///
/// The dispatcher invokes `accept_batch` once per batch, possibly from
/// several batches in flight at the same time, so implementations must be
/// safe to call concurrently.
#[async_trait]
pub trait StoreSink: Send + Sync {
    /// Durably persist one batch of records, atomically
    ///
    /// A batch either fully commits or fully rolls back; no partial batch
    /// may persist. Failure of one batch must not corrupt or block other
    /// concurrently committing batches.
    ///
    /// Implementations observe `cancel` cooperatively: an in-flight batch
    /// is expected to notice cancellation and unwind with a rollback.
    async fn accept_batch(
        &self,
        batch: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError>;
}

/// Contract for the HTTP ingestion endpoint
///
/// The dispatcher invokes `accept_all` exactly once per run with the full
/// record sequence; no batching or partial-success semantics exist at
/// this boundary.
#[async_trait]
pub trait ApiSink: Send + Sync {
    /// Deliver the full record sequence as a single request
    ///
    /// Success or failure is all-or-nothing for the call. The payload may
    /// be empty; implementations still issue the request.
    async fn accept_all(
        &self,
        records: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError>;
}
