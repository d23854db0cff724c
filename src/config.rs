//! Run configuration for the extraction pipeline
//!
//! Every tunable the pipeline reads (input path, sink endpoints, batch
//! shape, store timeout) lives in one [`PipelineConfig`] resolved once at
//! startup from CLI arguments and environment variables. The extractor,
//! the dispatcher, and both sinks are constructed from this structure;
//! nothing else in the crate reads ambient configuration.

use crate::core::BatchConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the ingestion API endpoint
pub const ENV_API_URL: &str = "LEDGER_API_URL";

/// Environment variable naming the store database path
pub const ENV_DB_PATH: &str = "LEDGER_DB_PATH";

/// Environment variable overriding the store batch size
pub const ENV_BATCH_SIZE: &str = "LEDGER_BATCH_SIZE";

/// Environment variable overriding the batch concurrency ceiling
pub const ENV_MAX_CONCURRENT: &str = "LEDGER_MAX_CONCURRENT_BATCHES";

/// Environment variable overriding the per-batch store timeout, in seconds
pub const ENV_STORE_TIMEOUT: &str = "LEDGER_STORE_TIMEOUT_SECS";

/// Default per-batch store timeout, in seconds
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 60;

/// Resolved configuration for one pipeline run
///
/// CLI flags take precedence over environment variables; unset optional
/// values fall back to the defaults documented per field. The API URL and
/// database path are required and their absence fails the run before any
/// input is read.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the ledger export file to extract
    pub input_path: PathBuf,

    /// Ingestion API endpoint receiving the full record set
    pub api_url: String,

    /// Path of the store database file
    pub db_path: String,

    /// Upper bound on one batch's commit duration (default 60s)
    pub store_timeout: Duration,

    /// Batch size and concurrency ceiling for store delivery
    pub batch: BatchConfig,
}
