//! One-shot extraction run
//!
//! Wires the stages into a single job that runs to completion and exits:
//!
//! ```text
//! input file ──▶ extract ──▶ record set ──▶ dispatch ─┬─▶ store (batched)
//!                                                     └─▶ api   (full set)
//! ```
//!
//! The run either returns a [`RunSummary`] with every record delivered to
//! both destinations, or the first error met along the way. There is no
//! resident service loop; scheduling repeat runs belongs to the caller.

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::core::{ApiSink, BatchDispatcher, StoreSink};
use crate::io::{extract_file, FieldSkips};
use crate::sink::{DatabaseSink, HttpApiSink};
use crate::types::PipelineError;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Records extracted and delivered to both destinations
    pub records: usize,
    /// Store batches committed
    pub batches: usize,
    /// Per-field skip counters accumulated during extraction
    pub skipped_fields: FieldSkips,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records extracted, {} store batches committed, skipped fields: {}",
            self.records, self.batches, self.skipped_fields
        )
    }
}

/// Runs one extraction job end to end with the production sinks.
///
/// # Arguments
///
/// * `config` - Resolved pipeline configuration
/// * `cancel` - Token that aborts the run cooperatively when triggered
///
/// # Returns
///
/// The run summary once both deliveries have completed, or the first
/// error from extraction, the store, or the API.
pub async fn run(
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<RunSummary, PipelineError> {
    let store = DatabaseSink::connect(config).await?;
    let api = HttpApiSink::new(config)?;
    run_with_sinks(config, store, api, cancel).await
}

/// Runs one extraction job against caller-supplied sinks.
///
/// This is the seam the end-to-end path and the tests share. Both sinks
/// always see the extracted set; the run reports failure if either side
/// rejects it.
pub async fn run_with_sinks<S, A>(
    config: &PipelineConfig,
    store: S,
    api: A,
    cancel: &CancellationToken,
) -> Result<RunSummary, PipelineError>
where
    S: StoreSink,
    A: ApiSink,
{
    let report = extract_file(&config.input_path, cancel).await?;

    if report.skips.is_empty() {
        debug!("no fields were skipped during extraction");
    } else {
        warn!(
            amounts = report.skips.amounts,
            dates = report.skips.dates,
            statuses = report.skips.statuses,
            "unusable fields were skipped during extraction"
        );
    }

    let dispatcher = BatchDispatcher::new(store, api, config.batch.clone());
    let dispatch = dispatcher.dispatch(&report.records, cancel).await?;

    let summary = RunSummary {
        records: dispatch.records,
        batches: dispatch.batches,
        skipped_fields: report.skips,
    };
    info!(
        records = summary.records,
        batches = summary.batches,
        "run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BatchConfig;
    use crate::types::{SinkError, Transaction};
    use async_trait::async_trait;
    use std::io::Write;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[derive(Clone, Default)]
    struct CollectingStore {
        rows: Arc<Mutex<Vec<Transaction>>>,
        batches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StoreSink for CollectingStore {
        async fn accept_batch(
            &self,
            batch: &[Transaction],
            _cancel: &CancellationToken,
        ) -> Result<(), SinkError> {
            self.rows.lock().unwrap().extend_from_slice(batch);
            self.batches.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CollectingApi {
        payloads: Arc<Mutex<Vec<Vec<Transaction>>>>,
    }

    #[async_trait]
    impl ApiSink for CollectingApi {
        async fn accept_all(
            &self,
            records: &[Transaction],
            _cancel: &CancellationToken,
        ) -> Result<(), SinkError> {
            self.payloads.lock().unwrap().push(records.to_vec());
            Ok(())
        }
    }

    fn config_for(input: &Path) -> PipelineConfig {
        PipelineConfig {
            input_path: input.to_path_buf(),
            api_url: "http://localhost:9099/transactions".to_string(),
            db_path: "unused.db".to_string(),
            store_timeout: Duration::from_secs(60),
            batch: BatchConfig::new(2, 2),
        }
    }

    fn line_with(id: &str, status: &str, amount: &str, rate: &str) -> String {
        let mut fields = vec![""; 46];
        fields[6] = id;
        fields[45] = status;
        fields[13] = amount;
        fields[36] = rate;
        fields.join(",")
    }

    fn input_file(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", vec!["h"; 46].join(",")).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_delivers_extracted_records_to_both_sinks() {
        let input = input_file(&[
            line_with("1", "5000", "100", "1.5"),
            line_with("2", "5005", "40", "2.0"),
            line_with("3", "", "", ""),
        ]);
        let store = CollectingStore::default();
        let api = CollectingApi::default();

        let summary = run_with_sinks(
            &config_for(input.path()),
            store.clone(),
            api.clone(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.batches, 2);
        assert!(summary.skipped_fields.is_empty());

        let rows = store.rows.lock().unwrap();
        let mut stored: Vec<_> = rows.iter().map(|r| r.id).collect();
        stored.sort_unstable();
        assert_eq!(stored, vec![1, 2, 3]);

        let payloads = api.payloads.lock().unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].len(), 3);
        assert_eq!(payloads[0][0].debit, Some(100.0));
        assert_eq!(payloads[0][0].foreign_debit, Some(150.0));
    }

    #[tokio::test]
    async fn test_surfaces_skip_counters_in_the_summary() {
        let input = input_file(&[
            line_with("1", "5000", "not-a-number", "1.5"),
            line_with("2", "bogus", "", ""),
        ]);

        let summary = run_with_sinks(
            &config_for(input.path()),
            CollectingStore::default(),
            CollectingApi::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.skipped_fields.amounts, 1);
        assert_eq!(summary.skipped_fields.statuses, 1);
    }

    #[tokio::test]
    async fn test_empty_input_still_reports_a_completed_run() {
        let input = input_file(&[]);
        let api = CollectingApi::default();

        let summary = run_with_sinks(
            &config_for(input.path()),
            CollectingStore::default(),
            api.clone(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.records, 0);
        assert_eq!(summary.batches, 0);
        assert_eq!(api.payloads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_input_file_fails_before_any_delivery() {
        let api = CollectingApi::default();
        let config = config_for(Path::new("/nonexistent/export.csv"));

        let outcome = run_with_sinks(
            &config,
            CollectingStore::default(),
            api.clone(),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            outcome,
            Err(PipelineError::InputNotFound { .. })
        ));
        assert!(api.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_identifier_aborts_the_run() {
        let input = input_file(&[
            line_with("1", "5000", "100", "1.5"),
            line_with("oops", "", "", ""),
        ]);

        let outcome = run_with_sinks(
            &config_for(input.path()),
            CollectingStore::default(),
            CollectingApi::default(),
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(
            outcome,
            Err(PipelineError::malformed_field("id", "oops", 2))
        );
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_the_run() {
        let input = input_file(&[line_with("1", "5000", "100", "1.5")]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = run_with_sinks(
            &config_for(input.path()),
            CollectingStore::default(),
            CollectingApi::default(),
            &cancel,
        )
        .await;

        assert_eq!(outcome, Err(PipelineError::Cancelled));
    }
}
