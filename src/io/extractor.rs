//! Streaming extraction of ledger exports
//!
//! Drives a single forward-only pass over the input file, producing the
//! ordered record set handed to the delivery phase.
//!
//! # Design
//!
//! The extractor uses:
//! - csv-async for streaming row reads (no wholesale file load)
//! - positional header exclusion (first row, regardless of content)
//! - a dense 1-based line counter covering data rows only
//!
//! # Architecture
//!
//! ```text
//! File / AsyncRead → csv-async row stream → line_parser → Vec<Transaction>
//!                                               ↓
//!                                          FieldSkips
//!                                     (skip diagnostics)
//! ```

use crate::io::layout;
use crate::io::line_parser::{parse_line, FieldSkips};
use crate::types::{PipelineError, Transaction};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of one extraction pass
///
/// The record sequence is in input order and is not mutated after the
/// pass completes; the dispatcher shares it read-only across both
/// delivery activities.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// All parsed records, ordered by input line
    pub records: Vec<Transaction>,

    /// Diagnostics for silently skipped optional fields
    pub skips: FieldSkips,
}

/// Extract all records from a file on disk
///
/// # Arguments
///
/// * `path` - Path to the ledger export file
/// * `cancel` - Run-scoped cancellation signal, checked between rows
///
/// # Returns
///
/// Result containing either:
/// - Ok(ExtractionReport) - All records in input order plus skip counters
/// - Err(PipelineError::InputNotFound) - The path does not exist
/// - Err(PipelineError::MalformedField) - A required field failed to parse
pub async fn extract_file(
    path: &Path,
    cancel: &CancellationToken,
) -> Result<ExtractionReport, PipelineError> {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Err(PipelineError::input_not_found(&path.display().to_string()));
        }
        Err(error) => return Err(error.into()),
    };

    extract_records(file.compat(), cancel).await
}

/// Extract all records from any async byte source
///
/// The first row is always treated as the header and excluded, identified
/// by position rather than content. Rows with zero fields (blank lines)
/// never reach the parser and do not advance the line counter, keeping
/// line numbers dense.
///
/// # Guarantees
///
/// - Single forward-only pass; rows are visited in file order
/// - `line_number` values form the dense sequence 1..=N over data rows
/// - The first identifier parse failure aborts the pass with no records
///   surfaced
pub async fn extract_records<R>(
    reader: R,
    cancel: &CancellationToken,
) -> Result<ExtractionReport, PipelineError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv_async::Trim::All)
        .delimiter(layout::DELIMITER)
        .create_reader(reader);

    let mut records = Vec::new();
    let mut skips = FieldSkips::default();
    let mut line_number: u64 = 0;
    let mut header_seen = false;

    let mut rows = csv_reader.records();
    while let Some(row) = rows.next().await {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let row = row?;
        if !header_seen {
            header_seen = true;
            continue;
        }

        line_number += 1;
        records.push(parse_line(&row, line_number, &mut skips)?);
    }

    debug!(
        records = records.len(),
        skipped_fields = skips.total(),
        "extraction pass complete"
    );

    Ok(ExtractionReport { records, skips })
}
