//! Positional row parsing for ledger export lines
//!
//! This module converts one delimited row into a [`Transaction`], applying
//! the status-conditioned derivation rules of the export format:
//! - the entry identifier is required and fatal when malformed
//! - amount fields populate only when the row's status code matches a
//!   settled-debit or settled-credit sentinel and both the amount and the
//!   exchange rate parse
//! - malformed optional fields are silently left unset and counted
//!
//! All functions are pure (no I/O) for easy testing.

use crate::io::layout;
use crate::types::{EntryId, PipelineError, Transaction};
use chrono::{NaiveDate, NaiveDateTime};
use csv_async::StringRecord;
use std::fmt;

/// Diagnostic counters for silently skipped optional fields
///
/// Skipping a malformed optional field is correct behavior, not an error,
/// so none of these counters affect the run outcome. They exist so an
/// operator can observe skip rates from the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSkips {
    /// Derivation attempts where a matching status found no usable
    /// amount/exchange-rate pair
    pub amounts: u64,

    /// Non-empty posting-date fields that matched no accepted format
    pub dates: u64,

    /// Non-empty status fields that failed integer parsing
    pub statuses: u64,
}

impl FieldSkips {
    /// Total number of skipped fields across all categories
    pub fn total(&self) -> u64 {
        self.amounts + self.dates + self.statuses
    }

    /// True when no field was skipped during the run
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for FieldSkips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "amounts={}, dates={}, statuses={}",
            self.amounts, self.dates, self.statuses
        )
    }
}

/// Read one positional field, tolerating short rows
///
/// Rows narrower than the pinned layout read as empty at the missing
/// positions, so only the required identifier can fail a row.
fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Parse the status code, treating malformed text as "no match"
fn parse_status(raw: &str, skips: &mut FieldSkips) -> Option<i32> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(status) => Some(status),
        Err(_) => {
            skips.statuses += 1;
            None
        }
    }
}

/// Parse the amount and exchange rate as a pair
///
/// Returns the unconverted amount together with the converted
/// (`amount × rate`) value. Both fields must parse; if either fails,
/// neither value is produced and one amount skip is counted.
fn parse_amount_pair(record: &StringRecord, skips: &mut FieldSkips) -> Option<(f64, f64)> {
    let amount = field(record, layout::COL_AMOUNT).parse::<f64>().ok();
    let rate = field(record, layout::COL_EXCHANGE_RATE).parse::<f64>().ok();

    match (amount, rate) {
        (Some(amount), Some(rate)) => Some((amount, amount * rate)),
        _ => {
            skips.amounts += 1;
            None
        }
    }
}

/// Parse a posting date from any accepted rendering
///
/// Formats carrying a time component are truncated to calendar precision.
fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    for format in layout::POST_DATE_TIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }
    for format in layout::POST_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}

/// Convert one data row into a Transaction
///
/// This function:
/// - Parses the required entry identifier (fatal when malformed)
/// - Applies the settled-debit and settled-credit derivation rules
/// - Parses the optional posting date and currency code
/// - Counts every silently skipped optional field in `skips`
///
/// # Arguments
///
/// * `record` - The positional fields of one data row
/// * `line_number` - 1-based position of the row within the data portion
/// * `skips` - Accumulator for skipped-field diagnostics
///
/// # Returns
///
/// Result containing either:
/// - Ok(Transaction) - The normalized record for this row
/// - Err(PipelineError::MalformedField) - The identifier failed to parse
pub fn parse_line(
    record: &StringRecord,
    line_number: u64,
    skips: &mut FieldSkips,
) -> Result<Transaction, PipelineError> {
    let raw_id = field(record, layout::COL_ENTRY_ID);
    let id = raw_id
        .parse::<EntryId>()
        .map_err(|_| PipelineError::malformed_field("id", raw_id, line_number))?;

    let mut transaction = Transaction::new(id, line_number);

    let status = parse_status(field(record, layout::COL_STATUS), skips);

    if status == Some(layout::STATUS_SETTLED_DEBIT) {
        if let Some((amount, converted)) = parse_amount_pair(record, skips) {
            transaction.debit = Some(amount);
            transaction.foreign_debit = Some(converted);
        }
    }

    // The sentinels are disjoint in the current export layout, but this is
    // deliberately not an else branch: a row matching both sentinels
    // populates both sides independently.
    if status == Some(layout::STATUS_SETTLED_CREDIT) {
        if let Some((amount, converted)) = parse_amount_pair(record, skips) {
            transaction.credit = Some(amount);
            transaction.foreign_credit = Some(converted);
        }
    }

    let raw_date = field(record, layout::COL_POST_DATE);
    if !raw_date.is_empty() {
        match parse_post_date(raw_date) {
            Some(date) => transaction.post_date = Some(date),
            None => skips.dates += 1,
        }
    }

    let raw_currency = field(record, layout::COL_CURRENCY);
    if !raw_currency.is_empty() {
        transaction.currency = Some(raw_currency.to_string());
    }

    Ok(transaction)
}
