//! Positional layout of the ledger export format
//!
//! The input file is not self-describing: column positions are a fixed
//! contract against one specific ledger export layout. This module is the
//! single place that pins that contract. Treat every constant here as a
//! versioned schema value; a new export layout means a new revision of
//! this file, not runtime inference.
//!
//! Indices are 0-based positions into the delimited row.

/// Field delimiter of the export
pub const DELIMITER: u8 = b',';

/// Column holding the required ledger entry identifier
pub const COL_ENTRY_ID: usize = 6;

/// Column holding the posting date text
pub const COL_POST_DATE: usize = 4;

/// Column holding the currency code
pub const COL_CURRENCY: usize = 9;

/// Column holding the unconverted amount
pub const COL_AMOUNT: usize = 13;

/// Column holding the exchange rate applied to the amount
pub const COL_EXCHANGE_RATE: usize = 36;

/// Column holding the entry status code
pub const COL_STATUS: usize = 45;

/// Minimum row width implied by the highest pinned column index
pub const ROW_WIDTH: usize = COL_STATUS + 1;

/// Status code marking a settled debit entry
///
/// Rows carrying this status populate `debit` and `foreign_debit`.
pub const STATUS_SETTLED_DEBIT: i32 = 5000;

/// Status code marking a settled credit entry
///
/// Rows carrying this status populate `credit` and `foreign_credit`.
pub const STATUS_SETTLED_CREDIT: i32 = 5005;

/// Accepted posting-date renderings that carry a time component
///
/// The time-of-day is parsed and then discarded; records keep calendar
/// precision only.
pub const POST_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Accepted date-only posting-date renderings
pub const POST_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
