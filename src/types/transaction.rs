//! Transaction record types for the ledger extraction pipeline
//!
//! This module defines the normalized transaction entity derived from one
//! data line of the ledger export, together with its wire representation
//! for the ingestion API.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Ledger entry identifier
///
/// Carried verbatim from the export's identifier column. Identifiers are
/// unique within one export but carry no uniqueness guarantee across
/// re-runs of the same file.
pub type EntryId = i64;

/// One normalized ledger entry derived from one input data line
///
/// All monetary and date fields are optional: which of them are populated
/// depends on the row's status code and on whether the source fields parse.
/// The debit pair and the credit pair are selected by disjoint status
/// sentinels, so under the current export layout at most one side is set.
///
/// Records are created by the line parser, held in memory for the duration
/// of one run, shared read-only with both delivery sinks, and discarded.
///
/// The serde field names match the ingestion API's payload contract, which
/// predates this implementation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Identifier of the source ledger entry (required column)
    #[serde(rename = "TransactionId")]
    pub id: EntryId,

    /// 1-based position within the data portion of the file
    ///
    /// Assigned sequentially by the extractor, starting at 1 for the first
    /// data row (the header is excluded). Independent of `id`.
    #[serde(rename = "LineNumber")]
    pub line_number: u64,

    /// Foreign-currency debit: `amount × exchange_rate`
    #[serde(rename = "FCDebit")]
    pub foreign_debit: Option<f64>,

    /// Foreign-currency credit: `amount × exchange_rate`
    #[serde(rename = "FCCredit")]
    pub foreign_credit: Option<f64>,

    /// Unconverted debit amount
    #[serde(rename = "Debit")]
    pub debit: Option<f64>,

    /// Unconverted credit amount
    #[serde(rename = "Credit")]
    pub credit: Option<f64>,

    /// Posting date, calendar precision only (no time component)
    #[serde(rename = "PostDate")]
    pub post_date: Option<NaiveDate>,

    /// Currency code; `None` when the source field is empty
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
}

impl Transaction {
    /// Create a record with only the required fields populated
    ///
    /// All optional fields start unset; the line parser fills them in as
    /// its derivation rules match.
    pub fn new(id: EntryId, line_number: u64) -> Self {
        Self {
            id,
            line_number,
            foreign_debit: None,
            foreign_credit: None,
            debit: None,
            credit: None,
            post_date: None,
            currency: None,
        }
    }
}

/// Render an optional field for diagnostics, with `-` for unset values
fn opt_field<T: fmt::Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

impl fmt::Display for Transaction {
    /// Diagnostic rendering listing every field of the record
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction {} (line {}): debit={}, foreign_debit={}, credit={}, foreign_credit={}, post_date={}, currency={}",
            self.id,
            self.line_number,
            opt_field(&self.debit),
            opt_field(&self.foreign_debit),
            opt_field(&self.credit),
            opt_field(&self.foreign_credit),
            opt_field(&self.post_date),
            opt_field(&self.currency),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_leaves_optional_fields_unset() {
        let tx = Transaction::new(42, 7);

        assert_eq!(tx.id, 42);
        assert_eq!(tx.line_number, 7);
        assert_eq!(tx.debit, None);
        assert_eq!(tx.foreign_debit, None);
        assert_eq!(tx.credit, None);
        assert_eq!(tx.foreign_credit, None);
        assert_eq!(tx.post_date, None);
        assert_eq!(tx.currency, None);
    }

    #[test]
    fn test_display_lists_every_field() {
        let mut tx = Transaction::new(42, 7);
        tx.debit = Some(100.0);
        tx.foreign_debit = Some(150.0);
        tx.post_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        tx.currency = Some("USD".to_string());

        let rendered = tx.to_string();
        assert_eq!(
            rendered,
            "transaction 42 (line 7): debit=100, foreign_debit=150, credit=-, \
             foreign_credit=-, post_date=2024-05-01, currency=USD"
        );
    }

    #[test]
    fn test_serializes_with_api_field_names() {
        let mut tx = Transaction::new(9, 1);
        tx.credit = Some(25.5);
        tx.foreign_credit = Some(38.25);
        tx.post_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        tx.currency = Some("ZAR".to_string());

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            value,
            json!({
                "TransactionId": 9,
                "LineNumber": 1,
                "FCDebit": null,
                "FCCredit": 38.25,
                "Debit": null,
                "Credit": 25.5,
                "PostDate": "2024-05-01",
                "Currency": "ZAR",
            })
        );
    }
}
