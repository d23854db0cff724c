//! libsql-backed store sink
//!
//! Persists record batches into a libsql database file. Every batch commits
//! through its own connection and transaction, so concurrent batches never
//! share mutable state and a failed batch leaves no partial rows behind.

use std::time::Duration;

use async_trait::async_trait;
use libsql::{Builder, Database, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::core::StoreSink;
use crate::types::{PipelineError, SinkError, Transaction};

/// Schema applied once when the sink connects
const MIGRATION: &str = include_str!("../../migrations/001_create_transactions.sql");

/// Insert statement matching the migration's column order
const INSERT_SQL: &str = "INSERT INTO transactions \
    (entry_id, line_number, foreign_debit, foreign_credit, debit, credit, post_date, currency) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Store sink that writes batches to a local libsql database.
///
/// The sink holds the opened [`Database`] handle and draws a fresh
/// connection per batch. Connections are cheap for local databases and
/// keeping them batch-scoped means a poisoned transaction can never leak
/// into the next commit.
pub struct DatabaseSink {
    db: Database,
    timeout: Duration,
}

impl DatabaseSink {
    /// Opens the database named by the configuration and applies migrations.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved pipeline configuration carrying the database
    ///   path and the per-batch commit timeout
    ///
    /// # Returns
    ///
    /// A connected sink, or a configuration error when the database cannot
    /// be opened or migrated. Failing here keeps startup problems out of
    /// the per-batch delivery path.
    pub async fn connect(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let db = Builder::new_local(&config.db_path)
            .build()
            .await
            .map_err(|error| {
                PipelineError::configuration(&format!(
                    "store database '{}' could not be opened: {error}",
                    config.db_path
                ))
            })?;

        let conn = db.connect().map_err(|error| {
            PipelineError::configuration(&format!(
                "store database '{}' refused a connection: {error}",
                config.db_path
            ))
        })?;

        conn.execute_batch(MIGRATION).await.map_err(|error| {
            PipelineError::configuration(&format!(
                "store schema migration failed: {error}"
            ))
        })?;

        info!(path = %config.db_path, "store schema ready");

        Ok(Self {
            db,
            timeout: config.store_timeout,
        })
    }

    /// Commits one batch inside a single transaction.
    ///
    /// Rolls back explicitly on insert failure and on cancellation. A
    /// commit dropped mid-flight by the timeout wrapper rolls back when
    /// the transaction handle is dropped.
    async fn commit_batch(
        &self,
        batch: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        for record in batch {
            if cancel.is_cancelled() {
                tx.rollback().await.ok();
                return Err(SinkError::new("cancelled during batch commit"));
            }

            if let Err(error) = tx.execute(INSERT_SQL, row_values(record)).await {
                tx.rollback().await.ok();
                return Err(error.into());
            }
        }

        tx.commit().await?;
        debug!(records = batch.len(), "batch committed to store");
        Ok(())
    }
}

#[async_trait]
impl StoreSink for DatabaseSink {
    async fn accept_batch(
        &self,
        batch: &[Transaction],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        if cancel.is_cancelled() {
            return Err(SinkError::new("cancelled before batch commit"));
        }

        match tokio::time::timeout(self.timeout, self.commit_batch(batch, cancel)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SinkError::new(format!(
                "batch commit exceeded the {}s store timeout",
                self.timeout.as_secs()
            ))),
        }
    }
}

/// Maps a record to positional insert parameters, with unset optional
/// fields landing as SQL NULL.
fn row_values(record: &Transaction) -> Vec<Value> {
    vec![
        Value::Integer(record.id),
        Value::Integer(record.line_number as i64),
        optional_real(record.foreign_debit),
        optional_real(record.foreign_credit),
        optional_real(record.debit),
        optional_real(record.credit),
        record
            .post_date
            .map(|date| Value::Text(date.to_string()))
            .unwrap_or(Value::Null),
        record.currency.clone().map(Value::Text).unwrap_or(Value::Null),
    ]
}

fn optional_real(value: Option<f64>) -> Value {
    value.map(Value::Real).unwrap_or(Value::Null)
}
