//! Ledger Extractor Library
//! # Overview
//!
//! This library extracts transaction rows from positional ledger CSV exports
//! and delivers them concurrently to a relational store and an ingestion API
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, pipeline errors)
//! - [`cli`] - CLI argument parsing
//! - [`config`] - Consolidated run configuration resolved from flags and environment
//! - [`io`] - Positional CSV extraction:
//!   - [`io::layout`] - Column indices and status sentinels of the export format
//!   - [`io::line_parser`] - Field-level parsing with skip accounting
//!   - [`io::extractor`] - Streaming extraction over the input file
//! - [`core`] - Delivery logic:
//!   - [`core::traits`] - Sink contracts the dispatcher fans out to
//!   - [`core::dispatcher`] - Concurrent batched delivery
//! - [`sink`] - libsql store and HTTP API sink implementations
//! - [`pipeline`] - One-shot run orchestration
//!
//! # Extraction Rules
//!
//! A small set of rules governs how raw rows become records:
//!
//! - **Header**: The first physical row is layout metadata and is never parsed
//! - **Identity**: The entry id must parse; a malformed id aborts the whole run
//! - **Settlement**: Status `5000` marks a settled debit, `5005` a settled credit
//! - **Derivation**: Debit and credit values derive from the amount and the
//!   exchange rate together; if either is unusable, both sides stay unset
//! - **Tolerance**: Any other malformed field is skipped and counted, never fatal

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod sink;
pub mod types;

pub use config::PipelineConfig;
pub use core::{ApiSink, BatchConfig, BatchDispatcher, DispatchReport, StoreSink};
pub use io::{extract_file, extract_records, ExtractionReport, FieldSkips};
pub use pipeline::{run, RunSummary};
pub use sink::{DatabaseSink, HttpApiSink};
pub use types::{EntryId, PipelineError, SinkError, Transaction};
