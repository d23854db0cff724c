//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: The normalized ledger entry and its identifiers
//! - `error`: Error types for the extraction pipeline

pub mod error;
pub mod transaction;

pub use error::{PipelineError, SinkError};
pub use transaction::{EntryId, Transaction};
