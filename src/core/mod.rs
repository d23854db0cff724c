//! Core dispatch logic module
//!
//! This module contains the delivery-phase components:
//! - `traits` - Narrow sink contracts consumed by the dispatcher
//! - `dispatcher` - Batch partitioning and concurrent dual-sink delivery

pub mod dispatcher;
pub mod traits;

pub use dispatcher::{BatchConfig, BatchDispatcher, DispatchReport};
pub use traits::{ApiSink, StoreSink};
