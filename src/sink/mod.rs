//! Delivery sinks
//!
//! Concrete implementations of the delivery traits. The store side lands
//! batches in libsql, the API side posts the full set to the ingestion
//! endpoint. Both are constructed from the resolved pipeline configuration
//! and honor cooperative cancellation.

pub mod api;
pub mod database;

pub use api::HttpApiSink;
pub use database::DatabaseSink;
