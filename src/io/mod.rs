//! I/O module
//!
//! Handles reading and parsing the ledger export.
//!
//! # Components
//!
//! - `layout` - Positional schema constants of the export format
//! - `line_parser` - Pure row-to-record conversion with derivation rules
//! - `extractor` - Streaming file pass producing the ordered record set

pub mod extractor;
pub mod layout;
pub mod line_parser;

pub use extractor::{extract_file, extract_records, ExtractionReport};
pub use line_parser::{parse_line, FieldSkips};
