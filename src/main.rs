//! Ledger Extractor CLI
//!
//! Command-line entry point for one-shot extraction runs.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger_export.csv
//! cargo run -- --batch-size 2000 --max-concurrent 8 ledger_export.csv
//! LEDGER_API_URL=http://api.internal/transactions cargo run -- ledger_export.csv
//! ```
//!
//! The program extracts transaction rows from the input CSV file, persists
//! them to the configured store in concurrent batches, posts the complete
//! set to the ingestion API, and exits.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad configuration, unreadable input, failed delivery, etc.)

use std::process;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ledger_extractor::{cli, logging, pipeline};

#[tokio::main]
async fn main() {
    // Load .env before logging so RUST_LOG from the file is honored
    dotenv::dotenv().ok();
    logging::init("info");

    let args = cli::parse_args();
    let config = match args.to_config() {
        Ok(config) => config,
        Err(error) => {
            error!("{error}");
            process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping the run");
            signal_cancel.cancel();
        }
    });

    match pipeline::run(&config, &cancel).await {
        Ok(summary) => info!("{summary}"),
        Err(error) => {
            error!("{error}");
            process::exit(1);
        }
    }
}
