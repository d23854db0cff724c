use crate::config::{self, PipelineConfig};
use crate::core::BatchConfig;
use crate::types::PipelineError;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Extract ledger entries and deliver them to the store and ingestion API
#[derive(Parser, Debug)]
#[command(name = "ledger-extractor")]
#[command(
    about = "Extract ledger entries from a positional CSV export and deliver them to the store and ingestion API",
    long_about = None
)]
pub struct CliArgs {
    /// Input CSV file path containing the ledger export
    #[arg(value_name = "INPUT", help = "Path to the ledger export file")]
    pub input_file: PathBuf,

    /// Ingestion API endpoint
    #[arg(
        long = "api-url",
        value_name = "URL",
        help = "Ingestion API endpoint (overrides LEDGER_API_URL)"
    )]
    pub api_url: Option<String>,

    /// Store database path
    #[arg(
        long = "db-path",
        value_name = "PATH",
        help = "Store database file path (overrides LEDGER_DB_PATH)"
    )]
    pub db_path: Option<String>,

    /// Number of records per store batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per store batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of batch commits in flight
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum batch commits in flight (default: 2x CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Per-batch store timeout in seconds
    #[arg(
        long = "store-timeout",
        value_name = "SECS",
        help = "Per-batch store commit timeout in seconds (default: 60)"
    )]
    pub store_timeout_secs: Option<u64>,
}

/// Read a non-empty environment variable
fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a numeric environment variable, failing on malformed text
fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>, PipelineError> {
    match env_value(name) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            PipelineError::configuration(&format!("{} is not a valid number: '{}'", name, raw))
        }),
        None => Ok(None),
    }
}

impl CliArgs {
    /// Resolve the full pipeline configuration from CLI arguments and
    /// environment variables
    ///
    /// CLI flags take precedence over the environment. The API URL and
    /// database path are required through one source or the other.
    ///
    /// # Returns
    ///
    /// Result containing either:
    /// - Ok(PipelineConfig) - The fully resolved run configuration
    /// - Err(PipelineError::Configuration) - A required value is missing
    ///   or a numeric override is malformed
    pub fn to_config(&self) -> Result<PipelineConfig, PipelineError> {
        let api_url = self
            .api_url
            .clone()
            .or_else(|| env_value(config::ENV_API_URL))
            .ok_or_else(|| {
                PipelineError::configuration(&format!(
                    "{} is not set (or pass --api-url)",
                    config::ENV_API_URL
                ))
            })?;

        let db_path = self
            .db_path
            .clone()
            .or_else(|| env_value(config::ENV_DB_PATH))
            .ok_or_else(|| {
                PipelineError::configuration(&format!(
                    "{} is not set (or pass --db-path)",
                    config::ENV_DB_PATH
                ))
            })?;

        let store_timeout_secs = match self.store_timeout_secs {
            Some(secs) => secs,
            None => env_number(config::ENV_STORE_TIMEOUT)?
                .unwrap_or(config::DEFAULT_STORE_TIMEOUT_SECS),
        };

        Ok(PipelineConfig {
            input_path: self.input_file.clone(),
            api_url,
            db_path,
            store_timeout: Duration::from_secs(store_timeout_secs),
            batch: self.to_batch_config()?,
        })
    }

    /// Create a BatchConfig from CLI arguments and environment variables
    ///
    /// Uses provided values where present and falls back to defaults
    /// otherwise. Zero values are rejected by `BatchConfig::new` with a
    /// warning and replaced by the defaults.
    fn to_batch_config(&self) -> Result<BatchConfig, PipelineError> {
        let batch_size = match self.batch_size {
            Some(size) => Some(size),
            None => env_number(config::ENV_BATCH_SIZE)?,
        };
        let max_concurrent = match self.max_concurrent_batches {
            Some(count) => Some(count),
            None => env_number(config::ENV_MAX_CONCURRENT)?,
        };

        if batch_size.is_some() || max_concurrent.is_some() {
            // At least one custom value provided, create custom config
            let default = BatchConfig::default();
            Ok(BatchConfig::new(
                batch_size.unwrap_or(default.batch_size),
                max_concurrent.unwrap_or(default.max_concurrent_batches),
            ))
        } else {
            // No custom values, use all defaults
            Ok(BatchConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base_args() -> Vec<&'static str> {
        vec![
            "program",
            "--api-url",
            "http://localhost:8080/ingest",
            "--db-path",
            "ledger.db",
        ]
    }

    fn parse(extra: &[&str]) -> CliArgs {
        let mut args = base_args();
        args.extend_from_slice(extra);
        args.push("input.csv");
        CliArgs::try_parse_from(args).unwrap()
    }

    // Individual option tests
    #[rstest]
    #[case::batch_size(&["--batch-size", "2000"], Some(2000), None)]
    #[case::max_concurrent(&["--max-concurrent", "8"], None, Some(8))]
    #[case::no_options(&[], None, None)]
    #[case::all_options(&["--batch-size", "2000", "--max-concurrent", "8"], Some(2000), Some(8))]
    fn test_config_options(
        #[case] extra: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = parse(extra);
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    // Batch configuration resolution with valid values
    #[rstest]
    #[case::all_defaults(&[], 1000, num_cpus::get() * 2)]
    #[case::custom_batch_size(&["--batch-size", "2000"], 2000, num_cpus::get() * 2)]
    #[case::custom_max_concurrent(&["--max-concurrent", "8"], 1000, 8)]
    #[case::all_custom(&["--batch-size", "2000", "--max-concurrent", "8"], 2000, 8)]
    fn test_batch_config_resolution(
        #[case] extra: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = parse(extra).to_config().unwrap();

        assert_eq!(config.batch.batch_size, expected_batch_size);
        assert_eq!(config.batch.max_concurrent_batches, expected_max_concurrent);
    }

    // Zero values fall back to defaults
    #[rstest]
    #[case::zero_batch_size(&["--batch-size", "0"], "batch_size", 1000)]
    #[case::zero_max_concurrent(&["--max-concurrent", "0"], "max_concurrent", num_cpus::get() * 2)]
    fn test_batch_config_zero_values_fallback(
        #[case] extra: &[&str],
        #[case] field: &str,
        #[case] expected_default: usize,
    ) {
        let config = parse(extra).to_config().unwrap();

        match field {
            "batch_size" => assert_eq!(config.batch.batch_size, expected_default),
            "max_concurrent" => {
                assert_eq!(config.batch.max_concurrent_batches, expected_default)
            }
            _ => panic!("Unknown field: {}", field),
        }
    }

    #[test]
    fn test_full_config_resolution() {
        let parsed = parse(&["--store-timeout", "15"]);
        let config = parsed.to_config().unwrap();

        assert_eq!(config.input_path, PathBuf::from("input.csv"));
        assert_eq!(config.api_url, "http://localhost:8080/ingest");
        assert_eq!(config.db_path, "ledger.db");
        assert_eq!(config.store_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_store_timeout_defaults_to_sixty_seconds() {
        let config = parse(&[]).to_config().unwrap();
        assert_eq!(config.store_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_required_endpoints_fail_resolution() {
        env::remove_var(config::ENV_API_URL);
        env::remove_var(config::ENV_DB_PATH);

        let parsed = CliArgs::try_parse_from(["program", "input.csv"]).unwrap();
        let result = parsed.to_config();

        assert!(matches!(result, Err(PipelineError::Configuration { .. })));
    }

    // Error handling tests
    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::malformed_batch_size(&["program", "--batch-size", "lots", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
