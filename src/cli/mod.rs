// CLI module
// Argument parsing for the extractor binary

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Parse the process arguments into a [`CliArgs`].
///
/// Invalid or missing required arguments (and `--help`) are handled by
/// clap directly: it prints the error or help text and exits, so callers
/// only ever see a fully populated `CliArgs`.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
