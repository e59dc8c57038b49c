// CLI module
// Command-line and environment configuration

mod args;

pub use args::CliArgs;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Every flag except the bootstrap tuning ones can also be set through its
/// environment variable. On invalid arguments or `--help`, clap prints a
/// message and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
