use crate::config::{LedgerConfig, DEFAULT_WRITE_TIMEOUT};
use crate::core::RetryPolicy;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Serve a five-account credit ledger over HTTP
#[derive(Parser, Debug)]
#[command(name = "credit-ledger")]
#[command(about = "Serve a five-account credit ledger over HTTP", long_about = None)]
pub struct CliArgs {
    /// Address the HTTP server binds to
    #[arg(
        long = "addr",
        env = "ADDR",
        value_name = "ADDR",
        default_value = "0.0.0.0:8080"
    )]
    pub addr: SocketAddr,

    /// Directory holding one database file per account
    #[arg(
        long = "data-dir",
        env = "FOLDER",
        value_name = "DIR",
        default_value = "data"
    )]
    pub data_dir: PathBuf,

    /// Maximum wait for an account's write transaction, in milliseconds
    #[arg(
        long = "write-timeout-ms",
        env = "TIMEOUT",
        value_name = "MS",
        help = "Maximum wait for an account's write transaction (default: 25)"
    )]
    pub write_timeout_ms: Option<u64>,

    /// Number of runtime worker threads
    #[arg(
        long = "workers",
        env = "WORKERS",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Remove existing data before starting
    #[arg(long = "reset-data", env = "RESET_DATA")]
    pub reset_data: bool,

    /// Attempts allowed for opening each account's database at start-up
    #[arg(long = "bootstrap-attempts", value_name = "COUNT", default_value_t = 10)]
    pub bootstrap_attempts: u32,

    /// Delay before the first bootstrap retry, in milliseconds
    #[arg(long = "bootstrap-delay-ms", value_name = "MS", default_value_t = 1000)]
    pub bootstrap_delay_ms: u64,
}

impl CliArgs {
    /// Build a `LedgerConfig` from CLI arguments
    ///
    /// Values that are absent fall back to defaults. A zero write timeout is
    /// rejected with a warning and replaced by the default.
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let write_timeout = match self.write_timeout_ms {
            Some(0) => {
                warn!(
                    default_ms = DEFAULT_WRITE_TIMEOUT.as_millis() as u64,
                    "invalid write timeout (0), using default"
                );
                DEFAULT_WRITE_TIMEOUT
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_WRITE_TIMEOUT,
        };

        LedgerConfig::new(self.data_dir.clone())
            .with_write_timeout(write_timeout)
            .with_reset_data(self.reset_data)
            .with_bootstrap_retry(RetryPolicy::new(
                self.bootstrap_attempts,
                Duration::from_millis(self.bootstrap_delay_ms),
            ))
    }

    /// Worker thread count for the runtime
    ///
    /// Falls back to the number of CPU cores when unset or zero.
    pub fn worker_threads(&self) -> usize {
        let default = num_cpus::get();
        match self.workers {
            Some(0) => {
                warn!(default, "invalid worker count (0), using default");
                default
            }
            Some(workers) => workers,
            None => default,
        }
    }
}
