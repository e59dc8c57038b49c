//! Ledger configuration
//!
//! `LedgerConfig` collects everything the core needs at start-up. It is built once
//! (usually from CLI arguments, see [`crate::cli::CliArgs::to_ledger_config`]) and
//! treated as read-only afterwards.

use crate::core::retry::RetryPolicy;
use crate::types::CreditLimits;
use std::path::PathBuf;
use std::time::Duration;

/// Default upper bound on waiting for a shard's write transaction
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(25);

/// Configuration consumed by [`crate::core::bootstrap::bootstrap`]
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Directory holding one database file per shard
    pub data_dir: PathBuf,

    /// How long a writer waits for the shard's exclusive write transaction
    pub write_timeout: Duration,

    /// Credit limit seeded into each shard on first start
    pub limits: CreditLimits,

    /// Retry policy for opening and seeding shards
    pub bootstrap_retry: RetryPolicy,

    /// Remove everything inside `data_dir` before opening the shards
    pub reset_data: bool,
}

impl LedgerConfig {
    /// Create a configuration for `data_dir` with default values elsewhere
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            limits: CreditLimits::default(),
            bootstrap_retry: RetryPolicy::default(),
            reset_data: false,
        }
    }

    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    pub fn with_limits(mut self, limits: CreditLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_bootstrap_retry(mut self, policy: RetryPolicy) -> Self {
        self.bootstrap_retry = policy;
        self
    }

    pub fn with_reset_data(mut self, reset_data: bool) -> Self {
        self.reset_data = reset_data;
        self
    }
}
