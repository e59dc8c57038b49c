//! Core ledger module
//!
//! This module contains the transactional ledger components:
//! - `router` - Raw identifier to account resolution
//! - `shard_store` - Durable per-account storage with an exclusive write transaction
//! - `processor` - Validate-and-commit state machine for credits and debits
//! - `statement` - Consistent point-in-time statement reads
//! - `retry` - Bounded retry with exponential backoff
//! - `bootstrap` - Data directory preparation, schema creation and seeding
//! - `ledger` - The service object owning all shards

pub mod bootstrap;
pub mod ledger;
pub mod processor;
pub mod retry;
pub mod router;
pub mod shard_store;
pub mod statement;

pub use bootstrap::bootstrap;
pub use ledger::Ledger;
pub use retry::{RetryFailure, RetryPolicy};
pub use shard_store::{ShardStore, WriteTransaction};
