//! Credit Ledger Library
//! # Overview
//!
//! A durable ledger for a fixed set of five accounts. Each account has a credit
//! limit and a signed balance that may never fall below the negated limit. Credits
//! and debits are validated and committed atomically, and a statement returns the
//! current balance with the ten most recent transactions.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (AccountId, Balance, TransactionRequest, Statement, errors)
//! - [`config`] - Start-up configuration
//! - [`cli`] - CLI and environment argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::router`] - Raw identifier to account resolution
//!   - [`core::shard_store`] - One SQLite database per account with an exclusive writer
//!   - [`core::processor`] - Credit and debit validation and commit
//!   - [`core::statement`] - Snapshot statement reads
//!   - [`core::bootstrap`] - Data directory preparation and seeding
//!   - [`core::ledger`] - The service object tying the above together
//! - [`http`] - JSON over HTTP binding
//! - [`telemetry`] - Structured logging setup
//!
//! # Transaction Types
//!
//! - **Credit** (`c`): adds the value to the balance, always accepted
//! - **Debit** (`d`): subtracts the value, rejected when the result would fall
//!   below `-limit`
//!
//! # Concurrency
//!
//! Operations on one account are serialized by that account's write
//! transaction. Different accounts never contend with each other.

pub mod cli;
pub mod config;
pub mod core;
pub mod http;
pub mod telemetry;
pub mod types;

pub use config::LedgerConfig;
pub use crate::core::{bootstrap, Ledger};
pub use types::{
    AccountId, Balance, CreditLimits, LedgerError, LedgerResult, Statement, TransactionKind,
    TransactionRecord, TransactionRequest,
};
