//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identifiers, credit limits and balances
//! - `transaction`: Transaction kinds, validated requests and log records
//! - `statement`: Statement snapshots
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod statement;
pub mod transaction;

pub use account::{AccountId, Balance, CreditLimits, ACCOUNT_COUNT};
pub use error::{LedgerError, LedgerResult};
pub use statement::{Statement, STATEMENT_LENGTH};
pub use transaction::{TransactionKind, TransactionRecord, TransactionRequest, DESCRIPTION_MAX_LEN};
