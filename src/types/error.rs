//! Error types for the credit ledger
//!
//! This module defines every failure the ledger core can surface. The variants
//! map one-to-one onto the way a caller is expected to react to them.
//!
//! # Error Categories
//!
//! - **Client rejections**: malformed identifiers or bodies, field constraint
//!   violations, unknown accounts, and debits that would breach the credit limit.
//!   Nothing is written when one of these is returned.
//! - **Storage failures**: write-transaction acquisition timeouts, I/O errors and
//!   unexpected persistence errors. Any in-flight transaction is rolled back.
//! - **Bootstrap failures**: fatal; the process must not start serving traffic.

use thiserror::Error;

/// Main error type for the ledger
///
/// Each variant includes enough context to produce a useful log line. Variants
/// hold owned strings and integers only, so the error is cheap to clone and can
/// be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Malformed identifier, malformed body or a field constraint violation
    ///
    /// Detected before any store access; no mutation is attempted.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong with the input
        message: String,
    },

    /// Identifier parsed as an integer but names no account
    #[error("Account {id} not found")]
    NotFound {
        /// The identifier exactly as it was parsed
        id: i64,
    },

    /// Applying the debit would drive the balance below `-limit`
    ///
    /// The write transaction is aborted before any mutation, so neither the
    /// balance nor the transaction log changes.
    #[error(
        "Insufficient funds for account {account}: balance {balance}, limit {limit}, requested {requested}"
    )]
    InsufficientFunds {
        /// Account the debit was attempted against
        account: u8,
        /// Balance observed inside the write transaction
        balance: i64,
        /// Credit limit of the account
        limit: i64,
        /// Magnitude of the rejected debit
        requested: i64,
    },

    /// Write-transaction acquisition timeout, I/O error or unexpected persistence error
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the underlying failure
        message: String,
    },

    /// Schema creation or seeding did not succeed within the retry budget
    #[error("Bootstrap failed after {attempts} attempt(s): {message}")]
    Bootstrap {
        /// Number of attempts made before giving up
        attempts: u32,
        /// The last error observed
        message: String,
    },
}

/// Result type alias used throughout the crate
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<sqlx::Error> for LedgerError {
    fn from(error: sqlx::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: i64) -> Self {
        LedgerError::NotFound { id }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: u8, balance: i64, limit: i64, requested: i64) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            limit,
            requested,
        }
    }

    /// Create a StorageFailure error
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Create a Bootstrap error
    pub fn bootstrap(attempts: u32, message: impl Into<String>) -> Self {
        LedgerError::Bootstrap {
            attempts,
            message: message.into(),
        }
    }

    /// Whether retrying the same operation could succeed
    ///
    /// Only storage failures are transient; every other variant is a property of
    /// the input or of the account state and would fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::StorageFailure { .. })
    }

    /// Whether the error is a rejection of the caller's request rather than a server fault
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidInput { .. }
                | LedgerError::NotFound { .. }
                | LedgerError::InsufficientFunds { .. }
        )
    }
}
