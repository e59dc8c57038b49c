//! Transaction-related types for the credit ledger
//!
//! This module defines the transaction kind, the validated request accepted by
//! the Transaction Processor and the immutable record appended to a shard's log.

use super::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Maximum description length, in bytes of UTF-8
pub const DESCRIPTION_MAX_LEN: usize = 10;

/// Direction of a transaction
///
/// Serialized as the single-letter tags used on the wire and in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    /// Adds the value to the balance
    #[serde(rename = "c")]
    Credit,

    /// Subtracts the value from the balance; subject to the credit limit
    #[serde(rename = "d")]
    Debit,
}

impl TransactionKind {
    /// The wire/log tag for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "c",
            TransactionKind::Debit => "d",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    /// Parse the exact tags `c` or `d`; anything else is invalid input
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "c" => Ok(TransactionKind::Credit),
            "d" => Ok(TransactionKind::Debit),
            other => Err(LedgerError::invalid_input(format!(
                "type must be 'c' or 'd', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed credit or debit that passed input validation
///
/// Fields are private so the only way to build one is [`TransactionRequest::new`],
/// which enforces the field constraints before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    value: i64,
    kind: TransactionKind,
    description: String,
}

impl TransactionRequest {
    /// Validate raw request fields
    ///
    /// # Arguments
    ///
    /// * `value` - Magnitude of the transaction; must be positive
    /// * `kind` - Raw type tag; must be exactly `c` or `d`
    /// * `description` - Free text of 1..=10 bytes
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` for a non-positive value, an unknown
    /// type tag, or a description that is empty or longer than ten bytes. A
    /// multibyte character counts once per byte of its UTF-8 encoding.
    pub fn new(value: i64, kind: &str, description: impl Into<String>) -> Result<Self, LedgerError> {
        if value <= 0 {
            return Err(LedgerError::invalid_input(format!(
                "value must be a positive integer, got {value}"
            )));
        }

        let kind = kind.parse::<TransactionKind>()?;

        let description = description.into();
        let length = description.len();
        if length == 0 || length > DESCRIPTION_MAX_LEN {
            return Err(LedgerError::invalid_input(format!(
                "description must have 1 to {DESCRIPTION_MAX_LEN} bytes, got {length}"
            )));
        }

        Ok(Self {
            value,
            kind,
            description,
        })
    }

    /// Build a credit request
    pub fn credit(value: i64, description: impl Into<String>) -> Result<Self, LedgerError> {
        Self::new(value, TransactionKind::Credit.as_str(), description)
    }

    /// Build a debit request
    pub fn debit(value: i64, description: impl Into<String>) -> Result<Self, LedgerError> {
        Self::new(value, TransactionKind::Debit.as_str(), description)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Committed entry of a shard's transaction log
///
/// Records are immutable once committed and are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Positive magnitude
    pub value: i64,

    /// Credit or debit
    pub kind: TransactionKind,

    /// Description supplied with the request
    pub description: String,

    /// Time the record was written
    pub occurred_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Value with its sign applied: credits positive, debits negative
    pub fn signed_value(&self) -> i64 {
        match self.kind {
            TransactionKind::Credit => self.value,
            TransactionKind::Debit => -self.value,
        }
    }
}
