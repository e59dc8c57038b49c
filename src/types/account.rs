//! Account-related types for the credit ledger
//!
//! This module defines the bounded account identifier, the static credit-limit
//! table and the `(limit, balance)` pair returned by every successful write.

use super::error::LedgerError;
use serde::Serialize;
use std::fmt;

/// Number of accounts served by the ledger
pub const ACCOUNT_COUNT: usize = 5;

/// Validated account identifier (1..=5)
///
/// An `AccountId` can only be obtained through [`TryFrom<i64>`] or [`AccountId::all`],
/// so holding one proves the identifier names an existing shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(u8);

impl AccountId {
    /// Iterate over every account identifier in ascending order
    pub fn all() -> impl Iterator<Item = AccountId> {
        (1..=ACCOUNT_COUNT as u8).map(AccountId)
    }

    /// The one-based identifier as seen by callers
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based shard index
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl TryFrom<i64> for AccountId {
    type Error = LedgerError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        if (1..=ACCOUNT_COUNT as i64).contains(&id) {
            Ok(AccountId(id as u8))
        } else {
            Err(LedgerError::not_found(id))
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static `{id -> limit}` table
///
/// Built once at start-up and only read afterwards. Each shard is seeded with
/// the limit listed here the first time its store is created; later changes to
/// the table do not alter already-seeded shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditLimits {
    limits: [i64; ACCOUNT_COUNT],
}

impl CreditLimits {
    /// Create a table from explicit limits, indexed by `id - 1`
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidInput` if any limit is negative.
    pub fn new(limits: [i64; ACCOUNT_COUNT]) -> Result<Self, LedgerError> {
        if let Some(position) = limits.iter().position(|limit| *limit < 0) {
            return Err(LedgerError::invalid_input(format!(
                "credit limit for account {} must be non-negative, got {}",
                position + 1,
                limits[position]
            )));
        }
        Ok(Self { limits })
    }

    /// Credit limit for the given account
    pub fn limit_for(&self, account: AccountId) -> i64 {
        self.limits[account.index()]
    }
}

impl Default for CreditLimits {
    fn default() -> Self {
        Self {
            limits: [100_000, 80_000, 1_000_000, 10_000_000, 500_000],
        }
    }
}

/// Current credit limit and balance of one account
///
/// Returned by a committed write and embedded in every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Immutable credit limit (non-negative)
    pub limit: i64,

    /// Signed balance; never below `-limit`
    pub balance: i64,
}

impl Balance {
    /// Whether the pair satisfies `balance + limit >= 0`
    pub fn within_limit(&self) -> bool {
        self.balance >= -self.limit
    }
}
