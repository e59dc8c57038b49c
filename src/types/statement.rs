//! Statement snapshot type

use super::account::Balance;
use super::transaction::TransactionRecord;
use chrono::{DateTime, Utc};

/// Number of records included in a statement
pub const STATEMENT_LENGTH: usize = 10;

/// Point-in-time view of one account
///
/// `balance` and `transactions` always come from the same committed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Limit and balance at read time
    pub balance: Balance,

    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,

    /// Up to [`STATEMENT_LENGTH`] most recent records, newest first
    pub transactions: Vec<TransactionRecord>,
}
