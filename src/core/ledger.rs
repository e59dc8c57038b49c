//! The ledger service object
//!
//! `Ledger` owns the five shard stores and is the entry point request handlers
//! call into. It is shared by reference (usually behind an `Arc`) rather than
//! reached through global state.
//!
//! # Architecture
//!
//! ```text
//! Ledger
//!     └── [ShardStore; 5]   (indexed by AccountId::index)
//!
//! apply:     router::resolve -> TransactionRequest::new -> processor::apply
//! statement: router::resolve -> statement::statement
//! ```
//!
//! Shards are fully independent: operations on different accounts never wait
//! on each other.

use super::shard_store::ShardStore;
use super::{processor, router, statement};
use crate::types::{
    AccountId, Balance, LedgerError, LedgerResult, Statement, TransactionRequest, ACCOUNT_COUNT,
};
use tracing::{debug, error};

/// Balance and transaction log of every account
#[derive(Debug)]
pub struct Ledger {
    shards: [ShardStore; ACCOUNT_COUNT],
}

impl Ledger {
    /// Create a ledger from already-opened shards
    ///
    /// `shards[i]` must own the account whose index is `i`.
    pub fn new(shards: [ShardStore; ACCOUNT_COUNT]) -> Self {
        debug_assert!(shards
            .iter()
            .enumerate()
            .all(|(index, shard)| shard.account().index() == index));
        Self { shards }
    }

    /// Store owning `account`
    pub fn shard(&self, account: AccountId) -> &ShardStore {
        &self.shards[account.index()]
    }

    /// Record a transaction from raw request fields
    ///
    /// The identifier is resolved first, then the fields are validated; both
    /// happen before any store access.
    ///
    /// # Arguments
    ///
    /// * `raw_id` - Account identifier as received
    /// * `value` - Magnitude; must be positive
    /// * `kind` - `c` for credit or `d` for debit
    /// * `description` - 1 to 10 characters
    ///
    /// # Returns
    ///
    /// The post-commit `(limit, balance)` pair.
    pub async fn apply(
        &self,
        raw_id: &str,
        value: i64,
        kind: &str,
        description: &str,
    ) -> LedgerResult<Balance> {
        let account = router::resolve(raw_id)?;
        let request = TransactionRequest::new(value, kind, description)?;
        self.apply_request(account, &request).await
    }

    /// Record an already-validated transaction
    pub async fn apply_request(
        &self,
        account: AccountId,
        request: &TransactionRequest,
    ) -> LedgerResult<Balance> {
        let result = processor::apply(self.shard(account), request).await;
        log_outcome(account, "apply", &result);
        result
    }

    /// Current statement of the account named by `raw_id`
    pub async fn statement(&self, raw_id: &str) -> LedgerResult<Statement> {
        let account = router::resolve(raw_id)?;
        self.statement_for(account).await
    }

    /// Current statement of `account`
    pub async fn statement_for(&self, account: AccountId) -> LedgerResult<Statement> {
        let result = statement::statement(self.shard(account)).await;
        log_outcome(account, "statement", &result);
        result
    }

    /// Close every shard's connection pools
    pub async fn close(&self) {
        for shard in &self.shards {
            shard.close().await;
        }
    }
}

fn log_outcome<T>(account: AccountId, operation: &'static str, result: &Result<T, LedgerError>) {
    match result {
        Err(err) if err.is_rejection() => debug!(%account, operation, %err, "request rejected"),
        Err(err) => error!(%account, operation, %err, "ledger operation failed"),
        Ok(_) => {}
    }
}
