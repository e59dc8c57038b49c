//! Transaction processing against a single shard
//!
//! This module holds the core state machine of the ledger:
//!
//! ```text
//! Idle -> ReadState -> Validate -> Commit | Abort -> Idle
//! ```
//!
//! The whole read-compute-validate-write sequence runs inside the shard's
//! exclusive write transaction, so no other writer on the same shard can
//! interleave. An error at any step drops the transaction, which rolls back
//! both the log append and the balance update.

use super::shard_store::ShardStore;
use crate::types::{
    Balance, LedgerError, LedgerResult, TransactionKind, TransactionRecord, TransactionRequest,
};
use chrono::Utc;
use tracing::debug;

/// Compute the balance that applying `kind`/`value` to `current` would produce
///
/// # Returns
///
/// * `Ok(i64)` - The candidate balance, which satisfies `candidate >= -limit`
/// * `Err(LedgerError::InsufficientFunds)` - The candidate would fall below `-limit`
/// * `Err(LedgerError::InvalidInput)` - The value is too large to represent the result
pub fn candidate_balance(
    account: u8,
    current: Balance,
    kind: TransactionKind,
    value: i64,
) -> LedgerResult<i64> {
    let candidate = match kind {
        TransactionKind::Credit => current.balance.checked_add(value),
        TransactionKind::Debit => current.balance.checked_sub(value),
    }
    .ok_or_else(|| LedgerError::invalid_input(format!("value {value} is out of range")))?;

    if candidate < -current.limit {
        return Err(LedgerError::insufficient_funds(
            account,
            current.balance,
            current.limit,
            value,
        ));
    }

    Ok(candidate)
}

/// Apply a validated request to `store` atomically
///
/// 1. Acquires the shard's exclusive write transaction
/// 2. Reads the current limit and balance
/// 3. Computes and checks the candidate balance
/// 4. Appends the record, stores the new balance and commits
///
/// # Returns
///
/// The post-commit `(limit, balance)` pair.
///
/// # Errors
///
/// * `LedgerError::InsufficientFunds` - Aborted without any mutation
/// * `LedgerError::StorageFailure` - Acquisition timeout or persistence error; rolled back
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(account = %store.account(), kind = %request.kind(), value = request.value())
)]
pub async fn apply(store: &ShardStore, request: &TransactionRequest) -> LedgerResult<Balance> {
    let mut tx = store.begin_write().await?;

    let current = tx.load_balance().await?;

    let balance = match candidate_balance(
        store.account().get(),
        current,
        request.kind(),
        request.value(),
    ) {
        Ok(balance) => balance,
        Err(error) => {
            // Dropping the transaction rolls it back
            drop(tx);
            debug!(balance = current.balance, limit = current.limit, "transaction rejected");
            return Err(error);
        }
    };

    let record = TransactionRecord {
        value: request.value(),
        kind: request.kind(),
        description: request.description().to_string(),
        occurred_at: Utc::now(),
    };
    tx.append(&record).await?;
    tx.store_balance(balance).await?;
    tx.commit().await?;

    debug!(balance, "transaction committed");

    Ok(Balance {
        limit: current.limit,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountId;
    use rstest::rstest;
    use std::time::Duration;
    use tempfile::TempDir;

    const LIMIT: i64 = 100_000;

    #[rstest]
    #[case::credit_from_zero(0, TransactionKind::Credit, 10, 10)]
    #[case::debit_from_zero(0, TransactionKind::Debit, 50_000, -50_000)]
    #[case::debit_to_exact_limit(-40_000, TransactionKind::Debit, 60_000, -100_000)]
    #[case::credit_while_negative(-50_000, TransactionKind::Credit, 10_000, -40_000)]
    fn test_candidate_balance_accepts(
        #[case] balance: i64,
        #[case] kind: TransactionKind,
        #[case] value: i64,
        #[case] expected: i64,
    ) {
        let current = Balance { limit: LIMIT, balance };
        assert_eq!(candidate_balance(1, current, kind, value).unwrap(), expected);
    }

    #[rstest]
    #[case::one_past_limit(0, 100_001)]
    #[case::scenario_four(-40_000, 70_000)]
    #[case::already_at_limit(-100_000, 1)]
    fn test_candidate_balance_rejects(#[case] balance: i64, #[case] value: i64) {
        let current = Balance { limit: LIMIT, balance };
        assert_eq!(
            candidate_balance(1, current, TransactionKind::Debit, value),
            Err(LedgerError::insufficient_funds(1, balance, LIMIT, value))
        );
    }

    #[test]
    fn test_candidate_balance_overflow_is_invalid_input() {
        let current = Balance { limit: LIMIT, balance: i64::MAX - 1 };
        let result = candidate_balance(1, current, TransactionKind::Credit, 10);
        assert!(matches!(result, Err(LedgerError::InvalidInput { .. })));
    }

    async fn seeded_store(dir: &TempDir) -> ShardStore {
        seeded_store_with_timeout(dir, Duration::from_secs(5)).await
    }

    async fn seeded_store_with_timeout(dir: &TempDir, write_timeout: Duration) -> ShardStore {
        let account = AccountId::try_from(1).unwrap();
        let store = ShardStore::open(dir.path(), account, write_timeout)
            .await
            .unwrap();
        store.initialize(LIMIT).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_apply_commits_record_and_balance() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let request = TransactionRequest::debit(50_000, "compra").unwrap();
        let result = apply(&store, &request).await.unwrap();

        assert_eq!(result, Balance { limit: LIMIT, balance: -50_000 });
        let (balance, records) = store.snapshot(10).await.unwrap();
        assert_eq!(balance, result);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "compra");
        assert_eq!(records[0].kind, TransactionKind::Debit);
    }

    #[tokio::test]
    async fn test_apply_rejection_leaves_state_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        apply(&store, &TransactionRequest::debit(40_000, "a").unwrap())
            .await
            .unwrap();

        let result = apply(&store, &TransactionRequest::debit(70_000, "b").unwrap()).await;

        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        let (balance, records) = store.snapshot(10).await.unwrap();
        assert_eq!(balance.balance, -40_000);
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_releases_write_transaction_after_rejection() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let rejected = apply(&store, &TransactionRequest::debit(LIMIT + 1, "x").unwrap()).await;
        assert!(rejected.is_err());

        // The next writer must not be stuck behind the aborted transaction
        let accepted = apply(&store, &TransactionRequest::debit(LIMIT, "x").unwrap()).await;
        assert_eq!(accepted.unwrap().balance, -LIMIT);
    }

    #[tokio::test]
    async fn test_apply_rejection_reports_insufficient_funds_exactly() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store_with_timeout(&dir, Duration::from_millis(200)).await;

        let result = apply(&store, &TransactionRequest::debit(LIMIT + 1, "x").unwrap()).await;

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(1, 0, LIMIT, LIMIT + 1))
        );
        let accepted = apply(&store, &TransactionRequest::credit(5, "y").unwrap()).await;
        assert_eq!(accepted.unwrap().balance, 5);
    }

    #[tokio::test]
    async fn test_apply_times_out_while_write_transaction_is_held() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store_with_timeout(&dir, Duration::from_millis(50)).await;
        let held = store.begin_write().await.unwrap();

        let result = apply(&store, &TransactionRequest::debit(10, "late").unwrap()).await;

        assert!(matches!(result, Err(LedgerError::StorageFailure { .. })));
        drop(held);
        let (balance, records) = store.snapshot(10).await.unwrap();
        assert_eq!(balance, Balance { limit: LIMIT, balance: 0 });
        assert!(records.is_empty());
    }
}
