//! End-to-end integration tests
//!
//! These tests drive the public `Ledger` API against real databases in a
//! temporary directory. They cover:
//! - The worked example on account 1
//! - The credit limit boundary
//! - Conservation of the balance against the full transaction log
//! - Statement length and ordering
//! - Concurrent debits racing for the same credit
//! - Durability across a restart

#[cfg(test)]
mod tests {
    use credit_ledger::{
        bootstrap, AccountId, Balance, LedgerConfig, LedgerError, TransactionKind,
        TransactionRequest,
    };
    use rstest::rstest;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> LedgerConfig {
        LedgerConfig::new(dir.path()).with_write_timeout(Duration::from_secs(10))
    }

    fn account(id: i64) -> AccountId {
        AccountId::try_from(id).unwrap()
    }

    #[tokio::test]
    async fn test_example_scenarios() {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();

        assert_eq!(
            ledger.apply("1", 50_000, "d", "compra").await.unwrap(),
            Balance { limit: 100_000, balance: -50_000 }
        );
        assert_eq!(
            ledger.apply("1", 10_000, "c", "dep").await.unwrap(),
            Balance { limit: 100_000, balance: -40_000 }
        );

        let statement = ledger.statement("1").await.unwrap();
        assert_eq!(statement.balance.balance, -40_000);
        assert_eq!(statement.balance.limit, 100_000);
        let summary: Vec<_> = statement
            .transactions
            .iter()
            .map(|record| (record.value, record.kind, record.description.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (10_000, TransactionKind::Credit, "dep"),
                (50_000, TransactionKind::Debit, "compra"),
            ]
        );

        assert!(matches!(
            ledger.apply("1", 70_000, "d", "big").await,
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(ledger.statement("1").await.unwrap().balance.balance, -40_000);

        assert_eq!(
            ledger.statement("6").await.unwrap_err(),
            LedgerError::not_found(6)
        );
        assert!(matches!(
            ledger.statement("abc").await,
            Err(LedgerError::InvalidInput { .. })
        ));
    }

    #[rstest]
    #[case::account_1(1, 100_000)]
    #[case::account_2(2, 80_000)]
    #[case::account_3(3, 1_000_000)]
    #[case::account_4(4, 10_000_000)]
    #[case::account_5(5, 500_000)]
    #[tokio::test]
    async fn test_debit_to_exact_limit(#[case] id: i64, #[case] limit: i64) {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();
        let id = id.to_string();

        let over = ledger.apply(&id, limit + 1, "d", "over").await;
        assert!(matches!(over, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.statement(&id).await.unwrap().balance.balance, 0);

        let exact = ledger.apply(&id, limit, "d", "exact").await.unwrap();
        assert_eq!(exact, Balance { limit, balance: -limit });

        let one_more = ledger.apply(&id, 1, "d", "one").await;
        assert!(matches!(one_more, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.statement(&id).await.unwrap().balance.balance, -limit);
    }

    #[tokio::test]
    async fn test_balance_equals_sum_of_log() {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();

        let operations = [
            (500, "c"),
            (90_000, "d"),
            (20_000, "d"),
            (1_200, "c"),
            (11_000, "d"),
            (7, "d"),
            (3_000, "c"),
        ];
        for (value, kind) in operations {
            // Rejections are expected for some of these
            let _ = ledger.apply("2", value, kind, "mix").await;
        }

        let shard = ledger.shard(account(2));
        let history = shard.history().await.unwrap();
        let sum: i64 = history.iter().map(|record| record.signed_value()).sum();
        let statement = ledger.statement("2").await.unwrap();

        assert_eq!(statement.balance.balance, sum);
        assert!(statement.balance.within_limit());
        assert!(history.len() < operations.len());
    }

    #[tokio::test]
    async fn test_statement_keeps_ten_newest() {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();

        for value in 1..=15 {
            ledger.apply("3", value, "c", "n").await.unwrap();
        }

        let statement = ledger.statement("3").await.unwrap();
        let values: Vec<i64> = statement.transactions.iter().map(|r| r.value).collect();

        assert_eq!(values, (6..=15).rev().collect::<Vec<_>>());
        assert_eq!(statement.balance.balance, (1..=15).sum::<i64>());
    }

    #[tokio::test]
    async fn test_repeated_statements_are_identical() {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();
        ledger.apply("4", 42, "d", "once").await.unwrap();

        let first = ledger.statement("4").await.unwrap();
        let second = ledger.statement("4").await.unwrap();

        assert_eq!(first.balance, second.balance);
        assert_eq!(first.transactions, second.transactions);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_debits_respect_limit() {
        let dir = TempDir::new().unwrap();
        let ledger = Arc::new(bootstrap(&test_config(&dir)).await.unwrap());

        // 50 x 25_000 against a limit of 80_000
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move {
                    let request = TransactionRequest::debit(25_000, "race").unwrap();
                    ledger.apply_request(AccountId::try_from(2).unwrap(), &request).await
                })
            })
            .collect();

        let mut accepted = 0i64;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(balance) => {
                    assert!(balance.balance >= -balance.limit);
                    accepted += 1;
                }
                Err(LedgerError::InsufficientFunds { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        let statement = ledger.statement("2").await.unwrap();
        assert_eq!(accepted, 3);
        assert_eq!(statement.balance.balance, -25_000 * accepted);
        assert_eq!(
            ledger.shard(account(2)).history().await.unwrap().len() as i64,
            accepted
        );
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        {
            let ledger = bootstrap(&config).await.unwrap();
            ledger.apply("5", 1_000, "c", "salary").await.unwrap();
            ledger.apply("5", 300, "d", "rent").await.unwrap();
            ledger.close().await;
        }

        let ledger = bootstrap(&config).await.unwrap();
        let statement = ledger.statement("5").await.unwrap();

        assert_eq!(statement.balance, Balance { limit: 500_000, balance: 700 });
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(statement.transactions[0].description, "rent");
        assert_eq!(statement.transactions[1].description, "salary");
    }

    #[rstest]
    #[case::empty_description("1", 10, "c", "")]
    #[case::eleven_chars("1", 10, "c", "abcdefghijk")]
    #[case::zero_value("1", 0, "d", "x")]
    #[case::negative_value("1", -5, "c", "x")]
    #[case::unknown_kind("1", 10, "C", "x")]
    #[case::non_numeric_id("one", 10, "c", "x")]
    #[tokio::test]
    async fn test_invalid_requests_change_nothing(
        #[case] id: &str,
        #[case] value: i64,
        #[case] kind: &str,
        #[case] description: &str,
    ) {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();

        let result = ledger.apply(id, value, kind, description).await;

        assert!(matches!(result, Err(LedgerError::InvalidInput { .. })));
        assert!(ledger.shard(account(1)).history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_description_length_counts_bytes() {
        let dir = TempDir::new().unwrap();
        let ledger = bootstrap(&test_config(&dir)).await.unwrap();

        // Ten characters but twenty bytes
        let too_long = ledger.apply("1", 1, "c", "ãããããããããã").await;
        assert!(matches!(too_long, Err(LedgerError::InvalidInput { .. })));

        let eleven_bytes = ledger.apply("1", 1, "c", "abcdefghiã").await;
        assert!(matches!(eleven_bytes, Err(LedgerError::InvalidInput { .. })));
        assert!(ledger.shard(account(1)).history().await.unwrap().is_empty());

        ledger.apply("1", 1, "c", "ããããã").await.unwrap();

        let statement = ledger.statement("1").await.unwrap();
        assert_eq!(statement.transactions.len(), 1);
        assert_eq!(statement.transactions[0].description, "ããããã");
    }
}
