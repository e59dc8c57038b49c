//! Durable per-account storage
//!
//! This module provides the `ShardStore` struct, which owns one account's balance
//! record and its append-only transaction log, backed by a dedicated SQLite file.
//!
//! # Design
//!
//! Each shard opens two connection pools against the same WAL-mode database:
//!
//! ```text
//! ShardStore
//!     ├── writer: SqlitePool (max 1 connection, acquire timeout = write timeout)
//!     └── reader: SqlitePool (several connections, snapshot reads)
//! ```
//!
//! The writer pool holds at most one connection, so at most one write transaction
//! can be in flight per shard. A second writer waits for the connection to come back
//! to the pool and gives up with `StorageFailure` once the write timeout elapses.
//! Callers never need their own lock around read-compute-write sequences.
//!
//! WAL mode lets readers run alongside the single writer. A read transaction sees
//! the last committed state as of its first query and never an uncommitted write.
//!
//! # Rollback
//!
//! [`WriteTransaction`] wraps a `sqlx::Transaction`. Dropping it without calling
//! [`WriteTransaction::commit`] rolls back everything done through it.

use crate::types::{AccountId, Balance, LedgerError, LedgerResult, TransactionRecord};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::Sqlite;
use std::path::{Path, PathBuf};
use std::time::Duration;

const READER_CONNECTIONS: u32 = 4;

const CREATE_ACCOUNT_TABLE: &str = "CREATE TABLE IF NOT EXISTS account (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    credit_limit INTEGER NOT NULL CHECK (credit_limit >= 0),
    balance INTEGER NOT NULL
)";

const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS transactions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    value INTEGER NOT NULL CHECK (value > 0),
    kind TEXT NOT NULL CHECK (kind IN ('c', 'd')),
    description TEXT NOT NULL,
    occurred_at TEXT NOT NULL
)";

const SEED_ACCOUNT: &str = "INSERT OR IGNORE INTO account (id, credit_limit, balance) VALUES (1, ?, 0)";

const SELECT_ACCOUNT: &str = "SELECT credit_limit, balance FROM account WHERE id = 1";

const UPDATE_BALANCE: &str = "UPDATE account SET balance = ? WHERE id = 1";

const INSERT_TRANSACTION: &str =
    "INSERT INTO transactions (value, kind, description, occurred_at) VALUES (?, ?, ?, ?)";

const SELECT_RECENT: &str =
    "SELECT value, kind, description, occurred_at FROM transactions ORDER BY seq DESC LIMIT ?";

const SELECT_HISTORY: &str =
    "SELECT value, kind, description, occurred_at FROM transactions ORDER BY seq ASC";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    credit_limit: i64,
    balance: i64,
}

impl From<AccountRow> for Balance {
    fn from(row: AccountRow) -> Self {
        Balance {
            limit: row.credit_limit,
            balance: row.balance,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    value: i64,
    kind: String,
    description: String,
    occurred_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|_| LedgerError::storage(format!("corrupt transaction kind '{}'", row.kind)))?;
        Ok(TransactionRecord {
            value: row.value,
            kind,
            description: row.description,
            occurred_at: row.occurred_at,
        })
    }
}

/// One account's isolated durable store
#[derive(Debug, Clone)]
pub struct ShardStore {
    account: AccountId,
    writer: SqlitePool,
    reader: SqlitePool,
}

impl ShardStore {
    /// Path of the database file backing `account` inside `data_dir`
    pub fn database_path(data_dir: &Path, account: AccountId) -> PathBuf {
        data_dir.join(format!("ledger-{account}.db"))
    }

    /// Open (creating if necessary) the database file for `account`
    ///
    /// The schema is not created here; see [`ShardStore::initialize`].
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Directory holding the shard files; must already exist
    /// * `account` - Account owned by this shard
    /// * `write_timeout` - Upper bound on waiting for the exclusive write transaction
    pub async fn open(
        data_dir: &Path,
        account: AccountId,
        write_timeout: Duration,
    ) -> LedgerResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(Self::database_path(data_dir, account))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(write_timeout);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(write_timeout)
            .connect_with(options.clone())
            .await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options)
            .await?;

        Ok(Self {
            account,
            writer,
            reader,
        })
    }

    /// Account owned by this shard
    pub fn account(&self) -> AccountId {
        self.account
    }

    /// Create the schema and seed the account row with `limit` and a zero balance
    ///
    /// Idempotent: an already-seeded row keeps its original limit and balance, and
    /// an existing transaction log is left untouched.
    pub async fn initialize(&self, limit: i64) -> LedgerResult<()> {
        let mut tx = self.begin_write().await?;
        sqlx::query(CREATE_ACCOUNT_TABLE)
            .execute(&mut *tx.inner)
            .await?;
        sqlx::query(CREATE_TRANSACTIONS_TABLE)
            .execute(&mut *tx.inner)
            .await?;
        sqlx::query(SEED_ACCOUNT)
            .bind(limit)
            .execute(&mut *tx.inner)
            .await?;
        tx.commit().await
    }

    /// Acquire the shard's exclusive write transaction
    ///
    /// Waits while another write transaction is in flight, up to the write timeout.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StorageFailure` if the timeout elapses or the
    /// transaction cannot be started.
    pub async fn begin_write(&self) -> LedgerResult<WriteTransaction> {
        let inner = self.writer.begin().await.map_err(|error| match error {
            sqlx::Error::PoolTimedOut => LedgerError::storage(format!(
                "timed out waiting for the write transaction of account {}",
                self.account
            )),
            other => other.into(),
        })?;
        Ok(WriteTransaction {
            account: self.account,
            inner,
        })
    }

    /// Read the balance pair and the `limit` newest records from one committed snapshot
    ///
    /// Records are returned newest first.
    pub async fn snapshot(&self, limit: usize) -> LedgerResult<(Balance, Vec<TransactionRecord>)> {
        let mut tx = self.reader.begin().await?;

        let balance = sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNT)
            .fetch_optional(&mut *tx)
            .await?
            .map(Balance::from)
            .ok_or_else(|| missing_account(self.account))?;

        let rows = sqlx::query_as::<_, TransactionRow>(SELECT_RECENT)
            .bind(limit as i64)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        let records = rows
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        Ok((balance, records))
    }

    /// Full transaction log in append order (oldest first)
    pub async fn history(&self) -> LedgerResult<Vec<TransactionRecord>> {
        sqlx::query_as::<_, TransactionRow>(SELECT_HISTORY)
            .fetch_all(&self.reader)
            .await?
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect()
    }

    /// Close both pools, waiting for in-flight work to finish
    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}

/// Exclusive write transaction on one shard
///
/// Rolls back on drop unless [`WriteTransaction::commit`] was called.
pub struct WriteTransaction {
    account: AccountId,
    inner: sqlx::Transaction<'static, Sqlite>,
}

impl WriteTransaction {
    /// Current limit and balance as seen inside this transaction
    pub async fn load_balance(&mut self) -> LedgerResult<Balance> {
        sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNT)
            .fetch_optional(&mut *self.inner)
            .await?
            .map(Balance::from)
            .ok_or_else(|| missing_account(self.account))
    }

    /// Append a record to the transaction log
    pub async fn append(&mut self, record: &TransactionRecord) -> LedgerResult<()> {
        sqlx::query(INSERT_TRANSACTION)
            .bind(record.value)
            .bind(record.kind.as_str())
            .bind(&record.description)
            .bind(record.occurred_at)
            .execute(&mut *self.inner)
            .await?;
        Ok(())
    }

    /// Overwrite the account balance
    pub async fn store_balance(&mut self, balance: i64) -> LedgerResult<()> {
        let result = sqlx::query(UPDATE_BALANCE)
            .bind(balance)
            .execute(&mut *self.inner)
            .await?;
        if result.rows_affected() == 0 {
            return Err(missing_account(self.account));
        }
        Ok(())
    }

    /// Make every change done through this transaction durable and visible
    pub async fn commit(self) -> LedgerResult<()> {
        self.inner.commit().await?;
        Ok(())
    }

    /// Discard every change done through this transaction
    pub async fn rollback(self) -> LedgerResult<()> {
        self.inner.rollback().await?;
        Ok(())
    }
}

fn missing_account(account: AccountId) -> LedgerError {
    LedgerError::storage(format!("account row missing for account {account}"))
}
