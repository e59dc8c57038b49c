//! Request and response bodies of the HTTP binding

use crate::types::{Statement, TransactionKind, TransactionRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a record-transaction request
///
/// The Portuguese field names used by existing clients are accepted as aliases.
/// `type` is kept as a raw string so an unknown tag is reported by the ledger's
/// own validation rather than as a decoding failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionBody {
    #[serde(alias = "valor")]
    pub value: i64,

    #[serde(rename = "type", alias = "tipo")]
    pub kind: String,

    #[serde(alias = "descricao")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementResponse {
    pub balance: StatementBalance,
    pub last_transactions: Vec<TransactionEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementBalance {
    pub limit: i64,
    pub total: i64,
    pub statement_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionEntry {
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub completed_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionEntry {
    fn from(record: TransactionRecord) -> Self {
        Self {
            value: record.value,
            kind: record.kind,
            description: record.description,
            completed_at: record.occurred_at,
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            balance: StatementBalance {
                limit: statement.balance.limit,
                total: statement.balance.balance,
                statement_date: statement.generated_at,
            },
            last_transactions: statement
                .transactions
                .into_iter()
                .map(TransactionEntry::from)
                .collect(),
        }
    }
}
