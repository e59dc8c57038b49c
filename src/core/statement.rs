//! Statement reads
//!
//! A statement is a pure read served from the shard's reader pool. It never
//! waits on the shard's write transaction and observes either the state before
//! or after a concurrent commit, never anything in between.

use super::shard_store::ShardStore;
use crate::types::{LedgerResult, Statement, STATEMENT_LENGTH};
use chrono::Utc;

/// Build the current statement for the account owned by `store`
///
/// Contains the balance pair, the generation time and up to
/// [`STATEMENT_LENGTH`] most recent records, newest first.
#[tracing::instrument(level = "debug", skip_all, fields(account = %store.account()))]
pub async fn statement(store: &ShardStore) -> LedgerResult<Statement> {
    let (balance, transactions) = store.snapshot(STATEMENT_LENGTH).await?;
    Ok(Statement {
        balance,
        generated_at: Utc::now(),
        transactions,
    })
}
