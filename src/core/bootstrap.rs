//! Process start-up for the ledger core
//!
//! Prepares the data directory, opens all five shards concurrently and makes
//! sure each one holds exactly one seeded account row before any request is
//! served. Each shard is opened under the configured [`RetryPolicy`]; running
//! out of attempts is fatal.
//!
//! [`RetryPolicy`]: super::retry::RetryPolicy

use super::ledger::Ledger;
use super::shard_store::ShardStore;
use crate::config::LedgerConfig;
use crate::types::{AccountId, LedgerError, LedgerResult, ACCOUNT_COUNT};
use futures::future::try_join_all;
use std::path::Path;
use tracing::info;

/// Build a ready-to-serve [`Ledger`] from `config`
///
/// # Errors
///
/// * `LedgerError::Bootstrap` - The data directory could not be prepared, or a
///   shard could not be opened or seeded in time
pub async fn bootstrap(config: &LedgerConfig) -> LedgerResult<Ledger> {
    prepare_data_dir(config).await.map_err(|err| {
        LedgerError::bootstrap(
            1,
            format!("data directory {}: {err}", config.data_dir.display()),
        )
    })?;

    let shards = try_join_all(AccountId::all().map(|account| open_shard(config, account))).await?;
    let shards: [ShardStore; ACCOUNT_COUNT] = shards
        .try_into()
        .map_err(|_| LedgerError::bootstrap(1, "unexpected number of shards"))?;

    info!(
        data_dir = %config.data_dir.display(),
        write_timeout_ms = config.write_timeout.as_millis() as u64,
        "ledger ready"
    );

    Ok(Ledger::new(shards))
}

async fn prepare_data_dir(config: &LedgerConfig) -> LedgerResult<()> {
    if config.reset_data {
        clear_data_dir(&config.data_dir).await?;
    }
    tokio::fs::create_dir_all(&config.data_dir).await?;
    Ok(())
}

async fn open_shard(config: &LedgerConfig, account: AccountId) -> LedgerResult<ShardStore> {
    let limit = config.limits.limit_for(account);

    config
        .bootstrap_retry
        .run("bootstrap shard", || async move {
            let store = ShardStore::open(&config.data_dir, account, config.write_timeout).await?;
            store.initialize(limit).await?;
            Ok::<_, LedgerError>(store)
        })
        .await
        .map_err(|failure| {
            LedgerError::bootstrap(
                failure.attempts,
                format!("account {account}: {}", failure.error),
            )
        })
}

/// Remove every entry inside `dir`, keeping the directory itself
async fn clear_data_dir(dir: &Path) -> LedgerResult<()> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
    }

    info!(data_dir = %dir.display(), "data directory cleared");
    Ok(())
}
