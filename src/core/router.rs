//! Account identifier routing
//!
//! Maps an externally supplied identifier to the shard that owns the account.
//! This is the only place where raw identifiers are parsed; everything past the
//! router works with [`AccountId`].

use crate::types::{AccountId, LedgerError};

/// Resolve a raw identifier string to an account
///
/// # Arguments
///
/// * `raw` - Identifier exactly as received from the caller
///
/// # Returns
///
/// * `Ok(AccountId)` - The identifier names one of the five accounts
/// * `Err(LedgerError::InvalidInput)` - The identifier is not an integer
/// * `Err(LedgerError::NotFound)` - The identifier is an integer outside `[1, 5]`
pub fn resolve(raw: &str) -> Result<AccountId, LedgerError> {
    let id = raw
        .parse::<i64>()
        .map_err(|_| LedgerError::invalid_input(format!("account id '{raw}' is not an integer")))?;
    AccountId::try_from(id)
}
