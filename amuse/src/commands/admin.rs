//! Owner-only configuration commands.

use std::path::Path;

use amd_token_ledger::{AccountId, Operation, Transaction};
use anyhow::Result;

use super::submit;

pub fn exclude(config_path: &Path, caller: AccountId, account: AccountId, status: bool) -> Result<()> {
    submit(config_path, Transaction::new(caller, Operation::Exclude { account, status }))
}

/// Register the vault account. The vault is excluded from taxes as a side effect.
pub fn set_vault(config_path: &Path, caller: AccountId, vault: AccountId) -> Result<()> {
    submit(config_path, Transaction::new(caller, Operation::SetVault { vault }))
}

pub fn set_cashback_interval(config_path: &Path, caller: AccountId, seconds: u64) -> Result<()> {
    submit(
        config_path,
        Transaction::new(caller, Operation::SetCashbackInterval { seconds }),
    )
}
