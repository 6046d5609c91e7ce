use std::path::Path;

use amd_token_ledger::{AccountId, Amount, Operation, Transaction};
use anyhow::Result;

use super::submit;

/// Send tokens, deducting the transfer tax unless the sender is excluded
pub fn run(config_path: &Path, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
    submit(config_path, Transaction::new(from, Operation::Transfer { to, amount }))
}
