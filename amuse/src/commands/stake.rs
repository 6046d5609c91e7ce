use std::path::Path;

use amd_token_ledger::{AccountId, Amount, Operation, Transaction};
use anyhow::Result;

use super::submit;

pub fn stake(config_path: &Path, account: AccountId, amount: Amount) -> Result<()> {
    submit(config_path, Transaction::new(account, Operation::Stake { amount }))
}

pub fn unstake(config_path: &Path, account: AccountId, amount: Amount) -> Result<()> {
    submit(config_path, Transaction::new(account, Operation::Unstake { amount }))
}
