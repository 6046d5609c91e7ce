//! Read-only lookups against the stored ledger.

use std::path::Path;

use amd_token_ledger::{AccountId, Amount};
use anyhow::Result;

use super::open;

pub fn balance(config_path: &Path, account: &AccountId) -> Result<()> {
    let (_, _, ledger) = open(config_path)?;
    println!("{}", ledger.balance_of(account));
    Ok(())
}

pub fn stake_of(config_path: &Path, account: &AccountId) -> Result<()> {
    let (_, _, ledger) = open(config_path)?;
    println!("{}", ledger.stake_of(account));
    Ok(())
}

pub fn excluded(config_path: &Path, account: &AccountId) -> Result<()> {
    let (_, _, ledger) = open(config_path)?;
    println!("{}", ledger.is_excluded(account));
    Ok(())
}

/// Preview the transfer split for a sender without changing state
pub fn calculate_tax(config_path: &Path, account: &AccountId, amount: Amount) -> Result<()> {
    let (_, _, ledger) = open(config_path)?;
    let split = ledger.calculate_tax(account, amount)?;
    println!("Final amount: {}", split.final_amount);
    println!("Tax amount:   {}", split.tax_amount);
    Ok(())
}
