//! CLI command implementations.
//!
//! These modules implement the user-facing CLI commands and legitimately
//! use stdout for output.

#![allow(clippy::print_stdout)]

pub mod accounts;
pub mod admin;
pub mod init;
pub mod query;
pub mod stake;
pub mod status;
pub mod transfer;

use std::path::Path;

use amd_token_ledger::{Event, Ledger, Output, Receipt, Transaction};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::store::StateStore;

/// Load the config and the ledger state it points at
pub(crate) fn open(config_path: &Path) -> Result<(Config, StateStore, Ledger)> {
    let (config, store) = open_store(config_path)?;
    let ledger = load_ledger(&config, &store)?;
    Ok((config, store, ledger))
}

fn open_store(config_path: &Path) -> Result<(Config, StateStore)> {
    let config =
        Config::load(config_path).context("No ledger configured. Run 'amuse init' first.")?;
    let store = StateStore::new(config.state_path(config_path));
    Ok((config, store))
}

fn load_ledger(config: &Config, store: &StateStore) -> Result<Ledger> {
    let ledger = store
        .load()
        .with_context(|| format!("Failed to load ledger state from {}", store.path().display()))?;

    if &config.tax != ledger.tax_config() || &config.token != ledger.token_info() {
        warn!(
            state = %store.path().display(),
            "Token and tax settings in the config differ from the ledger's; they only apply at init"
        );
    }
    Ok(ledger)
}

/// Apply one transaction and persist the result. Nothing is written when the
/// transaction is rejected.
pub(crate) fn submit(config_path: &Path, tx: Transaction) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let _lock = store.lock()?;
    let mut ledger = load_ledger(&config, &store)?;

    let receipt = ledger
        .apply(&tx)
        .with_context(|| format!("{} rejected", tx.operation.name()))?;

    store
        .save(&ledger)
        .with_context(|| format!("Failed to save ledger state to {}", store.path().display()))?;

    info!(op = tx.operation.name(), caller = %tx.caller, "Committed");
    print_receipt(&receipt);
    Ok(())
}

fn print_receipt(receipt: &Receipt) {
    match &receipt.output {
        Output::Transfer(split) => {
            println!("Received: {} AMD", split.final_amount);
            println!("Tax:      {} AMD", split.tax_amount);
        }
        Output::Stake(quote) => {
            println!("Staked:    {} AMD", quote.staked);
            println!("Stake tax: {} AMD", quote.stake_tax);
        }
        Output::Unstake(quote) => {
            println!("Returned:     {} AMD", quote.returned);
            println!("Unstake tax:  {} AMD", quote.unstake_tax);
            println!("Vault reward: {} AMD", quote.vault_reward);
        }
        Output::Unit => {}
    }

    for event in &receipt.events {
        println!("  {}", describe(event));
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::Transfer { from, to, amount } => format!("transfer {from} -> {to}: {amount}"),
        Event::TaxCollected { from, amount } => format!("tax from {from}: {amount}"),
        Event::ExclusionChanged { account, status } => format!("excluded {account}: {status}"),
        Event::VaultSet { vault } => format!("vault set to {vault}"),
        Event::CashbackIntervalSet { seconds } => format!("cashback interval set to {seconds}s"),
        Event::Staked {
            account,
            amount,
            staked,
        } => format!("stake by {account}: {amount} ({staked} staked)"),
        Event::Unstaked {
            account,
            amount,
            returned,
        } => format!("unstake by {account}: {amount} ({returned} returned)"),
    }
}
