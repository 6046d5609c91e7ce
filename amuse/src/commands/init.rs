use std::path::Path;

use amd_token_ledger::{AccountId, Ledger};
use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::Config;
use crate::store::StateStore;

/// Write a default config and mint the genesis ledger
pub fn run(config_path: &Path, owner: AccountId, force: bool) -> Result<()> {
    if Config::exists(config_path) && !force {
        bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::new(owner)?;
    let ledger = Ledger::from_genesis(config.genesis()?).context("Failed to build genesis ledger")?;

    config.save(config_path)?;
    let store = StateStore::new(config.state_path(config_path));
    let _lock = store.lock()?;
    store
        .save(&ledger)
        .with_context(|| format!("Failed to write ledger state to {}", store.path().display()))?;

    info!(owner = %ledger.owner(), "Initialized ledger");

    println!("Config:  {}", config_path.display());
    println!("State:   {}", store.path().display());
    println!("Owner:   {}", ledger.owner());
    println!(
        "Supply:  {} {}",
        ledger.total_supply(),
        ledger.token_info().symbol
    );

    Ok(())
}
