use std::path::Path;

use anyhow::Result;

use super::open;

/// List every known account with its balance, stake and exclusion flag
pub fn run(config_path: &Path) -> Result<()> {
    let (_, _, ledger) = open(config_path)?;

    println!("{:<24} {:>32} {:>32}  excluded", "account", "balance", "staked");
    for (id, state) in ledger.accounts() {
        println!(
            "{:<24} {:>32} {:>32}  {}",
            id.as_str(),
            state.balance.to_string(),
            ledger.stake_of(id).to_string(),
            state.excluded
        );
    }

    Ok(())
}
