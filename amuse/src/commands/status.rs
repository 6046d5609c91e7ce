use std::path::Path;

use anyhow::Result;

use super::open;

/// Show token metadata, tax settings and ledger totals
pub fn run(config_path: &Path) -> Result<()> {
    let (_, store, ledger) = open(config_path)?;
    let info = ledger.token_info();
    let tax = ledger.tax_config();
    let totals = ledger.totals()?;

    println!();
    println!("=== {} ({}) ===", info.name, info.symbol);
    println!("Decimals:      {}", info.decimals);
    println!("Total supply:  {}", info.total_supply);
    println!("Owner:         {}", ledger.owner());
    match ledger.vault_address() {
        Some(vault) => println!("Vault:         {vault}"),
        None => println!("Vault:         (not set)"),
    }
    println!("Cashback:      every {}s", ledger.cashback_interval());
    println!();
    println!("=== Taxes ===");
    println!("Transfer:      {}%", tax.tax_percentage);
    println!("Stake:         {}/{}", tax.stake_tax_percentage, tax.stake_divisor);
    println!(
        "Unstake:       {}/{}",
        tax.unstake_tax_percentage, tax.stake_divisor
    );
    println!(
        "Vault reward:  {}/{} of {:?} amount",
        tax.vault_reward_percentage, tax.vault_reward_divisor, tax.vault_reward_base
    );
    println!();
    println!("=== Totals ===");
    println!("Balances:      {}", totals.balances);
    println!("Staked:        {}", totals.staked);
    println!("Rewards pool:  {}", totals.rewards_pool);
    println!();
    println!("State file:    {}", store.path().display());

    Ok(())
}
