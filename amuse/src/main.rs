use std::path::PathBuf;

use amd_token_ledger::{AccountId, Amount};
use anyhow::Result;
use clap::{Parser, Subcommand};

use amuse::{commands, config, logging};

#[derive(Parser)]
#[command(name = "amuse")]
#[command(about = "Taxed token ledger with a staking vault", long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.amuse/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config and mint the genesis ledger
    Init {
        /// Owner account, the only caller allowed to change settings
        #[arg(long, default_value = "deployer")]
        owner: AccountId,

        /// Overwrite an existing config and state
        #[arg(long)]
        force: bool,
    },

    /// Show token, tax and ledger totals
    Status,

    /// List all accounts
    Accounts,

    /// Show an account's spendable balance
    Balance { account: AccountId },

    /// Show an account's staked amount
    StakeOf { account: AccountId },

    /// Show whether an account is excluded from taxes
    Excluded { account: AccountId },

    /// Preview the tax on a transfer sent by an account
    CalculateTax { account: AccountId, amount: Amount },

    /// Send tokens to another account
    Transfer {
        /// Sending account
        #[arg(long)]
        from: AccountId,

        /// Recipient account
        to: AccountId,

        /// Amount in AMD (up to 18 decimals)
        amount: Amount,
    },

    /// Add or remove an account from the tax exclusion list (owner only)
    Exclude {
        #[arg(long)]
        caller: AccountId,

        account: AccountId,

        #[arg(action = clap::ArgAction::Set)]
        status: bool,
    },

    /// Register the vault account (owner only)
    SetVault {
        #[arg(long)]
        caller: AccountId,

        vault: AccountId,
    },

    /// Set the cashback claim interval in seconds (owner only)
    SetCashbackInterval {
        #[arg(long)]
        caller: AccountId,

        seconds: u64,
    },

    /// Lock tokens in the vault
    Stake { account: AccountId, amount: Amount },

    /// Withdraw staked tokens from the vault
    Unstake { account: AccountId, amount: Amount },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    match cli.command {
        Commands::Init { owner, force } => commands::init::run(&config_path, owner, force),
        Commands::Status => commands::status::run(&config_path),
        Commands::Accounts => commands::accounts::run(&config_path),
        Commands::Balance { account } => commands::query::balance(&config_path, &account),
        Commands::StakeOf { account } => commands::query::stake_of(&config_path, &account),
        Commands::Excluded { account } => commands::query::excluded(&config_path, &account),
        Commands::CalculateTax { account, amount } => {
            commands::query::calculate_tax(&config_path, &account, amount)
        }
        Commands::Transfer { from, to, amount } => {
            commands::transfer::run(&config_path, from, to, amount)
        }
        Commands::Exclude {
            caller,
            account,
            status,
        } => commands::admin::exclude(&config_path, caller, account, status),
        Commands::SetVault { caller, vault } => {
            commands::admin::set_vault(&config_path, caller, vault)
        }
        Commands::SetCashbackInterval { caller, seconds } => {
            commands::admin::set_cashback_interval(&config_path, caller, seconds)
        }
        Commands::Stake { account, amount } => commands::stake::stake(&config_path, account, amount),
        Commands::Unstake { account, amount } => {
            commands::stake::unstake(&config_path, account, amount)
        }
    }
}
