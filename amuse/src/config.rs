use std::fs;
use std::path::{Path, PathBuf};

use amd_token_ledger::{AccountId, Allocation, Genesis, TaxConfig, TokenInfo};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the ledger state file, stored next to the config by default.
pub const STATE_FILE_NAME: &str = "ledger.json";

/// Main configuration for an Amuse ledger
///
/// `token`, `tax` and `genesis` are read once by `amuse init` to mint the
/// ledger. Afterwards the ledger state file holds its own copy, and edits to
/// these sections have no effect until the ledger is re-initialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the ledger state lives (default: `ledger.json` beside the config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub token: TokenInfo,

    #[serde(default)]
    pub tax: TaxConfig,

    pub genesis: GenesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Owner account; the only caller allowed to run privileged operations
    pub owner: AccountId,

    /// Seconds between cashback claims
    #[serde(default = "default_cashback_interval")]
    pub cashback_interval_secs: u64,

    /// Initial balances. Empty means the default split between the owner and
    /// the reserve account.
    #[serde(default)]
    pub allocations: Vec<Allocation>,
}

fn default_cashback_interval() -> u64 {
    amd_token_ledger::genesis::DEFAULT_CASHBACK_INTERVAL_SECS
}

impl Config {
    /// Create a config with default token, tax and genesis settings
    pub fn new(owner: AccountId) -> Result<Self> {
        let genesis = Genesis::with_owner(owner.clone())?;
        Ok(Self {
            state_file: None,
            token: genesis.token,
            tax: genesis.tax,
            genesis: GenesisConfig {
                owner,
                cashback_interval_secs: genesis.cashback_interval_secs,
                allocations: genesis.allocations,
            },
        })
    }

    /// Build and validate the genesis described by this config
    pub fn genesis(&self) -> Result<Genesis> {
        let allocations = if self.genesis.allocations.is_empty() {
            Genesis::with_owner(self.genesis.owner.clone())?.allocations
        } else {
            self.genesis.allocations.clone()
        };
        let genesis = Genesis {
            owner: self.genesis.owner.clone(),
            token: self.token.clone(),
            tax: self.tax.clone(),
            allocations,
            cashback_interval_secs: self.genesis.cashback_interval_secs,
        };
        genesis.validate().context("Invalid genesis configuration")?;
        Ok(genesis)
    }

    /// Resolve the state file path for a config stored at `config_path`
    pub fn state_path(&self, config_path: &Path) -> PathBuf {
        match &self.state_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_dir(config_path).join(path),
            None => config_dir(config_path).join(STATE_FILE_NAME),
        }
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config
            .tax
            .validate()
            .with_context(|| format!("Invalid tax settings in {}", path.display()))?;

        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
}

fn config_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Get the default data directory (`~/.amuse`)
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".amuse"))
        .ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("config.toml"))
}
