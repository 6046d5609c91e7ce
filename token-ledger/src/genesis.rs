//! Token metadata and the initial distribution of supply.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::LedgerError;
use crate::tax::TaxConfig;

/// Default total supply in whole tokens.
pub const DEFAULT_TOTAL_SUPPLY: u64 = 20_000_000;

/// Default amount minted to the owner at genesis, in whole tokens.
pub const DEFAULT_OWNER_ALLOCATION: u64 = 14_000_000;

/// Default cashback interval (one day).
pub const DEFAULT_CASHBACK_INTERVAL_SECS: u64 = 86_400;

/// Name of the account holding the supply not minted to the owner.
pub const DEFAULT_RESERVE_ACCOUNT: &str = "reserve";

/// ERC20-style token metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Amount,
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            name: "Amuse Finance".to_string(),
            symbol: "AMD".to_string(),
            decimals: 18,
            total_supply: Amount::from_tokens(DEFAULT_TOTAL_SUPPLY),
        }
    }
}

/// A balance minted at genesis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    pub account: AccountId,
    pub amount: Amount,
}

/// Everything needed to construct a fresh ledger.
#[derive(Clone, Debug)]
pub struct Genesis {
    pub owner: AccountId,
    pub token: TokenInfo,
    pub tax: TaxConfig,
    pub allocations: Vec<Allocation>,
    pub cashback_interval_secs: u64,
}

impl Genesis {
    /// The default distribution: 14M to the owner, the remaining 6M to the
    /// reserve account.
    pub fn with_owner(owner: AccountId) -> Result<Self, LedgerError> {
        let token = TokenInfo::default();
        let owner_amount = Amount::from_tokens(DEFAULT_OWNER_ALLOCATION);
        let reserve_amount = token
            .total_supply
            .checked_sub(owner_amount)
            .ok_or_else(|| LedgerError::InvalidConfig("owner allocation exceeds supply".into()))?;
        let allocations = vec![
            Allocation {
                account: owner.clone(),
                amount: owner_amount,
            },
            Allocation {
                account: AccountId::new(DEFAULT_RESERVE_ACCOUNT)?,
                amount: reserve_amount,
            },
        ];
        Ok(Self {
            owner,
            token,
            tax: TaxConfig::default(),
            allocations,
            cashback_interval_secs: DEFAULT_CASHBACK_INTERVAL_SECS,
        })
    }

    /// Check the tax config and that allocations mint exactly the total supply.
    pub fn validate(&self) -> Result<(), LedgerError> {
        self.tax.validate()?;
        if self.token.decimals != 18 {
            return Err(LedgerError::InvalidConfig(format!(
                "token decimals must be 18, got {}",
                self.token.decimals
            )));
        }
        if self.cashback_interval_secs == 0 {
            return Err(LedgerError::InvalidConfig(
                "cashback interval must be positive".into(),
            ));
        }
        let minted = self
            .allocations
            .iter()
            .try_fold(Amount::ZERO, |sum, alloc| sum.checked_add(alloc.amount))
            .ok_or_else(|| LedgerError::InvalidConfig("allocations overflow".into()))?;
        if minted != self.token.total_supply {
            return Err(LedgerError::SupplyMismatch {
                expected: self.token.total_supply,
                accounted: minted,
            });
        }
        Ok(())
    }
}
