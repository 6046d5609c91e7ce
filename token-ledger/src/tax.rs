// Copyright (c) 2024 Amuse Finance

//! Tax calculation for transfers, stakes and unstakes.
//!
//! Every tax is a fraction `percentage / divisor` of an amount, evaluated in
//! integer base units and truncated toward zero:
//!
//! | Operation | Rate                                             | Default |
//! |-----------|--------------------------------------------------|---------|
//! | Transfer  | `tax_percentage / 100`                           | 10%     |
//! | Stake     | `stake_tax_percentage / stake_divisor`           | 5%      |
//! | Unstake   | `unstake_tax_percentage / stake_divisor`         | 10%     |
//! | Unstake   | `+ vault_reward_percentage / vault_reward_divisor` | 1%    |
//!
//! Excluded accounts pay none of them. All proceeds go to the rewards pool.
//!
//! ## Unstake composition
//!
//! The vault reward cut is taken either from the gross unstaked amount
//! ([`VaultRewardBase::Gross`], the default) or from the amount left after
//! the unstake tax ([`VaultRewardBase::Net`]):
//!
//! ```text
//! Gross: deduction = amount × 10% + amount × 1%            (20 → 2.2)
//! Net:   deduction = amount × 10% + (amount × 90%) × 1%    (20 → 2.18)
//! ```

use crate::amount::Amount;
use crate::error::LedgerError;

/// Fixed divisor for the transfer tax percentage.
pub const TAX_DIVISOR: u64 = 100;

/// Which amount the vault reward percentage applies to on unstake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VaultRewardBase {
    /// The full unstaked amount.
    #[default]
    Gross,
    /// The unstaked amount minus the unstake tax.
    Net,
}

/// Global tax parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TaxConfig {
    /// Transfer tax, out of [`TAX_DIVISOR`].
    pub tax_percentage: u64,
    pub stake_tax_percentage: u64,
    pub unstake_tax_percentage: u64,
    /// Divisor shared by the stake and unstake percentages.
    pub stake_divisor: u64,
    pub vault_reward_percentage: u64,
    pub vault_reward_divisor: u64,
    pub vault_reward_base: VaultRewardBase,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            tax_percentage: 10,
            stake_tax_percentage: 5,
            unstake_tax_percentage: 10,
            stake_divisor: 100,
            vault_reward_percentage: 1,
            vault_reward_divisor: 100,
            vault_reward_base: VaultRewardBase::Gross,
        }
    }
}

/// Result of splitting a transfer amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxSplit {
    /// Amount delivered to the recipient.
    pub final_amount: Amount,
    /// Amount diverted to the rewards pool.
    pub tax_amount: Amount,
}

/// Breakdown of a stake operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeQuote {
    /// Amount debited from the balance.
    pub amount: Amount,
    /// Amount credited to the stake record.
    pub staked: Amount,
    pub stake_tax: Amount,
}

/// Breakdown of an unstake operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnstakeQuote {
    /// Amount debited from the stake record.
    pub amount: Amount,
    /// Amount credited back to the balance.
    pub returned: Amount,
    pub unstake_tax: Amount,
    pub vault_reward: Amount,
}

impl UnstakeQuote {
    /// Total credited to the rewards pool.
    pub fn total_deduction(&self) -> Amount {
        // Both parts are carved out of `amount`, so this cannot overflow.
        Amount::from_base_units(self.unstake_tax.base_units() + self.vault_reward.base_units())
    }
}

impl TaxConfig {
    /// Check that every percentage/divisor pair is a fraction in [0, 1].
    pub fn validate(&self) -> Result<(), LedgerError> {
        let pairs = [
            ("tax_percentage", self.tax_percentage, TAX_DIVISOR),
            ("stake_tax_percentage", self.stake_tax_percentage, self.stake_divisor),
            ("unstake_tax_percentage", self.unstake_tax_percentage, self.stake_divisor),
            (
                "vault_reward_percentage",
                self.vault_reward_percentage,
                self.vault_reward_divisor,
            ),
        ];
        for (name, percentage, divisor) in pairs {
            if divisor == 0 {
                return Err(LedgerError::InvalidConfig(format!(
                    "divisor for {name} must be non-zero"
                )));
            }
            if percentage > divisor {
                return Err(LedgerError::InvalidConfig(format!(
                    "{name} {percentage}/{divisor} exceeds 100%"
                )));
            }
        }
        // Gross composition takes both cuts from the same amount; together
        // they must still fit inside it.
        if self.vault_reward_base == VaultRewardBase::Gross {
            let combined = u128::from(self.unstake_tax_percentage)
                * u128::from(self.vault_reward_divisor)
                + u128::from(self.vault_reward_percentage) * u128::from(self.stake_divisor);
            let whole = u128::from(self.stake_divisor) * u128::from(self.vault_reward_divisor);
            if combined > whole {
                return Err(LedgerError::InvalidConfig(
                    "unstake tax plus vault reward exceeds 100%".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Split a transfer amount into what the recipient receives and the tax.
    pub fn calculate_tax(&self, excluded: bool, amount: Amount) -> Result<TaxSplit, LedgerError> {
        if excluded {
            return Ok(TaxSplit {
                final_amount: amount,
                tax_amount: Amount::ZERO,
            });
        }
        let tax_amount = portion(amount, self.tax_percentage, TAX_DIVISOR)?;
        Ok(TaxSplit {
            final_amount: remainder(amount, tax_amount)?,
            tax_amount,
        })
    }

    pub fn quote_stake(&self, excluded: bool, amount: Amount) -> Result<StakeQuote, LedgerError> {
        let stake_tax = if excluded {
            Amount::ZERO
        } else {
            portion(amount, self.stake_tax_percentage, self.stake_divisor)?
        };
        Ok(StakeQuote {
            amount,
            staked: remainder(amount, stake_tax)?,
            stake_tax,
        })
    }

    pub fn quote_unstake(
        &self,
        excluded: bool,
        amount: Amount,
    ) -> Result<UnstakeQuote, LedgerError> {
        if excluded {
            return Ok(UnstakeQuote {
                amount,
                returned: amount,
                unstake_tax: Amount::ZERO,
                vault_reward: Amount::ZERO,
            });
        }
        let unstake_tax = portion(amount, self.unstake_tax_percentage, self.stake_divisor)?;
        let reward_base = match self.vault_reward_base {
            VaultRewardBase::Gross => amount,
            VaultRewardBase::Net => remainder(amount, unstake_tax)?,
        };
        let vault_reward = portion(
            reward_base,
            self.vault_reward_percentage,
            self.vault_reward_divisor,
        )?;
        let deduction = unstake_tax
            .checked_add(vault_reward)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} overflows")))?;
        Ok(UnstakeQuote {
            amount,
            returned: remainder(amount, deduction)?,
            unstake_tax,
            vault_reward,
        })
    }
}

fn portion(amount: Amount, percentage: u64, divisor: u64) -> Result<Amount, LedgerError> {
    amount
        .checked_mul_ratio(percentage, divisor)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} cannot be taxed")))
}

fn remainder(amount: Amount, tax: Amount) -> Result<Amount, LedgerError> {
    amount
        .checked_sub(tax)
        .ok_or_else(|| LedgerError::InvalidConfig(format!("tax {tax} exceeds amount {amount}")))
}
