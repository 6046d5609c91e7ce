// Copyright (c) 2024 Amuse Finance

//! Staking vault records.
//!
//! The vault owns the per-account stake records and nothing else. Balances
//! and the rewards pool belong to the [`Ledger`](crate::Ledger), which asks the
//! vault for a plan, checks the balance side, and only then commits both.
//!
//! A record moves between two states and never disappears:
//!
//! ```text
//!   Unstaked (0) --stake--> Staked (>0) --unstake all--> Unstaked (0)
//! ```

use std::collections::BTreeMap;

use crate::account::AccountId;
use crate::amount::Amount;
use crate::error::LedgerError;
use crate::tax::{StakeQuote, TaxConfig, UnstakeQuote};

/// Locked stake for one account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeRecord {
    pub amount: Amount,
}

/// A validated stake, ready to commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakePlan {
    pub quote: StakeQuote,
    /// Stake record value after commit.
    pub new_stake: Amount,
}

/// A validated unstake, ready to commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakePlan {
    pub quote: UnstakeQuote,
    pub new_stake: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StakeVault {
    records: BTreeMap<AccountId, StakeRecord>,
}

impl StakeVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stake of an account (zero if it never staked).
    pub fn stake_of(&self, account: &AccountId) -> Amount {
        self.records
            .get(account)
            .map(|record| record.amount)
            .unwrap_or_default()
    }

    pub fn record(&self, account: &AccountId) -> Option<&StakeRecord> {
        self.records.get(account)
    }

    /// Sum of all stake records.
    pub fn total_staked(&self) -> Option<Amount> {
        self.records
            .values()
            .try_fold(Amount::ZERO, |sum, record| sum.checked_add(record.amount))
    }

    pub fn plan_stake(
        &self,
        tax: &TaxConfig,
        account: &AccountId,
        excluded: bool,
        amount: Amount,
    ) -> Result<StakePlan, LedgerError> {
        let quote = tax.quote_stake(excluded, amount)?;
        let new_stake = self
            .stake_of(account)
            .checked_add(quote.staked)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("stake of {account} overflows")))?;
        Ok(StakePlan { quote, new_stake })
    }

    /// Fails with `InsufficientStake` when `amount` exceeds the current stake.
    pub fn plan_unstake(
        &self,
        tax: &TaxConfig,
        account: &AccountId,
        excluded: bool,
        amount: Amount,
    ) -> Result<UnstakePlan, LedgerError> {
        let available = self.stake_of(account);
        let new_stake = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientStake {
                needed: amount,
                available,
            })?;
        let quote = tax.quote_unstake(excluded, amount)?;
        Ok(UnstakePlan { quote, new_stake })
    }

    /// Write a planned stake value. Creates the record on first use.
    pub(crate) fn commit(&mut self, account: &AccountId, new_stake: Amount) {
        self.records.entry(account.clone()).or_default().amount = new_stake;
    }
}
