// Copyright (c) 2024 Amuse Finance

//! The token ledger: balances, exclusions, the rewards pool and the vault.
//!
//! Every state-changing method follows the same shape: read current values,
//! compute every new value with checked arithmetic, and only then write. An
//! `Err` therefore always means nothing changed.
//!
//! Conservation holds across every committed operation:
//!
//! ```text
//! Σ balances + rewards_pool + Σ stakes == total_supply
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::access::AccessControl;
use crate::account::{AccountId, AccountState};
use crate::amount::Amount;
use crate::error::LedgerError;
use crate::genesis::{Genesis, TokenInfo};
use crate::tax::{TaxConfig, TaxSplit};
use crate::transaction::{Event, Operation, Output, Receipt, Transaction};
use crate::vault::StakeVault;

/// Token ledger state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ledger {
    token: TokenInfo,
    tax: TaxConfig,
    access: AccessControl,
    accounts: BTreeMap<AccountId, AccountState>,
    rewards_pool: Amount,
    vault: StakeVault,
    #[cfg_attr(feature = "serde", serde(default))]
    vault_address: Option<AccountId>,
    cashback_interval_secs: u64,
}

/// Snapshot of the ledger's global totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerTotals {
    pub balances: Amount,
    pub rewards_pool: Amount,
    pub staked: Amount,
}

impl LedgerTotals {
    /// Everything the ledger accounts for; equals total supply.
    pub fn accounted(&self) -> Option<Amount> {
        self.balances
            .checked_add(self.rewards_pool)?
            .checked_add(self.staked)
    }
}

fn overflow(what: &str) -> LedgerError {
    LedgerError::InvalidAmount(format!("{what} overflows"))
}

impl Ledger {
    /// Build a fresh ledger, minting the genesis allocations.
    pub fn from_genesis(genesis: Genesis) -> Result<Self, LedgerError> {
        genesis.validate()?;

        let mut accounts: BTreeMap<AccountId, AccountState> = BTreeMap::new();
        for alloc in &genesis.allocations {
            let state = accounts.entry(alloc.account.clone()).or_default();
            state.balance = state
                .balance
                .checked_add(alloc.amount)
                .ok_or_else(|| overflow("genesis allocation"))?;
        }

        info!(
            owner = %genesis.owner,
            supply = %genesis.token.total_supply,
            allocations = genesis.allocations.len(),
            "Initializing ledger from genesis"
        );

        Ok(Self {
            token: genesis.token,
            tax: genesis.tax,
            access: AccessControl::new(genesis.owner),
            accounts,
            rewards_pool: Amount::ZERO,
            vault: StakeVault::new(),
            vault_address: None,
            cashback_interval_secs: genesis.cashback_interval_secs,
        })
    }

    /// Re-check invariants of a ledger obtained from outside (e.g. a state file).
    pub fn validate(&self) -> Result<(), LedgerError> {
        self.tax.validate()?;
        if self.cashback_interval_secs == 0 {
            return Err(LedgerError::InvalidConfig(
                "cashback interval must be positive".into(),
            ));
        }
        self.check_conservation()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn token_info(&self) -> &TokenInfo {
        &self.token
    }

    pub fn tax_config(&self) -> &TaxConfig {
        &self.tax
    }

    pub fn owner(&self) -> &AccountId {
        self.access.owner()
    }

    pub fn total_supply(&self) -> Amount {
        self.token.total_supply
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.accounts
            .get(account)
            .map(|state| state.balance)
            .unwrap_or_default()
    }

    pub fn is_excluded(&self, account: &AccountId) -> bool {
        self.accounts
            .get(account)
            .map(|state| state.excluded)
            .unwrap_or(false)
    }

    pub fn rewards_pool(&self) -> Amount {
        self.rewards_pool
    }

    pub fn stake_of(&self, account: &AccountId) -> Amount {
        self.vault.stake_of(account)
    }

    /// Account registered with [`Ledger::set_vault`], if any.
    pub fn vault_address(&self) -> Option<&AccountId> {
        self.vault_address.as_ref()
    }

    pub fn cashback_interval(&self) -> u64 {
        self.cashback_interval_secs
    }

    /// All accounts that have ever held a balance or an exclusion flag.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountId, &AccountState)> + '_ {
        self.accounts.iter()
    }

    /// Tax split `account` would pay on a transfer of `amount`.
    pub fn calculate_tax(&self, account: &AccountId, amount: Amount) -> Result<TaxSplit, LedgerError> {
        self.tax.calculate_tax(self.is_excluded(account), amount)
    }

    pub fn totals(&self) -> Result<LedgerTotals, LedgerError> {
        let balances = self
            .accounts
            .values()
            .try_fold(Amount::ZERO, |sum, state| sum.checked_add(state.balance))
            .ok_or_else(|| overflow("sum of balances"))?;
        let staked = self
            .vault
            .total_staked()
            .ok_or_else(|| overflow("sum of stakes"))?;
        Ok(LedgerTotals {
            balances,
            rewards_pool: self.rewards_pool,
            staked,
        })
    }

    /// Verify `Σ balances + rewards_pool + Σ stakes == total_supply`.
    pub fn check_conservation(&self) -> Result<(), LedgerError> {
        let accounted = self
            .totals()?
            .accounted()
            .ok_or_else(|| overflow("accounted supply"))?;
        if accounted == self.token.total_supply {
            Ok(())
        } else {
            Err(LedgerError::SupplyMismatch {
                expected: self.token.total_supply,
                accounted,
            })
        }
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Apply one transaction atomically.
    pub fn apply(&mut self, tx: &Transaction) -> Result<Receipt, LedgerError> {
        let caller = &tx.caller;
        let result = match &tx.operation {
            Operation::Transfer { to, amount } => self.transfer(caller, to, *amount),
            Operation::Exclude { account, status } => self.exclude(caller, account, *status),
            Operation::SetVault { vault } => self.set_vault(caller, vault),
            Operation::SetCashbackInterval { seconds } => {
                self.set_cashback_interval(caller, *seconds)
            }
            Operation::Stake { amount } => self.stake(caller, *amount),
            Operation::Unstake { amount } => self.unstake(caller, *amount),
        };
        match &result {
            Ok(receipt) => debug!(
                op = tx.operation.name(),
                caller = %caller,
                events = receipt.events.len(),
                "Applied transaction"
            ),
            Err(err) => debug!(
                op = tx.operation.name(),
                caller = %caller,
                error = %err,
                "Rejected transaction"
            ),
        }
        result
    }

    /// Move `amount` from `from` to `to`, diverting the transfer tax to the
    /// rewards pool.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        let split = self.calculate_tax(from, amount)?;
        let recipient_before = if from == to {
            debited
        } else {
            self.balance_of(to)
        };
        let credited = recipient_before
            .checked_add(split.final_amount)
            .ok_or_else(|| overflow("recipient balance"))?;
        let pool = self
            .rewards_pool
            .checked_add(split.tax_amount)
            .ok_or_else(|| overflow("rewards pool"))?;

        self.account_mut(from).balance = debited;
        self.account_mut(to).balance = credited;
        self.rewards_pool = pool;

        let mut receipt = Receipt::new(Output::Transfer(split)).with_event(Event::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount: split.final_amount,
        });
        if !split.tax_amount.is_zero() {
            receipt = receipt.with_event(Event::TaxCollected {
                from: from.clone(),
                amount: split.tax_amount,
            });
        }
        Ok(receipt)
    }

    /// Set or clear the tax exclusion flag of `account`. Owner only.
    pub fn exclude(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
        status: bool,
    ) -> Result<Receipt, LedgerError> {
        self.access.ensure_owner(caller)?;
        self.account_mut(account).excluded = status;
        info!(account = %account, status, "Exclusion changed");
        Ok(Receipt::new(Output::Unit).with_event(Event::ExclusionChanged {
            account: account.clone(),
            status,
        }))
    }

    /// Register the staking vault's account. Owner only.
    ///
    /// The vault account is excluded from tax as part of registration.
    pub fn set_vault(&mut self, caller: &AccountId, vault: &AccountId) -> Result<Receipt, LedgerError> {
        self.access.ensure_owner(caller)?;
        self.vault_address = Some(vault.clone());
        self.account_mut(vault).excluded = true;
        info!(vault = %vault, "Vault registered");
        Ok(Receipt::new(Output::Unit)
            .with_event(Event::VaultSet {
                vault: vault.clone(),
            })
            .with_event(Event::ExclusionChanged {
                account: vault.clone(),
                status: true,
            }))
    }

    /// Change the cashback interval. Owner only; must be positive.
    pub fn set_cashback_interval(
        &mut self,
        caller: &AccountId,
        seconds: u64,
    ) -> Result<Receipt, LedgerError> {
        self.access.ensure_owner(caller)?;
        if seconds == 0 {
            return Err(LedgerError::InvalidAmount(
                "cashback interval must be positive".into(),
            ));
        }
        self.cashback_interval_secs = seconds;
        info!(seconds, "Cashback interval changed");
        Ok(Receipt::new(Output::Unit).with_event(Event::CashbackIntervalSet { seconds }))
    }

    /// Lock `amount` of `account`'s balance in the vault, minus stake tax.
    pub fn stake(&mut self, account: &AccountId, amount: Amount) -> Result<Receipt, LedgerError> {
        let available = self.balance_of(account);
        let debited = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        let plan = self
            .vault
            .plan_stake(&self.tax, account, self.is_excluded(account), amount)?;
        let pool = self
            .rewards_pool
            .checked_add(plan.quote.stake_tax)
            .ok_or_else(|| overflow("rewards pool"))?;

        self.account_mut(account).balance = debited;
        self.vault.commit(account, plan.new_stake);
        self.rewards_pool = pool;

        let mut receipt = Receipt::new(Output::Stake(plan.quote)).with_event(Event::Staked {
            account: account.clone(),
            amount,
            staked: plan.quote.staked,
        });
        if !plan.quote.stake_tax.is_zero() {
            receipt = receipt.with_event(Event::TaxCollected {
                from: account.clone(),
                amount: plan.quote.stake_tax,
            });
        }
        Ok(receipt)
    }

    /// Release `amount` of `account`'s stake back to its balance, minus the
    /// unstake tax and vault reward cut.
    pub fn unstake(&mut self, account: &AccountId, amount: Amount) -> Result<Receipt, LedgerError> {
        let plan = self
            .vault
            .plan_unstake(&self.tax, account, self.is_excluded(account), amount)?;
        let deduction = plan.quote.total_deduction();
        let credited = self
            .balance_of(account)
            .checked_add(plan.quote.returned)
            .ok_or_else(|| overflow("balance"))?;
        let pool = self
            .rewards_pool
            .checked_add(deduction)
            .ok_or_else(|| overflow("rewards pool"))?;

        self.vault.commit(account, plan.new_stake);
        self.account_mut(account).balance = credited;
        self.rewards_pool = pool;

        let mut receipt = Receipt::new(Output::Unstake(plan.quote)).with_event(Event::Unstaked {
            account: account.clone(),
            amount,
            returned: plan.quote.returned,
        });
        if !deduction.is_zero() {
            receipt = receipt.with_event(Event::TaxCollected {
                from: account.clone(),
                amount: deduction,
            });
        }
        Ok(receipt)
    }

    fn account_mut(&mut self, account: &AccountId) -> &mut AccountState {
        self.accounts.entry(account.clone()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    fn tokens(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn test_ledger() -> Ledger {
        Ledger::from_genesis(Genesis::with_owner(id("deployer")).unwrap()).unwrap()
    }

    #[test]
    fn test_genesis_balances() {
        let ledger = test_ledger();
        assert_eq!(ledger.balance_of(&id("deployer")), Amount::from_tokens(14_000_000));
        assert_eq!(ledger.total_supply(), Amount::from_tokens(20_000_000));
        assert_eq!(ledger.token_info().symbol, "AMD");
        assert!(ledger.check_conservation().is_ok());
    }

    #[test]
    fn test_transfer_deducts_tax() {
        let mut ledger = test_ledger();
        let receipt = ledger
            .transfer(&id("deployer"), &id("user1"), tokens("10000"))
            .unwrap();

        assert_eq!(ledger.balance_of(&id("user1")), tokens("9000"));
        assert_eq!(ledger.rewards_pool(), tokens("1000"));
        assert_eq!(
            receipt.output,
            Output::Transfer(TaxSplit {
                final_amount: tokens("9000"),
                tax_amount: tokens("1000"),
            })
        );
        assert_eq!(receipt.events.len(), 2);
        assert!(ledger.check_conservation().is_ok());
    }

    #[test]
    fn test_self_transfer_still_taxed() {
        let mut ledger = test_ledger();
        ledger
            .transfer(&id("deployer"), &id("deployer"), tokens("100"))
            .unwrap();
        assert_eq!(
            ledger.balance_of(&id("deployer")),
            tokens("13999990")
        );
        assert_eq!(ledger.rewards_pool(), tokens("10"));
    }

    #[test]
    fn test_transfer_insufficient_balance_leaves_state() {
        let mut ledger = test_ledger();
        let before = ledger.clone();
        let err = ledger
            .transfer(&id("user2"), &id("user1"), tokens("100"))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                needed: tokens("100"),
                available: Amount::ZERO,
            }
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_excluded_sender_untaxed() {
        let mut ledger = test_ledger();
        ledger.exclude(&id("deployer"), &id("deployer"), true).unwrap();
        ledger
            .transfer(&id("deployer"), &id("user1"), tokens("1000"))
            .unwrap();
        assert_eq!(ledger.balance_of(&id("user1")), tokens("1000"));
        assert_eq!(ledger.rewards_pool(), Amount::ZERO);
    }

    #[test]
    fn test_exclude_requires_owner() {
        let mut ledger = test_ledger();
        ledger.exclude(&id("deployer"), &id("user1"), true).unwrap();
        assert!(ledger.is_excluded(&id("user1")));

        let before = ledger.clone();
        let err = ledger.exclude(&id("user1"), &id("user1"), false).unwrap_err();
        assert!(err.to_string().contains("Ownable: caller is not the owner"));
        assert!(ledger.is_excluded(&id("user1")));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_set_vault_excludes_vault() {
        let mut ledger = test_ledger();
        assert!(ledger.set_vault(&id("user1"), &id("vault")).is_err());
        assert_eq!(ledger.vault_address(), None);

        ledger.set_vault(&id("deployer"), &id("vault")).unwrap();
        assert_eq!(ledger.vault_address(), Some(&id("vault")));
        assert!(ledger.is_excluded(&id("vault")));
    }

    #[test]
    fn test_cashback_interval() {
        let mut ledger = test_ledger();
        ledger.set_cashback_interval(&id("deployer"), 5).unwrap();
        assert_eq!(ledger.cashback_interval(), 5);
        assert!(matches!(
            ledger.set_cashback_interval(&id("deployer"), 0),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.set_cashback_interval(&id("user1"), 10),
            Err(LedgerError::Unauthorized { .. })
        ));
        assert_eq!(ledger.cashback_interval(), 5);
    }

    #[test]
    fn test_stake_and_unstake() {
        let mut ledger = test_ledger();
        ledger.exclude(&id("deployer"), &id("deployer"), true).unwrap();
        ledger
            .transfer(&id("deployer"), &id("user1"), tokens("1000"))
            .unwrap();

        ledger.stake(&id("user1"), tokens("100")).unwrap();
        assert_eq!(ledger.stake_of(&id("user1")), tokens("95"));
        assert_eq!(ledger.rewards_pool(), tokens("5"));
        assert_eq!(ledger.balance_of(&id("user1")), tokens("900"));

        ledger.unstake(&id("user1"), tokens("20")).unwrap();
        assert_eq!(ledger.stake_of(&id("user1")), tokens("75"));
        assert_eq!(ledger.rewards_pool(), tokens("7.2"));
        assert_eq!(ledger.balance_of(&id("user1")), tokens("917.8"));
        assert!(ledger.check_conservation().is_ok());
    }

    #[test]
    fn test_unstake_over_stake_leaves_state() {
        let mut ledger = test_ledger();
        ledger.stake(&id("deployer"), tokens("100")).unwrap();
        let before = ledger.clone();
        let err = ledger.unstake(&id("deployer"), tokens("96")).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStake { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_apply_dispatches() {
        let mut ledger = test_ledger();
        let tx = Transaction::new(
            id("deployer"),
            Operation::Transfer {
                to: id("user1"),
                amount: tokens("1000"),
            },
        );
        ledger.apply(&tx).unwrap();
        assert_eq!(ledger.balance_of(&id("user1")), tokens("900"));
    }
}
