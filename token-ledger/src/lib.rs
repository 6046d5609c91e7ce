// Copyright (c) 2024 Amuse Finance

//! Amuse token ledger with a taxed transfer path and a staking vault.
//!
//! The ledger tracks three kinds of value, which always sum to the token's
//! total supply:
//!
//! - **Balances**: spendable tokens per account.
//! - **Stakes**: tokens locked in the vault per account.
//! - **Rewards pool**: every tax collected by the ledger.
//!
//! ## Taxes
//!
//! | Operation | Default rate | Excluded accounts |
//! |-----------|--------------|-------------------|
//! | Transfer  | 10%          | untaxed           |
//! | Stake     | 5%           | untaxed           |
//! | Unstake   | 10% + 1%     | untaxed           |
//!
//! ## Usage
//!
//! ```
//! use amd_token_ledger::{AccountId, Amount, Genesis, Ledger};
//!
//! let owner = AccountId::new("deployer").unwrap();
//! let user = AccountId::new("user1").unwrap();
//! let mut ledger = Ledger::from_genesis(Genesis::with_owner(owner.clone()).unwrap()).unwrap();
//!
//! ledger.transfer(&owner, &user, "1000".parse().unwrap()).unwrap();
//! assert_eq!(ledger.balance_of(&user), Amount::from_tokens(900));
//!
//! ledger.stake(&user, Amount::from_tokens(100)).unwrap();
//! assert_eq!(ledger.stake_of(&user), Amount::from_tokens(95));
//! assert!(ledger.check_conservation().is_ok());
//! ```

pub mod access;
pub mod account;
pub mod amount;
pub mod genesis;
pub mod ledger;
pub mod shared;
pub mod tax;
pub mod transaction;
pub mod vault;

mod error;

pub use access::AccessControl;
pub use account::{AccountId, AccountState};
pub use amount::{Amount, ParseAmountError, BASE_UNITS_PER_TOKEN, DECIMALS};
pub use error::LedgerError;
pub use genesis::{Allocation, Genesis, TokenInfo};
pub use ledger::{Ledger, LedgerTotals};
pub use shared::SharedLedger;
pub use tax::{StakeQuote, TaxConfig, TaxSplit, UnstakeQuote, VaultRewardBase, TAX_DIVISOR};
pub use transaction::{Event, Operation, Output, Receipt, Transaction};
pub use vault::{StakePlan, StakeRecord, StakeVault, UnstakePlan};
