//! Transactions submitted to the ledger and the receipts they produce.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::tax::{StakeQuote, TaxSplit, UnstakeQuote};

/// A state-changing operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum Operation {
    Transfer { to: AccountId, amount: Amount },
    Exclude { account: AccountId, status: bool },
    SetVault { vault: AccountId },
    SetCashbackInterval { seconds: u64 },
    Stake { amount: Amount },
    Unstake { amount: Amount },
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Transfer { .. } => "transfer",
            Operation::Exclude { .. } => "exclude",
            Operation::SetVault { .. } => "set_vault",
            Operation::SetCashbackInterval { .. } => "set_cashback_interval",
            Operation::Stake { .. } => "stake",
            Operation::Unstake { .. } => "unstake",
        }
    }

    /// Whether only the owner may submit this operation.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            Operation::Exclude { .. }
                | Operation::SetVault { .. }
                | Operation::SetCashbackInterval { .. }
        )
    }
}

/// An operation together with the identity submitting it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub caller: AccountId,
    pub operation: Operation,
}

impl Transaction {
    pub fn new(caller: AccountId, operation: Operation) -> Self {
        Self { caller, operation }
    }
}

/// Return values of a committed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Output {
    Transfer(TaxSplit),
    Stake(StakeQuote),
    Unstake(UnstakeQuote),
    /// Configuration changes return nothing.
    Unit,
}

/// Something that happened while applying a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum Event {
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    TaxCollected {
        from: AccountId,
        amount: Amount,
    },
    ExclusionChanged {
        account: AccountId,
        status: bool,
    },
    VaultSet {
        vault: AccountId,
    },
    CashbackIntervalSet {
        seconds: u64,
    },
    Staked {
        account: AccountId,
        amount: Amount,
        staked: Amount,
    },
    Unstaked {
        account: AccountId,
        amount: Amount,
        returned: Amount,
    },
}

/// Outcome of a committed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receipt {
    pub output: Output,
    pub events: Vec<Event>,
}

impl Receipt {
    pub(crate) fn new(output: Output) -> Self {
        Self {
            output,
            events: Vec::new(),
        }
    }

    pub(crate) fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}
