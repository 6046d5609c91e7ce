use thiserror::Error;

use crate::account::AccountId;
use crate::amount::{Amount, ParseAmountError};

/// Reasons a ledger operation is rejected.
///
/// Every variant is raised before any state is touched, so a rejected
/// operation leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("Insufficient stake: needed {needed}, available {available}")]
    InsufficientStake { needed: Amount, available: Amount },

    #[error("Ownable: caller is not the owner ({caller})")]
    Unauthorized { caller: AccountId },

    #[error("Invalid account identifier: {0:?}")]
    InvalidAccount(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Supply mismatch: expected {expected}, accounted {accounted}")]
    SupplyMismatch { expected: Amount, accounted: Amount },
}

impl From<ParseAmountError> for LedgerError {
    fn from(err: ParseAmountError) -> Self {
        LedgerError::InvalidAmount(err.to_string())
    }
}
