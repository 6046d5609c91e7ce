//! Single-owner access control for privileged operations.

use tracing::warn;

use crate::account::AccountId;
use crate::error::LedgerError;

/// Holds the owner fixed at genesis.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessControl {
    owner: AccountId,
}

impl AccessControl {
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Reject `caller` unless it is the owner.
    pub fn ensure_owner(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if caller == &self.owner {
            Ok(())
        } else {
            warn!(caller = %caller, "Rejected privileged call from non-owner");
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gate() {
        let owner = AccountId::new("deployer").unwrap();
        let other = AccountId::new("user1").unwrap();
        let access = AccessControl::new(owner.clone());

        assert!(access.ensure_owner(&owner).is_ok());
        assert_eq!(
            access.ensure_owner(&other),
            Err(LedgerError::Unauthorized { caller: other })
        );
    }
}
