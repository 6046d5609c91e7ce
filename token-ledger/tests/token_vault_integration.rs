// Copyright (c) 2024 Amuse Finance
//
//! Token and vault integration tests.
//!
//! Replays the deployment scenarios of the token and vault:
//! - token metadata and genesis balances
//! - taxed transfers and the exclusion list
//! - vault configuration and stake/unstake accounting
//! - state file round-trip through JSON

use amd_token_ledger::{
    AccountId, Amount, Event, Genesis, Ledger, LedgerError, Operation, Output, Transaction,
    VaultRewardBase,
};

// ============================================================================
// Helpers
// ============================================================================

fn id(s: &str) -> AccountId {
    AccountId::new(s).expect("valid account id")
}

fn tokens(s: &str) -> Amount {
    s.parse().expect("valid amount")
}

/// Deployed token with the vault registered and 1000 AMD sent to the admin
/// and both users.
fn deployed() -> Ledger {
    let mut ledger = Ledger::from_genesis(Genesis::with_owner(id("deployer")).unwrap()).unwrap();
    ledger.set_vault(&id("deployer"), &id("vault")).unwrap();
    for user in ["admin", "user1", "user2"] {
        ledger
            .transfer(&id("deployer"), &id(user), tokens("1000"))
            .unwrap();
    }
    ledger
}

// ============================================================================
// Deployment
// ============================================================================

#[test]
fn test_token_metadata() {
    let ledger = deployed();
    let info = ledger.token_info();
    assert_eq!(info.name, "Amuse Finance");
    assert_eq!(info.symbol, "AMD");
    assert_eq!(info.decimals, 18);
    assert_eq!(info.total_supply, tokens("20000000"));
    assert_eq!(ledger.owner(), &id("deployer"));
}

#[test]
fn test_vault_parameters() {
    let ledger = deployed();
    let tax = ledger.tax_config();
    assert_eq!(tax.tax_percentage, 10);
    assert_eq!(tax.stake_tax_percentage, 5);
    assert_eq!(tax.unstake_tax_percentage, 10);
    assert_eq!(tax.stake_divisor, 100);
    assert_eq!(tax.vault_reward_percentage, 1);
    assert_eq!(tax.vault_reward_divisor, 100);
}

#[test]
fn test_genesis_owner_balance() {
    let ledger = Ledger::from_genesis(Genesis::with_owner(id("deployer")).unwrap()).unwrap();
    assert_eq!(ledger.balance_of(&id("deployer")), tokens("14000000"));
    assert_eq!(ledger.balance_of(&id("reserve")), tokens("6000000"));
}

// ============================================================================
// Transfers
// ============================================================================

#[test]
fn test_transfer_received_after_tax() {
    let mut ledger = Ledger::from_genesis(Genesis::with_owner(id("deployer")).unwrap()).unwrap();
    ledger
        .transfer(&id("deployer"), &id("user1"), tokens("10000"))
        .unwrap();
    assert_eq!(ledger.balance_of(&id("user1")), tokens("9000"));
}

#[test]
fn test_transfer_rejected_beyond_balance() {
    let mut ledger = deployed();
    let before = ledger.clone();
    let err = ledger
        .transfer(&id("user2"), &id("user1"), tokens("901"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(ledger, before);
}

#[test]
fn test_calculate_tax_for_deployer() {
    let ledger = deployed();
    let split = ledger.calculate_tax(&id("deployer"), tokens("1000")).unwrap();
    assert_eq!(split.final_amount.to_string(), "900.0");
    assert_eq!(split.tax_amount.to_string(), "100.0");
}

#[test]
fn test_exclusion_by_owner_only() {
    let mut ledger = deployed();
    ledger.exclude(&id("deployer"), &id("user1"), true).unwrap();
    assert!(ledger.is_excluded(&id("user1")));

    let err = ledger.exclude(&id("user1"), &id("user1"), false).unwrap_err();
    assert_eq!(err, LedgerError::Unauthorized { caller: id("user1") });
    assert!(ledger.is_excluded(&id("user1")));

    let split = ledger.calculate_tax(&id("user1"), tokens("1000")).unwrap();
    assert_eq!(split.tax_amount, Amount::ZERO);
}

// ============================================================================
// Vault
// ============================================================================

#[test]
fn test_stake_credits_pool() {
    let mut ledger = deployed();
    let pool_before = ledger.rewards_pool();

    let receipt = ledger.stake(&id("user1"), tokens("100")).unwrap();

    assert_eq!(ledger.stake_of(&id("user1")), tokens("95"));
    assert_eq!(
        ledger.rewards_pool().checked_sub(pool_before),
        Some(tokens("5"))
    );
    assert!(receipt.events.contains(&Event::Staked {
        account: id("user1"),
        amount: tokens("100"),
        staked: tokens("95"),
    }));
}

#[test]
fn test_unstake_returns_net_of_taxes() {
    let mut ledger = deployed();
    ledger.stake(&id("user1"), tokens("100")).unwrap();
    let pool_before = ledger.rewards_pool();
    let balance_before = ledger.balance_of(&id("user1"));

    let receipt = ledger.unstake(&id("user1"), tokens("20")).unwrap();

    let quote = match &receipt.output {
        Output::Unstake(quote) => *quote,
        other => panic!("expected unstake output, got {other:?}"),
    };
    assert_eq!(quote.unstake_tax, tokens("2"));
    assert_eq!(quote.vault_reward, tokens("0.2"));
    assert_eq!(
        ledger.rewards_pool().checked_sub(pool_before),
        Some(tokens("2.2"))
    );
    assert_eq!(
        ledger.balance_of(&id("user1")).checked_sub(balance_before),
        Some(tokens("17.8"))
    );
    assert_eq!(ledger.stake_of(&id("user1")), tokens("75"));
    assert!(ledger.check_conservation().is_ok());
}

#[test]
fn test_unstake_net_composition() {
    let mut genesis = Genesis::with_owner(id("deployer")).unwrap();
    genesis.tax.vault_reward_base = VaultRewardBase::Net;
    let mut ledger = Ledger::from_genesis(genesis).unwrap();
    ledger.stake(&id("deployer"), tokens("100")).unwrap();

    let pool_before = ledger.rewards_pool();
    ledger.unstake(&id("deployer"), tokens("20")).unwrap();
    assert_eq!(
        ledger.rewards_pool().checked_sub(pool_before),
        Some(tokens("2.18"))
    );
}

#[test]
fn test_unstake_beyond_stake_rejected() {
    let mut ledger = deployed();
    ledger.stake(&id("user1"), tokens("100")).unwrap();
    let before = ledger.clone();

    let err = ledger.unstake(&id("user1"), tokens("95.000000000000000001")).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientStake {
            needed: tokens("95.000000000000000001"),
            available: tokens("95"),
        }
    );
    assert_eq!(ledger, before);
}

#[test]
fn test_stake_beyond_balance_rejected() {
    let mut ledger = deployed();
    let before = ledger.clone();
    let err = ledger.stake(&id("user2"), tokens("1000")).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(ledger, before);
}

#[test]
fn test_excluded_stake_untaxed() {
    let mut ledger = deployed();
    ledger.exclude(&id("deployer"), &id("admin"), true).unwrap();
    ledger.stake(&id("admin"), tokens("100")).unwrap();
    ledger.unstake(&id("admin"), tokens("100")).unwrap();
    assert_eq!(ledger.balance_of(&id("admin")), tokens("900"));
    assert_eq!(ledger.stake_of(&id("admin")), Amount::ZERO);
}

#[test]
fn test_privileged_operations_through_apply() {
    let mut ledger = deployed();
    let tx = Transaction::new(id("user1"), Operation::SetCashbackInterval { seconds: 5 });
    assert!(tx.operation.is_privileged());
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::Unauthorized { .. })
    ));

    let tx = Transaction::new(id("deployer"), Operation::SetCashbackInterval { seconds: 5 });
    ledger.apply(&tx).unwrap();
    assert_eq!(ledger.cashback_interval(), 5);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_state_json_roundtrip() {
    let mut ledger = deployed();
    ledger.stake(&id("user1"), tokens("100")).unwrap();

    let json = serde_json::to_string_pretty(&ledger).unwrap();
    assert!(json.contains("\"rewards_pool\""));
    let restored: Ledger = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, ledger);
    assert!(restored.validate().is_ok());
}

#[test]
fn test_tampered_state_fails_validation() {
    let ledger = deployed();
    let json = serde_json::to_string(&ledger).unwrap();
    let pool = ledger.rewards_pool().to_string();
    let tampered = json.replace(
        &format!("\"rewards_pool\":\"{pool}\""),
        "\"rewards_pool\":\"1.0\"",
    );
    let restored: Ledger = serde_json::from_str(&tampered).unwrap();
    assert!(matches!(
        restored.validate(),
        Err(LedgerError::SupplyMismatch { .. })
    ));
}
