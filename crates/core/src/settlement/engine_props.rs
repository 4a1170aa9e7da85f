//! Property-based tests for the settlement engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::{SettlementEngine, SettlementPolicy};

/// Strategy to generate non-negative amounts (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a starting balance (0.00 to 100,000.00).
fn starting_balance() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a sequence of wager outcomes.
fn outcome_sequence() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((amount(), amount()), 0..50)
}

fn permissive_engine() -> SettlementEngine {
    SettlementEngine::new(SettlementPolicy {
        allow_negative_balance: true,
    })
}

fn strict_engine() -> SettlementEngine {
    SettlementEngine::new(SettlementPolicy {
        allow_negative_balance: false,
    })
}

proptest! {
    /// A settled sequence moves the balance by exactly sum(payout) - sum(bet).
    #[test]
    fn prop_outcome_sequence_conserves_totals(
        initial in starting_balance(),
        outcomes in outcome_sequence(),
    ) {
        let engine = permissive_engine();
        let mut balance = initial;
        for &(bet, payout) in &outcomes {
            balance = engine.apply_outcome(balance, bet, payout).unwrap();
        }

        let total_bet: Decimal = outcomes.iter().map(|(bet, _)| *bet).sum();
        let total_payout: Decimal = outcomes.iter().map(|(_, payout)| *payout).sum();
        prop_assert_eq!(balance, initial + total_payout - total_bet);
    }

    /// A single outcome matches the formula whenever it is accepted.
    #[test]
    fn prop_accepted_outcome_matches_formula(
        balance in starting_balance(),
        bet in amount(),
        payout in amount(),
    ) {
        let engine = strict_engine();
        if let Ok(new_balance) = engine.apply_outcome(balance, bet, payout) {
            prop_assert_eq!(new_balance, balance + payout - bet);
        }
    }

    /// The strict policy never lets a balance go negative.
    #[test]
    fn prop_strict_policy_never_goes_negative(
        balance in starting_balance(),
        bet in amount(),
        payout in amount(),
    ) {
        let engine = strict_engine();
        if let Ok(new_balance) = engine.apply_outcome(balance, bet, payout) {
            prop_assert!(!new_balance.is_sign_negative() || new_balance.is_zero());
        }
    }

    /// The permissive policy accepts every non-negative pair of magnitudes.
    #[test]
    fn prop_permissive_policy_accepts_all_magnitudes(
        balance in starting_balance(),
        bet in amount(),
        payout in amount(),
    ) {
        let engine = permissive_engine();
        prop_assert!(engine.apply_outcome(balance, bet, payout).is_ok());
    }
}
