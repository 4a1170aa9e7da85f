//! Settlement engine: outcome arithmetic and the funds policy.

use rust_decimal::Decimal;

use super::error::SettlementError;

/// Balance granted to every account at registration.
pub const INITIAL_GRANT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 2);

/// Policy knobs for settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementPolicy {
    /// Whether a wager may drive an account balance below zero.
    pub allow_negative_balance: bool,
}

impl From<&punt_shared::config::SettlementConfig> for SettlementPolicy {
    fn from(config: &punt_shared::config::SettlementConfig) -> Self {
        Self {
            allow_negative_balance: config.allow_negative_balance,
        }
    }
}

/// Applies wager outcomes to balances.
///
/// The engine is pure: it never touches storage, so it can be called from
/// inside a database transaction while the account row is locked.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    policy: SettlementPolicy,
}

impl SettlementEngine {
    /// Creates an engine with the given policy.
    #[must_use]
    pub const fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    /// Returns the engine's policy.
    #[must_use]
    pub const fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Computes the balance after a wager outcome.
    ///
    /// `new_balance = current_balance + payout - bet_amount`.
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::NegativeBetAmount` / `NegativePayout` if a
    /// magnitude is negative, and `SettlementError::InsufficientFunds` if the
    /// result would be negative while the policy forbids negative balances.
    pub fn apply_outcome(
        &self,
        current_balance: Decimal,
        bet_amount: Decimal,
        payout: Decimal,
    ) -> Result<Decimal, SettlementError> {
        if bet_amount.is_sign_negative() && !bet_amount.is_zero() {
            return Err(SettlementError::NegativeBetAmount(bet_amount));
        }
        if payout.is_sign_negative() && !payout.is_zero() {
            return Err(SettlementError::NegativePayout(payout));
        }

        let new_balance = current_balance + payout - bet_amount;

        if new_balance.is_sign_negative()
            && !new_balance.is_zero()
            && !self.policy.allow_negative_balance
        {
            return Err(SettlementError::InsufficientFunds {
                balance: current_balance,
                required: bet_amount - payout,
            });
        }

        Ok(new_balance)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn strict_engine() -> SettlementEngine {
        SettlementEngine::new(SettlementPolicy {
            allow_negative_balance: false,
        })
    }

    fn permissive_engine() -> SettlementEngine {
        SettlementEngine::new(SettlementPolicy {
            allow_negative_balance: true,
        })
    }

    #[test]
    fn test_initial_grant_value() {
        assert_eq!(INITIAL_GRANT, dec!(1000.00));
    }

    #[test]
    fn test_losing_wager_reduces_balance() {
        let engine = strict_engine();
        let new_balance = engine
            .apply_outcome(dec!(1000), dec!(50), dec!(0))
            .unwrap();
        assert_eq!(new_balance, dec!(950));
    }

    #[test]
    fn test_winning_wager_increases_balance() {
        let engine = strict_engine();
        let new_balance = engine
            .apply_outcome(dec!(950), dec!(0), dec!(200))
            .unwrap();
        assert_eq!(new_balance, dec!(1150));
    }

    #[test]
    fn test_break_even_wager_keeps_balance() {
        let engine = strict_engine();
        let new_balance = engine
            .apply_outcome(dec!(1000), dec!(75), dec!(75))
            .unwrap();
        assert_eq!(new_balance, dec!(1000));
    }

    #[test]
    fn test_balance_can_reach_exactly_zero() {
        let engine = strict_engine();
        let new_balance = engine
            .apply_outcome(dec!(100), dec!(100), dec!(0))
            .unwrap();
        assert_eq!(new_balance, dec!(0));
    }

    #[test]
    fn test_uncovered_bet_rejected_under_strict_policy() {
        let engine = strict_engine();
        let result = engine.apply_outcome(dec!(100), dec!(150), dec!(0));
        assert_eq!(
            result,
            Err(SettlementError::InsufficientFunds {
                balance: dec!(100),
                required: dec!(150),
            })
        );
    }

    #[test]
    fn test_uncovered_bet_allowed_under_permissive_policy() {
        let engine = permissive_engine();
        let new_balance = engine
            .apply_outcome(dec!(100), dec!(150), dec!(0))
            .unwrap();
        assert_eq!(new_balance, dec!(-50));
    }

    #[test]
    fn test_payout_counts_toward_coverage() {
        // Bet 150 against a balance of 100 is fine when the payout is 60:
        // 100 + 60 - 150 = 10.
        let engine = strict_engine();
        let new_balance = engine
            .apply_outcome(dec!(100), dec!(150), dec!(60))
            .unwrap();
        assert_eq!(new_balance, dec!(10));
    }

    #[test]
    fn test_negative_bet_amount_rejected() {
        let engine = permissive_engine();
        let result = engine.apply_outcome(dec!(1000), dec!(-50), dec!(0));
        assert_eq!(
            result,
            Err(SettlementError::NegativeBetAmount(dec!(-50)))
        );
    }

    #[test]
    fn test_negative_payout_rejected() {
        let engine = permissive_engine();
        let result = engine.apply_outcome(dec!(1000), dec!(50), dec!(-10));
        assert_eq!(result, Err(SettlementError::NegativePayout(dec!(-10))));
    }

    #[test]
    fn test_lose_then_win_sequence() {
        // Start at the initial grant, lose 50, then win 200.
        let engine = strict_engine();
        let after_loss = engine
            .apply_outcome(dec!(1000), dec!(50), dec!(0))
            .unwrap();
        assert_eq!(after_loss, dec!(950));

        let after_win = engine
            .apply_outcome(after_loss, dec!(0), dec!(200))
            .unwrap();
        assert_eq!(after_win, dec!(1150));
    }
}
