//! Settlement error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while applying a wager outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Bet amount must be a non-negative magnitude.
    #[error("Bet amount cannot be negative: {0}")]
    NegativeBetAmount(Decimal),

    /// Payout must be a non-negative magnitude.
    #[error("Payout cannot be negative: {0}")]
    NegativePayout(Decimal),

    /// The wager would drive the balance below zero and the policy forbids it.
    #[error("Balance {balance} cannot cover a net debit of {required}")]
    InsufficientFunds {
        /// Balance at the time the wager was evaluated.
        balance: Decimal,
        /// Net amount the wager removes from the account.
        required: Decimal,
    },
}
