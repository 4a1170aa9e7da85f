//! Wager settlement logic.
//!
//! This module implements the arithmetic heart of the service:
//! - Outcome application (`new_balance = current + payout - bet_amount`)
//! - The negative-balance policy (insufficient-funds guard)
//! - Error types for settlement failures
//!
//! Persisting an outcome atomically is the database layer's job; everything
//! here is pure and synchronous so it can run inside a storage transaction.

pub mod engine;
pub mod error;

#[cfg(test)]
mod engine_props;

pub use engine::{INITIAL_GRANT, SettlementEngine, SettlementPolicy};
pub use error::SettlementError;
