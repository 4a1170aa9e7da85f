//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod settlement;
pub mod user;

pub use settlement::{SettleError, SettleInput, SettlementReceipt, SettlementRepository};
pub use user::{UserError, UserProfile, UserRepository};
