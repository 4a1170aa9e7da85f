//! `SeaORM` entity definitions.

pub mod users;
pub mod wager_outcomes;
