//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{SettlementRepository, UserRepository};

use std::time::Duration;

use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a connection, retrying with a fixed delay.
///
/// Startup is the only place the database may legitimately be unreachable
/// (e.g. the container is still coming up), so the retry loop lives here and
/// nowhere else — request-path storage errors are surfaced, never retried.
///
/// # Errors
///
/// Returns the last connection error once `attempts` are exhausted.
pub async fn connect_with_retry(
    database_url: &str,
    attempts: u32,
    retry_delay: Duration,
) -> Result<DatabaseConnection, DbErr> {
    let mut remaining = attempts.max(1);

    loop {
        match Database::connect(database_url).await {
            Ok(db) => {
                info!("Connected to the database");
                return Ok(db);
            }
            Err(e) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(e);
                }
                warn!(
                    error = %e,
                    remaining,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(retry_delay).await;
            }
        }
    }
}
